pub mod catalog;
pub mod frame;
pub mod period;
pub mod series_set;
pub mod time_range;
pub mod timestamp;
