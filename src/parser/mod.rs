pub(crate) mod column_index;
pub mod error;
pub mod series_parser;
