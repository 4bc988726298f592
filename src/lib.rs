mod config;
mod error;
mod parser;
mod request;
mod transport;
mod types;
mod utils;
mod weather_machine;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, WeatherMachineConfig};
pub use error::WeatherMachineError;
pub use weather_machine::*;

pub use request::builder::{DataRequest, RequestBuilder, MAX_WINDOW_DAYS};
pub use request::error::RequestError;

pub use parser::error::ParseError;
pub use parser::series_parser::{ParserOptions, SeriesParser};

pub use transport::error::TransportError;
pub use transport::loader::{WeatherMachineLoader, DEFAULT_ENDPOINT};

pub use types::catalog::*;
pub use types::frame::{TowerLazyFrame, COL_DATETIME};
pub use types::period::{DateTimePeriod, Month, Year};
pub use types::series_set::{Conversion, Series, SeriesSet};
pub use types::time_range::TimeRange;
pub use types::timestamp::{IntoTimestamp, Timestamp};
