use crate::types::timestamp::Timestamp;
use thiserror::Error;

/// Invalid caller input while building a request or a time range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    #[error("Invalid argument: no variable keys requested")]
    EmptyKeys,

    #[error("Invalid argument: station code is empty")]
    EmptyStation,

    #[error("Invalid argument: range start {start} is after end {end}")]
    InvertedRange { start: Timestamp, end: Timestamp },

    #[error("Invalid argument: '{0}' is not a known variable key")]
    UnknownKey(String),

    #[error("Invalid argument: {bound} does not name a valid date and time")]
    InvalidTimestamp { bound: &'static str },
}
