use crate::request::error::RequestError;
use crate::types::period::DateTimePeriod;
use crate::types::timestamp::{IntoTimestamp, Timestamp};
use chrono::Duration;
use std::fmt;

/// An inclusive `[start, end]` span of tower-local time.
///
/// The only way to obtain a `TimeRange` is through its constructors, all of
/// which reject `start > end`, so any value of this type is ordered. It bounds
/// a [`crate::DataRequest`] and is reused to bound plot axes afterwards.
///
/// # Examples
///
/// ```
/// use weathermachine::{Month, TimeRange};
///
/// let range = TimeRange::new((2017, 3, 1), "2017-04-01").unwrap();
/// assert_eq!(range, TimeRange::for_period(Month(2017, 3)).unwrap());
///
/// assert!(TimeRange::new((2017, 4, 1), (2017, 3, 1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// Creates a range from any pair of inputs implementing [`IntoTimestamp`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTimestamp`] if either bound does not name a
    /// valid point in time, and [`RequestError::InvertedRange`] if `start > end`.
    pub fn new(start: impl IntoTimestamp, end: impl IntoTimestamp) -> Result<Self, RequestError> {
        let start = start
            .into_timestamp()
            .ok_or(RequestError::InvalidTimestamp { bound: "start" })?;
        let end = end
            .into_timestamp()
            .ok_or(RequestError::InvalidTimestamp { bound: "end" })?;
        Self::from_timestamps(start, end)
    }

    pub fn from_timestamps(start: Timestamp, end: Timestamp) -> Result<Self, RequestError> {
        if start > end {
            return Err(RequestError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering a whole calendar period (see [`DateTimePeriod`]).
    pub fn for_period(period: impl DateTimePeriod) -> Result<Self, RequestError> {
        period
            .get_datetime_period()
            .ok_or(RequestError::InvalidTimestamp { bound: "period" })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::period::Year;

    #[test]
    fn test_new_orders_bounds() {
        let range = TimeRange::new((2017, 3, 1), (2017, 3, 1)).unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(range.duration(), Duration::zero());

        let err = TimeRange::new((2017, 3, 2), (2017, 3, 1)).unwrap_err();
        assert!(matches!(err, RequestError::InvertedRange { .. }));
    }

    #[test]
    fn test_new_rejects_invalid_bounds() {
        let err = TimeRange::new((2017, 2, 30), (2017, 3, 1)).unwrap_err();
        assert!(matches!(err, RequestError::InvalidTimestamp { bound: "start" }));

        let err = TimeRange::new("2017-03-01", "yesterday").unwrap_err();
        assert!(matches!(err, RequestError::InvalidTimestamp { bound: "end" }));
    }

    #[test]
    fn test_contains() {
        let range = TimeRange::for_period(Year(2017)).unwrap();
        assert!(range.contains((2017, 6, 1, 12, 0, 0).into_timestamp().unwrap()));
        assert!(range.contains(range.end()));
        assert!(!range.contains((2016, 12, 31, 23, 45, 0).into_timestamp().unwrap()));
    }
}
