//! Normalizes the different ways a caller can name a point in time into the one
//! timestamp type the rest of the crate works with.
//!
//! The weather machine reports tower-local wall clock time without any zone
//! information, so the canonical type is [`NaiveDateTime`]. Zoned inputs keep
//! their own wall clock and drop the offset; `DateTime<Utc>` therefore yields
//! UTC wall clock time.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

/// The canonical timestamp used by [`crate::TimeRange`] and [`crate::SeriesSet`].
pub type Timestamp = NaiveDateTime;

/// Conversion into the canonical [`Timestamp`].
///
/// Returns `None` when the input does not describe a valid date and time
/// (e.g. `(2017, 2, 30)` or an unparsable string).
///
/// # Examples
///
/// ```
/// use weathermachine::IntoTimestamp;
/// use chrono::NaiveDate;
///
/// let from_tuple = (2017, 3, 1).into_timestamp().unwrap();
/// let from_date = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap().into_timestamp().unwrap();
/// assert_eq!(from_tuple, from_date);
/// assert!((2017, 2, 30).into_timestamp().is_none());
/// ```
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Option<Timestamp>;
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Option<Timestamp> {
        Some(self)
    }
}

/// A bare date means midnight at the start of that day.
impl IntoTimestamp for NaiveDate {
    fn into_timestamp(self) -> Option<Timestamp> {
        self.and_hms_opt(0, 0, 0)
    }
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Option<Timestamp> {
        Some(self.naive_utc())
    }
}

impl IntoTimestamp for DateTime<Local> {
    fn into_timestamp(self) -> Option<Timestamp> {
        Some(self.naive_local())
    }
}

impl IntoTimestamp for DateTime<FixedOffset> {
    fn into_timestamp(self) -> Option<Timestamp> {
        Some(self.naive_local())
    }
}

impl IntoTimestamp for (i32, u32, u32) {
    fn into_timestamp(self) -> Option<Timestamp> {
        NaiveDate::from_ymd_opt(self.0, self.1, self.2)?.into_timestamp()
    }
}

impl IntoTimestamp for (i32, u32, u32, u32, u32, u32) {
    fn into_timestamp(self) -> Option<Timestamp> {
        NaiveDate::from_ymd_opt(self.0, self.1, self.2)?.and_hms_opt(self.3, self.4, self.5)
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Option<Timestamp> {
        // Zoned forms keep their local wall clock, same as the DateTime impls above
        if let Ok(dt) = DateTime::parse_from_rfc3339(self) {
            return dt.into_timestamp();
        }
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(self, "%Y-%m-%d %H:%M:%S") {
            return Some(naive_dt);
        }
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(self, "%Y-%m-%dT%H:%M:%S") {
            return Some(naive_dt);
        }
        if let Ok(naive_date) = NaiveDate::parse_from_str(self, "%Y-%m-%d") {
            return naive_date.into_timestamp();
        }
        None
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Option<Timestamp> {
        self.as_str().into_timestamp()
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Option<Timestamp> {
        self.as_str().into_timestamp()
    }
}
