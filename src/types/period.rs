use crate::types::time_range::TimeRange;
use chrono::{Days, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar year of tower time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month as `(year, month)`, month 1-based.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self(year, month)
    }

    pub fn year(self) -> i32 {
        self.0
    }

    pub fn month(self) -> u32 {
        self.1
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// A calendar period that can be expressed as a [`TimeRange`].
///
/// The range runs from midnight at the start of the period to midnight at the
/// start of the next one. The weather machine only accepts full-day boundaries,
/// so this is the smallest request that still covers the last day completely.
pub trait DateTimePeriod {
    fn get_datetime_period(self) -> Option<TimeRange>;
}

impl DateTimePeriod for NaiveDate {
    fn get_datetime_period(self) -> Option<TimeRange> {
        let next = self.checked_add_days(Days::new(1))?;
        TimeRange::new(self, next).ok()
    }
}

impl DateTimePeriod for Month {
    fn get_datetime_period(self) -> Option<TimeRange> {
        let start = NaiveDate::from_ymd_opt(self.year(), self.month(), 1)?;
        let next = if self.month() == 12 {
            NaiveDate::from_ymd_opt(self.year().checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year(), self.month() + 1, 1)?
        };
        TimeRange::new(start, next).ok()
    }
}

impl DateTimePeriod for Year {
    fn get_datetime_period(self) -> Option<TimeRange> {
        let start = NaiveDate::from_ymd_opt(self.0, 1, 1)?;
        let next = NaiveDate::from_ymd_opt(self.0.checked_add(1)?, 1, 1)?;
        TimeRange::new(start, next).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::IntoTimestamp;

    #[test]
    fn test_month_period() {
        let range = Month(2017, 3).get_datetime_period().unwrap();
        assert_eq!(range.start(), (2017, 3, 1).into_timestamp().unwrap());
        assert_eq!(range.end(), (2017, 4, 1).into_timestamp().unwrap());

        let december = Month(2016, 12).get_datetime_period().unwrap();
        assert_eq!(december.end(), (2017, 1, 1).into_timestamp().unwrap());

        assert!(Month(2017, 13).get_datetime_period().is_none());
    }

    #[test]
    fn test_day_and_year_period() {
        let day = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let range = day.get_datetime_period().unwrap();
        assert_eq!(range.end(), (2020, 3, 1).into_timestamp().unwrap());

        let year = Year(2019).get_datetime_period().unwrap();
        assert_eq!(year.start(), (2019, 1, 1).into_timestamp().unwrap());
        assert_eq!(year.end(), (2020, 1, 1).into_timestamp().unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(Month::new(2017, 3), Month(2017, 3));
        assert_eq!(Month::new(2017, 3).to_string(), "2017-03");
        assert_eq!(Year(817).to_string(), "0817");
    }
}
