//! Polars export of a [`SeriesSet`] and the `TowerLazyFrame` wrapper for
//! lazy filtering of it.

use crate::request::error::RequestError;
use crate::types::period::DateTimePeriod;
use crate::types::series_set::SeriesSet;
use crate::types::time_range::TimeRange;
use crate::types::timestamp::IntoTimestamp;
use polars::prelude::*;

/// Name of the timestamp column in exported frames.
pub const COL_DATETIME: &str = "datetime";

impl SeriesSet {
    /// Collects the set into a `DataFrame` with a `datetime` column
    /// (`Datetime(Milliseconds)`, tower-local, no zone) followed by one `f64`
    /// column per key in request order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let millis: Vec<i64> = self
            .timestamps()
            .iter()
            .map(|ts| ts.and_utc().timestamp_millis())
            .collect();
        let datetime = Series::new(COL_DATETIME.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let mut columns: Vec<Column> = Vec::with_capacity(self.series().len() + 1);
        columns.push(datetime.into());
        for series in self.series() {
            columns.push(Column::new(series.key().as_str().into(), series.values()));
        }
        DataFrame::new(columns)
    }

    pub fn to_lazy_frame(&self) -> PolarsResult<TowerLazyFrame> {
        Ok(TowerLazyFrame::new(self.to_dataframe()?.lazy()))
    }
}

/// A Polars `LazyFrame` holding tower data as produced by
/// [`SeriesSet::to_lazy_frame`].
///
/// The `datetime` column is timezone-naive tower time, so the range filters
/// compare against naive timestamps as well.
#[derive(Clone)]
pub struct TowerLazyFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl TowerLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Applies an arbitrary predicate lazily, leaving `self` unchanged.
    ///
    /// ```
    /// # use weathermachine::SeriesParser;
    /// use polars::prelude::{col, lit};
    ///
    /// # let raw = "b\nb\nb\nb\nb\nidx0\tyear\tmonth\tday\thour\tminute\tspd1\n\n\
    /// #            0\t2017\t3\t1\t0\t0\t4.2\n1\t2017\t3\t1\t0\t15\t12.5\n";
    /// let set = SeriesParser::default().parse(raw, &["spd1".into()]).unwrap();
    /// let windy = set.to_lazy_frame().unwrap().filter(col("spd1").gt(lit(10.0)));
    /// assert_eq!(windy.frame.collect().unwrap().height(), 1);
    /// ```
    pub fn filter(&self, predicate: Expr) -> TowerLazyFrame {
        TowerLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps rows with `start <= datetime <= end`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTimestamp`] if a bound cannot be resolved
    /// and [`RequestError::InvertedRange`] if `start > end`.
    pub fn get_range(
        &self,
        start: impl IntoTimestamp,
        end: impl IntoTimestamp,
    ) -> Result<TowerLazyFrame, RequestError> {
        let range = TimeRange::new(start, end)?;
        Ok(self.filter_range(range))
    }

    /// Keeps rows inside a calendar period (see [`DateTimePeriod`]).
    pub fn get_for_period(
        &self,
        period: impl DateTimePeriod,
    ) -> Result<TowerLazyFrame, RequestError> {
        Ok(self.filter_range(TimeRange::for_period(period)?))
    }

    pub fn filter_range(&self, range: TimeRange) -> TowerLazyFrame {
        self.filter(
            col(COL_DATETIME)
                .gt_eq(lit(range.start()))
                .and(col(COL_DATETIME).lt_eq(lit(range.end()))),
        )
    }
}
