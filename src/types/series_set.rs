//! The parsed, normalized result of one weather machine response.

use crate::types::catalog::VariableKey;
use crate::types::time_range::TimeRange;
use crate::types::timestamp::Timestamp;

/// How raw cells of a variable were turned into the stored values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Plain decimal, stored as read.
    None,
    /// Compressed Celsius (`celsius * scale`) converted to degrees Fahrenheit.
    CelsiusToFahrenheit { scale: f64 },
}

impl Conversion {
    pub fn apply(&self, raw: f64) -> f64 {
        match self {
            Conversion::None => raw,
            Conversion::CelsiusToFahrenheit { scale } => {
                let celsius = raw / scale;
                celsius * 180.0 / 100.0 + 32.0
            }
        }
    }
}

/// One variable's values, index-aligned with [`SeriesSet::timestamps`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    key: VariableKey,
    source_unit: String,
    conversion: Conversion,
    values: Vec<f64>,
}

impl Series {
    pub(crate) fn new(key: VariableKey, source_unit: String, conversion: Conversion) -> Self {
        Self {
            key,
            source_unit,
            conversion,
            values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn key(&self) -> &VariableKey {
        &self.key
    }

    /// Unit string from the response's unit header, before any conversion.
    pub fn source_unit(&self) -> &str {
        &self.source_unit
    }

    /// Unit of the stored values, suitable for an axis label.
    pub fn unit(&self) -> &str {
        match self.conversion {
            Conversion::None => &self.source_unit,
            Conversion::CelsiusToFahrenheit { .. } => "deg F",
        }
    }

    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Time-indexed series for every requested variable.
///
/// Every series holds exactly one value per entry of [`timestamps`](Self::timestamps);
/// `timestamps()[i]` is the sample time of `get(key)[i]` for every key.
/// Missing readings are stored as `0.0`, so a missing sample cannot be told apart
/// from a true zero reading.
///
/// A `SeriesSet` is never modified after the parse that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    timestamps: Vec<Timestamp>,
    series: Vec<Series>,
}

impl SeriesSet {
    pub(crate) fn new(timestamps: Vec<Timestamp>, series: Vec<Series>) -> Self {
        debug_assert!(series.iter().all(|s| s.values.len() == timestamps.len()));
        Self { timestamps, series }
    }

    /// Sample times in source order (not re-sorted).
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Number of samples (data rows).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Requested keys in request order.
    pub fn keys(&self) -> impl Iterator<Item = &VariableKey> {
        self.series.iter().map(|s| &s.key)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get_series(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key.as_str() == key)
    }

    /// Values of `key`, or `None` if it was not requested.
    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.get_series(key).map(Series::values)
    }

    /// Smallest range containing every sample, `None` when there are no samples.
    pub fn covered_range(&self) -> Option<TimeRange> {
        let start = self.timestamps.iter().min()?;
        let end = self.timestamps.iter().max()?;
        TimeRange::from_timestamps(*start, *end).ok()
    }
}
