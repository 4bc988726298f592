use crate::request::error::RequestError;
use crate::types::catalog::{Catalog, StationId, VariableKey};
use crate::types::time_range::TimeRange;
use crate::types::timestamp::IntoTimestamp;
use chrono::Datelike;
use log::{debug, warn};

/// Roughly the widest window the weather machine answers in one request.
/// Wider ranges are silently truncated or rejected by the source; splitting them
/// is left to the caller.
pub const MAX_WINDOW_DAYS: i64 = 92;

/// A validated request for 15-minute data from one tower.
///
/// Only [`RequestBuilder`] creates these, so the keys are never empty and all
/// belong to the builder's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataRequest {
    station: StationId,
    keys: Vec<VariableKey>,
    range: TimeRange,
}

impl DataRequest {
    pub fn station(&self) -> &StationId {
        &self.station
    }

    pub fn keys(&self) -> &[VariableKey] {
        &self.keys
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// The comma-joined key list sent as the `checkbox` field.
    pub fn checkbox(&self) -> String {
        self.keys
            .iter()
            .map(VariableKey::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Form fields in the order the weather machine's download page submits them.
    ///
    /// Hours and minutes are always `"00"`: requests cover whole days.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let start = self.range.start();
        let end = self.range.end();
        vec![
            ("tower", self.station.to_string()),
            ("format", "tab".to_string()),
            ("type", "15".to_string()),
            ("access", "extend".to_string()),
            ("SUBMIT_SIGNALS", "Download Data".to_string()),
            ("startyear", format!("{:04}", start.year())),
            ("startmonth", format!("{:02}", start.month())),
            ("startday", format!("{:02}", start.day())),
            ("starthour", "00".to_string()),
            ("startminute", "00".to_string()),
            ("endyear", format!("{:04}", end.year())),
            ("endmonth", format!("{:02}", end.month())),
            ("endday", format!("{:02}", end.day())),
            ("endhour", "00".to_string()),
            ("endminute", "00".to_string()),
            ("checkbox", self.checkbox()),
        ]
    }

    /// Stable file name for the raw capture of this request.
    ///
    /// The key list is folded into a hash so that the name stays short even when
    /// the whole catalog is requested.
    pub fn cache_file_name(&self) -> String {
        format!(
            "{}_{}_{}_{:016x}.tsv",
            self.station,
            self.range.start().format("%Y%m%d"),
            self.range.end().format("%Y%m%d"),
            fnv1a(self.checkbox().as_bytes())
        )
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Validates caller input against a [`Catalog`] and produces [`DataRequest`]s.
///
/// # Examples
///
/// ```
/// use weathermachine::{RequestBuilder, TimeRange};
///
/// let builder = RequestBuilder::default();
/// let range = TimeRange::new((2017, 3, 1), (2017, 3, 15)).unwrap();
/// let request = builder.build("ta54", ["spd1", "dir1", "temp0"], range).unwrap();
///
/// assert_eq!(request.checkbox(), "spd1,dir1,temp0");
/// assert!(request
///     .form_fields()
///     .contains(&("startmonth", "03".to_string())));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    catalog: Catalog,
}

impl RequestBuilder {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Builds a request for `keys` at `station` covering `range`.
    ///
    /// Duplicate keys are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// * [`RequestError::EmptyKeys`] if no keys are given.
    /// * [`RequestError::EmptyStation`] if the station code is blank.
    ///
    /// Surrounding whitespace is stripped from the station code.
    /// * [`RequestError::UnknownKey`] for the first key missing from the catalog.
    ///
    /// Unknown stations are accepted (the station list is advisory) with a warning.
    pub fn build<K>(
        &self,
        station: impl Into<StationId>,
        keys: impl IntoIterator<Item = K>,
        range: TimeRange,
    ) -> Result<DataRequest, RequestError>
    where
        K: Into<VariableKey>,
    {
        let station = StationId::new(station.into().as_str().trim());
        let mut unique: Vec<VariableKey> = Vec::new();
        for key in keys {
            let key = key.into();
            if unique.contains(&key) {
                debug!("Dropping duplicate key '{}' from request", key);
                continue;
            }
            unique.push(key);
        }

        if unique.is_empty() {
            return Err(RequestError::EmptyKeys);
        }
        if station.as_str().is_empty() {
            return Err(RequestError::EmptyStation);
        }
        if let Some(unknown) = unique
            .iter()
            .find(|k| !self.catalog.contains_variable(k.as_str()))
        {
            return Err(RequestError::UnknownKey(unknown.to_string()));
        }

        if !self.catalog.contains_station(station.as_str()) {
            warn!(
                "Station '{}' is not in the station catalog, requesting it anyway",
                station
            );
        }
        if range.duration().num_days() > MAX_WINDOW_DAYS {
            warn!(
                "Range {} spans {} days; the weather machine may truncate requests longer than {} days",
                range,
                range.duration().num_days(),
                MAX_WINDOW_DAYS
            );
        }

        Ok(DataRequest {
            station,
            keys: unique,
            range,
        })
    }

    /// Like [`build`](Self::build), but takes the bounds in any form accepted by
    /// [`IntoTimestamp`].
    ///
    /// # Errors
    ///
    /// Additionally returns [`RequestError::InvertedRange`] when `start > end` and
    /// [`RequestError::InvalidTimestamp`] when a bound is not a valid date.
    pub fn build_from<K>(
        &self,
        station: impl Into<StationId>,
        keys: impl IntoIterator<Item = K>,
        start: impl IntoTimestamp,
        end: impl IntoTimestamp,
    ) -> Result<DataRequest, RequestError>
    where
        K: Into<VariableKey>,
    {
        let range = TimeRange::new(start, end)?;
        self.build(station, keys, range)
    }
}
