//! Parses the tab-separated text returned by the weather machine into a
//! [`SeriesSet`].
//!
//! Layout of a response:
//!
//! ```text
//! line 1-5   banner, ignored
//! line 6     field names, tab separated
//! line 7     units, tab separated
//! line 8..   one row per 15-minute sample, optionally followed by blank lines
//! ```

use crate::parser::column_index::ColumnIndex;
use crate::parser::error::ParseError;
use crate::types::catalog::VariableKey;
use crate::types::series_set::{Conversion, Series, SeriesSet};
use crate::types::timestamp::Timestamp;
use chrono::NaiveDate;
use csv::{Position, StringRecord, Terminator};
use log::debug;
use serde::{Deserialize, Serialize};

const BANNER_LINES: usize = 5;
const HEADER_LINE: usize = BANNER_LINES;
const UNIT_LINE: usize = BANNER_LINES + 1;
const FIRST_DATA_LINE: usize = BANNER_LINES + 2;

/// Tunables of [`SeriesParser`]. The defaults match the LANL source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Cell content marking an absent reading.
    pub missing_marker: String,
    /// Keys starting with this prefix hold temperatures to convert to Fahrenheit.
    pub temperature_prefix: String,
    /// Temperatures are sent as `celsius * temperature_scale`.
    pub temperature_scale: f64,
    /// Reject rows whose cell count differs from the header's, not only rows
    /// that are too short for the requested columns.
    pub strict_width: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            missing_marker: "*".to_string(),
            temperature_prefix: "temp".to_string(),
            temperature_scale: 100.0,
            strict_width: false,
        }
    }
}

/// Stateless parser for weather machine responses.
///
/// Each call to [`parse`](Self::parse) is independent, so one parser can be
/// shared between threads.
///
/// # Examples
///
/// ```
/// use weathermachine::SeriesParser;
///
/// let raw = "b1\nb2\nb3\nb4\nb5\n\
///            idx0\tyear\tmonth\tday\thour\tminute\tspd1\ttemp0\n\
///            \t\t\t\t\t\tm/s\tdeg C\n\
///            0\t2017\t3\t1\t0\t15\t4.2\t1500\n";
///
/// let set = SeriesParser::default().parse(raw, &["spd1".into(), "temp0".into()]).unwrap();
/// assert_eq!(set.timestamps()[0].to_string(), "2017-03-01 00:15:00");
/// assert_eq!(set.get("spd1"), Some(&[4.2][..]));
/// assert_eq!(set.get("temp0"), Some(&[59.0][..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeriesParser {
    options: ParserOptions,
}

impl SeriesParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Conversion applied to every non-missing cell of `key`.
    pub fn conversion_for(&self, key: &VariableKey) -> Conversion {
        if key.as_str().starts_with(&self.options.temperature_prefix) {
            Conversion::CelsiusToFahrenheit {
                scale: self.options.temperature_scale,
            }
        } else {
            Conversion::None
        }
    }

    /// Parses `raw` and extracts one series per entry of `keys`.
    ///
    /// Missing cells (empty or the missing marker) become `0.0`. Duplicate keys
    /// are collapsed to their first occurrence.
    ///
    /// # Errors
    ///
    /// * [`ParseError::TooFewLines`] when the header block is incomplete.
    /// * [`ParseError::UnknownField`] when a key is not in the header. This is
    ///   checked before any data row is read.
    /// * [`ParseError::MissingTimeField`] when a time component column is absent.
    /// * [`ParseError::RowTooShort`], [`ParseError::RowWidthMismatch`],
    ///   [`ParseError::InvalidNumber`] or [`ParseError::InvalidTimestamp`] for
    ///   bad data rows.
    /// * [`ParseError::InvalidRecord`] when the tab reader itself rejects a row.
    ///
    /// Nothing is returned on failure; a bad row anywhere discards the whole parse.
    pub fn parse(&self, raw: &str, keys: &[VariableKey]) -> Result<SeriesSet, ParseError> {
        let lines: Vec<&str> = raw.lines().collect();
        if lines.len() < FIRST_DATA_LINE {
            return Err(ParseError::TooFewLines {
                expected: FIRST_DATA_LINE,
                found: lines.len(),
            });
        }

        let mut requested: Vec<VariableKey> = Vec::with_capacity(keys.len());
        for key in keys {
            if !requested.contains(key) {
                requested.push(key.clone());
            }
        }

        let header: Vec<&str> = lines[HEADER_LINE].split('\t').map(str::trim).collect();
        let units: Vec<&str> = lines[UNIT_LINE].split('\t').map(str::trim).collect();
        let index = ColumnIndex::resolve(&header, &requested)?;
        let max_index = index.max_index();

        let mut timestamps: Vec<Timestamp> = Vec::new();
        let mut series: Vec<Series> = requested
            .iter()
            .zip(&index.keys)
            .map(|(key, &col)| {
                let unit = units.get(col).copied().unwrap_or_default().to_string();
                Series::new(key.clone(), unit, self.conversion_for(key))
            })
            .collect();

        // Blank lines never reach the reader; `source_lines[i]` is the 1-based
        // raw line of the reader's line `i + 1`.
        let (source_lines, rows): (Vec<usize>, Vec<&str>) = lines
            .iter()
            .enumerate()
            .skip(FIRST_DATA_LINE)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| (idx + 1, *line))
            .unzip();
        let data = rows.join("\n");

        // Raw tab reader: no quoting, no trimming, ragged rows allowed so the
        // width checks below can report them.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(data.as_bytes());

        let mut record = StringRecord::new();
        while reader
            .read_record(&mut record)
            .map_err(|e| record_error(e, &source_lines))?
        {
            let line_no = source_line(record.position(), &source_lines);

            if record.len() <= max_index {
                return Err(ParseError::RowTooShort {
                    line: line_no,
                    cells: record.len(),
                    index: max_index,
                });
            }
            if self.options.strict_width && record.len() != header.len() {
                return Err(ParseError::RowWidthMismatch {
                    line: line_no,
                    cells: record.len(),
                    expected: header.len(),
                });
            }

            timestamps.push(row_timestamp(&record, &index, line_no)?);

            for (s, &col) in series.iter_mut().zip(&index.keys) {
                let value = self.cell_value(&record[col], s.conversion(), s.key(), line_no)?;
                s.push(value);
            }
        }

        debug!(
            "Parsed {} rows for {} keys",
            timestamps.len(),
            series.len()
        );
        Ok(SeriesSet::new(timestamps, series))
    }

    fn cell_value(
        &self,
        cell: &str,
        conversion: Conversion,
        key: &VariableKey,
        line: usize,
    ) -> Result<f64, ParseError> {
        let cell = cell.trim();
        if cell.is_empty() || cell == self.options.missing_marker {
            return Ok(0.0);
        }
        let raw = cell
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                line,
                field: key.to_string(),
                value: cell.to_string(),
            })?;
        Ok(conversion.apply(raw))
    }
}

/// Raw line of a reader position, falling back to the first data line.
fn source_line(position: Option<&Position>, source_lines: &[usize]) -> usize {
    position
        .and_then(|p| usize::try_from(p.line()).ok())
        .and_then(|line| line.checked_sub(1))
        .and_then(|idx| source_lines.get(idx).copied())
        .unwrap_or(FIRST_DATA_LINE + 1)
}

fn record_error(err: csv::Error, source_lines: &[usize]) -> ParseError {
    ParseError::InvalidRecord {
        line: source_line(err.position(), source_lines),
        message: err.to_string(),
    }
}

fn row_timestamp(
    record: &StringRecord,
    index: &ColumnIndex,
    line: usize,
) -> Result<Timestamp, ParseError> {
    let [year, month, day, hour, minute] = index.time;

    let int_cell = |col: usize, field: &str| -> Result<i64, ParseError> {
        let cell = record[col].trim();
        cell.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            line,
            field: field.to_string(),
            value: cell.to_string(),
        })
    };

    let year = int_cell(year, "year")?;
    let month = int_cell(month, "month")?;
    let day = int_cell(day, "day")?;
    let hour = int_cell(hour, "hour")?;
    let minute = int_cell(minute, "minute")?;

    let invalid = || ParseError::InvalidTimestamp { line };
    NaiveDate::from_ymd_opt(
        i32::try_from(year).map_err(|_| invalid())?,
        u32::try_from(month).map_err(|_| invalid())?,
        u32::try_from(day).map_err(|_| invalid())?,
    )
    .and_then(|date| {
        date.and_hms_opt(
            u32::try_from(hour).ok()?,
            u32::try_from(minute).ok()?,
            0,
        )
    })
    .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::IntoTimestamp;

    const BANNER: &str = "Los Alamos Weather Machine\n\
                          Tower: ta54\n\
                          15 minute data\n\
                          \n\
                          Generated for testing\n";

    fn raw(header: &str, units: &str, rows: &[&str]) -> String {
        let mut text = format!("{BANNER}{header}\n{units}\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    fn keys(names: &[&str]) -> Vec<VariableKey> {
        names.iter().map(|n| VariableKey::from(*n)).collect()
    }

    const HEADER: &str = "idx0\tyear\tmonth\tday\thour\tminute\tspd1\tdir1\ttemp0\tstemp1";
    const UNITS: &str = "\t\t\t\t\t\tm/s\tdeg\tdeg C\tdeg C";

    #[test]
    fn test_end_to_end_example() {
        let text = raw(
            "idx0\tyear\tmonth\tday\thour\tminute\tspd1\ttemp0",
            "\t\t\t\t\t\tm/s\tdeg C",
            &["0\t2017\t3\t1\t0\t15\t4.2\t1500"],
        );
        let set = SeriesParser::default()
            .parse(&text, &keys(&["spd1", "temp0"]))
            .unwrap();

        assert_eq!(
            set.timestamps(),
            [(2017, 3, 1, 0, 15, 0).into_timestamp().unwrap()]
        );
        assert_eq!(set.get("spd1"), Some(&[4.2][..]));
        assert_eq!(set.get("temp0"), Some(&[59.0][..]));
    }

    #[test]
    fn test_series_aligned_with_timestamps() {
        let text = raw(
            HEADER,
            UNITS,
            &[
                "0\t2017\t3\t1\t0\t0\t4.2\t270\t1500\t800",
                "1\t2017\t3\t1\t0\t15\t3.8\t265\t1490\t801",
                "2\t2017\t3\t1\t0\t30\t*\t260\t1480\t802",
                "3\t2017\t3\t1\t0\t45\t5.5\t\t1470\t803",
                "",
                "   ",
            ],
        );
        let set = SeriesParser::default()
            .parse(&text, &keys(&["spd1", "dir1", "temp0", "stemp1"]))
            .unwrap();

        assert_eq!(set.len(), 4);
        for key in ["spd1", "dir1", "temp0", "stemp1"] {
            assert_eq!(set.get(key).unwrap().len(), 4, "length of {key}");
        }
        assert_eq!(set.get("spd1"), Some(&[4.2, 3.8, 0.0, 5.5][..]));
        assert_eq!(set.get("dir1"), Some(&[270.0, 265.0, 260.0, 0.0][..]));
        // Only the `temp` prefix converts; soil temperatures stay as sent.
        assert_eq!(set.get("stemp1"), Some(&[800.0, 801.0, 802.0, 803.0][..]));
        assert_eq!(set.get("temp0").unwrap()[0], 59.0);
        assert_eq!(
            set.timestamps()[3],
            (2017, 3, 1, 0, 45, 0).into_timestamp().unwrap()
        );
    }

    #[test]
    fn test_temperature_conversion() {
        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\t5.5\t90\t2000\t0"]);
        let set = SeriesParser::default()
            .parse(&text, &keys(&["temp0", "spd1"]))
            .unwrap();
        assert_eq!(set.get("temp0"), Some(&[68.0][..]));
        assert_eq!(set.get("spd1"), Some(&[5.5][..]));

        let series = set.get_series("temp0").unwrap();
        assert_eq!(series.source_unit(), "deg C");
        assert_eq!(series.unit(), "deg F");
    }

    #[test]
    fn test_custom_options() {
        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\tNA\t90\t20\t0"]);
        let parser = SeriesParser::new(ParserOptions {
            missing_marker: "NA".to_string(),
            temperature_scale: 1.0,
            ..ParserOptions::default()
        });
        let set = parser.parse(&text, &keys(&["spd1", "temp0"])).unwrap();
        assert_eq!(set.get("spd1"), Some(&[0.0][..]));
        assert_eq!(set.get("temp0"), Some(&[68.0][..]));
    }

    #[test]
    fn test_trailing_empty_cell_is_missing() {
        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\t4.2\t90\t1500\t"]);
        let set = SeriesParser::default()
            .parse(&text, &keys(&["stemp1"]))
            .unwrap();
        assert_eq!(set.get("stemp1"), Some(&[0.0][..]));
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\t4.2\t90\t1500\t800"])
            .replace('\n', "\r\n");
        let set = SeriesParser::default()
            .parse(&text, &keys(&["stemp1", "spd1"]))
            .unwrap();
        assert_eq!(set.get("stemp1"), Some(&[800.0][..]));
        assert_eq!(set.get("spd1"), Some(&[4.2][..]));
    }

    #[test]
    fn test_too_few_lines() {
        let text = format!("{BANNER}{HEADER}\n");
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::TooFewLines {
                expected: 7,
                found: 6
            }
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn test_header_only_gives_empty_set() {
        let text = raw(HEADER, UNITS, &[]);
        let set = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap();
        assert!(set.is_empty());
        assert_eq!(set.get("spd1"), Some(&[][..]));
    }

    #[test]
    fn test_unknown_field_before_rows() {
        // The broken row would fail on its own; the header check comes first.
        let text = raw(HEADER, UNITS, &["garbage"]);
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1", "rh"]))
            .unwrap_err();
        assert_eq!(err, ParseError::UnknownField("rh".to_string()));
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_missing_time_field() {
        let text = raw(
            "idx0\tyear\tmonth\tday\thour\tspd1",
            "",
            &["0\t2017\t3\t1\t0\t4.2"],
        );
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap_err();
        assert_eq!(err, ParseError::MissingTimeField("minute"));
    }

    #[test]
    fn test_short_row() {
        let text = raw(
            HEADER,
            UNITS,
            &[
                "0\t2017\t3\t1\t0\t0\t4.2\t90\t1500\t800",
                "1\t2017\t3\t1\t0\t15\t4.2",
            ],
        );
        let err = SeriesParser::default()
            .parse(&text, &keys(&["temp0"]))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::RowTooShort {
                line: 9,
                cells: 7,
                index: 8
            }
        );
    }

    #[test]
    fn test_strict_width() {
        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\t4.2"]);
        let lenient = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap();
        assert_eq!(lenient.len(), 1);

        let strict = SeriesParser::new(ParserOptions {
            strict_width: true,
            ..ParserOptions::default()
        });
        let err = strict.parse(&text, &keys(&["spd1"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::RowWidthMismatch {
                line: 8,
                cells: 7,
                expected: 10
            }
        );
    }

    #[test]
    fn test_invalid_number() {
        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\tfast\t90\t1500\t800"]);
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 8,
                field: "spd1".to_string(),
                value: "fast".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        let text = raw(HEADER, UNITS, &["0\t2017\t2\t30\t0\t0\t4.2\t90\t1500\t800"]);
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap_err();
        assert_eq!(err, ParseError::InvalidTimestamp { line: 8 });

        let text = raw(HEADER, UNITS, &["0\t2017\t*\t1\t0\t0\t4.2\t90\t1500\t800"]);
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { ref field, .. } if field == "month"));
    }

    #[test]
    fn test_quotes_are_plain_cell_content() {
        // An unbalanced quote must not swallow the following cells or rows.
        let text = raw(
            HEADER,
            UNITS,
            &[
                "0\t2017\t3\t1\t0\t0\t4.2\t\"N\t1500\t800",
                "1\t2017\t3\t1\t0\t15\t3.8\t265\t1490\t801",
            ],
        );
        let set = SeriesParser::default()
            .parse(&text, &keys(&["spd1", "stemp1"]))
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("stemp1"), Some(&[800.0, 801.0][..]));

        let text = raw(HEADER, UNITS, &["0\t2017\t3\t1\t0\t0\t\"4.2\"\t90\t1500\t800"]);
        let err = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 8,
                field: "spd1".to_string(),
                value: "\"4.2\"".to_string()
            }
        );
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        let text = raw(
            HEADER,
            UNITS,
            &[
                "0\t2017\t3\t1\t0\t0\t4.2\t90\t1500\t800",
                "",
                " \t ",
                "1\t2017\t3\t1\t0\t15\t4.2\t90\toops\t800",
            ],
        );
        let err = SeriesParser::default()
            .parse(&text, &keys(&["temp0"]))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 11,
                field: "temp0".to_string(),
                value: "oops".to_string()
            }
        );
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = raw(
            HEADER,
            UNITS,
            &[
                "0\t2017\t3\t1\t0\t0\t4.2\t270\t1500\t800",
                "1\t2017\t3\t1\t0\t15\t*\t265\t\t801",
            ],
        );
        let parser = SeriesParser::default();
        let requested = keys(&["spd1", "temp0", "spd1"]);
        let first = parser.parse(&text, &requested).unwrap();
        let second = parser.parse(&text, &requested).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.series().len(), 2);
    }

    #[test]
    fn test_rows_keep_source_order() {
        let text = raw(
            HEADER,
            UNITS,
            &[
                "0\t2017\t3\t1\t1\t0\t1\t0\t0\t0",
                "1\t2017\t3\t1\t0\t0\t2\t0\t0\t0",
            ],
        );
        let set = SeriesParser::default()
            .parse(&text, &keys(&["spd1"]))
            .unwrap();
        assert!(set.timestamps()[0] > set.timestamps()[1]);
        assert_eq!(set.get("spd1"), Some(&[1.0, 2.0][..]));
    }
}
