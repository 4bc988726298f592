use thiserror::Error;

/// Failure to turn a raw weather machine response into a [`crate::SeriesSet`].
///
/// Line numbers are 1-based positions in the raw text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed input: expected at least {expected} lines, found {found}")]
    TooFewLines { expected: usize, found: usize },

    #[error("Malformed input: time field '{0}' is missing from the header")]
    MissingTimeField(&'static str),

    #[error("Malformed input: line {line} has {cells} cells, column {index} is out of range")]
    RowTooShort {
        line: usize,
        cells: usize,
        index: usize,
    },

    #[error("Malformed input: line {line} has {cells} cells, header has {expected}")]
    RowWidthMismatch {
        line: usize,
        cells: usize,
        expected: usize,
    },

    #[error("Malformed input: line {line}, field '{field}': cannot parse '{value}' as a number")]
    InvalidNumber {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Malformed input: line {line} does not describe a valid date and time")]
    InvalidTimestamp { line: usize },

    #[error("Malformed input: line {line} cannot be read as a tab-separated record: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Unknown field: '{0}' is not present in the response header")]
    UnknownField(String),
}

impl ParseError {
    /// True for structural violations of the tabular layout, false for
    /// [`ParseError::UnknownField`].
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ParseError::UnknownField(_))
    }
}
