use crate::parser::error::ParseError;
use crate::types::catalog::VariableKey;

pub(crate) const TIME_FIELDS: [&str; 5] = ["year", "month", "day", "hour", "minute"];

/// Row offsets of the time components and the requested keys for one response.
///
/// Lives for a single parse: header layout can change between responses.
#[derive(Debug)]
pub(crate) struct ColumnIndex {
    /// Offsets of `year`, `month`, `day`, `hour`, `minute`, in that order.
    pub(crate) time: [usize; 5],
    /// Offsets of the requested keys, in request order.
    pub(crate) keys: Vec<usize>,
}

impl ColumnIndex {
    /// Resolves every requested key before the time fields, so that an unknown
    /// key is reported even when the header is otherwise unusable.
    pub(crate) fn resolve(header: &[&str], keys: &[VariableKey]) -> Result<Self, ParseError> {
        let keys = keys
            .iter()
            .map(|key| {
                position(header, key.as_str())
                    .ok_or_else(|| ParseError::UnknownField(key.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut time = [0; 5];
        for (slot, name) in time.iter_mut().zip(TIME_FIELDS) {
            *slot = position(header, name).ok_or(ParseError::MissingTimeField(name))?;
        }

        Ok(Self { time, keys })
    }

    /// Largest offset any row must reach.
    pub(crate) fn max_index(&self) -> usize {
        self.time
            .iter()
            .chain(self.keys.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// First position of `name`; column 0 is reserved and never counts as a match.
fn position(header: &[&str], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|field| *field == name)
        .filter(|idx| *idx > 0)
}
