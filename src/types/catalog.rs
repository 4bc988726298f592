//! Identifiers for towers and measured variables, and the catalog describing
//! which of them the weather machine is known to serve.
//!
//! The catalog is plain configuration data. [`Catalog::default`] holds the LANL
//! list, and a different catalog can be handed to [`crate::RequestBuilder`] (or
//! loaded from JSON through [`crate::WeatherMachineConfig`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one measured quantity, e.g. `"spd1"` (wind speed at 12 m).
///
/// Any string can be wrapped; whether it is a known variable is decided by
/// [`Catalog::contains_variable`] when a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableKey(String);

impl VariableKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariableKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for VariableKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for VariableKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Short code of a tower, e.g. `"ta54"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for StationId {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// A variable the weather machine can report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub key: VariableKey,
    pub description: String,
}

/// A tower offering 15-minute reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub id: StationId,
    pub description: String,
}

/// The closed set of variables and the advisory set of stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub variables: Vec<VariableInfo>,
    /// Not verified against the live source; unknown stations are only warned about.
    pub stations: Vec<StationInfo>,
}

impl Catalog {
    pub fn new(variables: Vec<VariableInfo>, stations: Vec<StationInfo>) -> Self {
        Self {
            variables,
            stations,
        }
    }

    pub fn contains_variable(&self, key: &str) -> bool {
        self.variables.iter().any(|v| v.key.as_str() == key)
    }

    pub fn contains_station(&self, id: &str) -> bool {
        self.stations.iter().any(|s| s.id.as_str() == id)
    }

    pub fn variable(&self, key: &str) -> Option<&VariableInfo> {
        self.variables.iter().find(|v| v.key.as_str() == key)
    }

    pub fn variable_keys(&self) -> impl Iterator<Item = &VariableKey> {
        self.variables.iter().map(|v| &v.key)
    }
}

const LANL_VARIABLES: &[(&str, &str)] = &[
    ("spd1", "Wind speed at 12 m"),
    ("spd2", "Wind speed at 23 m"),
    ("spd3", "Wind speed at 46 m"),
    ("sdspd1", "Std. dev. of wind speed at 12 m"),
    ("sdspd2", "Std. dev. of wind speed at 23 m"),
    ("sdspd3", "Std. dev. of wind speed at 46 m"),
    ("dir1", "Wind direction at 12 m"),
    ("dir2", "Wind direction at 23 m"),
    ("dir3", "Wind direction at 46 m"),
    ("sddir1", "Std. dev. of wind direction at 12 m"),
    ("sddir2", "Std. dev. of wind direction at 23 m"),
    ("sddir3", "Std. dev. of wind direction at 46 m"),
    ("w1", "Vertical wind speed at 12 m"),
    ("w2", "Vertical wind speed at 23 m"),
    ("w3", "Vertical wind speed at 46 m"),
    ("sdw1", "Std. dev. of vertical wind speed at 12 m"),
    ("sdw2", "Std. dev. of vertical wind speed at 23 m"),
    ("sdw3", "Std. dev. of vertical wind speed at 46 m"),
    ("fvel2", "Friction velocity"),
    ("temp0", "Temperature at 1.2 m"),
    ("temp1", "Temperature at 12 m"),
    ("temp2", "Temperature at 23 m"),
    ("temp3", "Temperature at 46 m"),
    ("press", "Pressure"),
    ("rh", "Relative humidity"),
    ("ah", "Absolute humidity"),
    ("dewp", "Dew point"),
    ("precip", "Precipitation"),
    ("swdn", "Shortwave radiation down"),
    ("swup", "Shortwave radiation up"),
    ("lwdn", "Longwave radiation down"),
    ("lwup", "Longwave radiation up"),
    ("netrad", "Net radiation"),
    ("sheat", "Sensible heat flux"),
    ("lheat", "Latent heat flux"),
    ("stemp1", "Soil temperature at -0.02 m"),
    ("stemp2", "Soil temperature at -0.06 m"),
    ("stemp3", "Soil temperature at -0.10 m"),
    ("smoist1", "Soil moisture 0 to -0.08 m"),
    ("smoist2", "Soil moisture 0 to -0.15 m"),
    ("gheat", "Ground heat flux"),
];

const LANL_STATIONS: &[(&str, &str)] = &[
    ("mcdn", "MCDN (possibly TA-5)"),
    ("ta6", "TA-6"),
    ("ta49", "TA-49"),
    ("ta53", "TA-53"),
    ("ta54", "TA-54"),
    ("ncom", "North Community"),
];

impl Default for Catalog {
    fn default() -> Self {
        Self {
            variables: LANL_VARIABLES
                .iter()
                .map(|(key, description)| VariableInfo {
                    key: VariableKey::from(*key),
                    description: description.to_string(),
                })
                .collect(),
            stations: LANL_STATIONS
                .iter()
                .map(|(id, description)| StationInfo {
                    id: StationId::from(*id),
                    description: description.to_string(),
                })
                .collect(),
        }
    }
}
