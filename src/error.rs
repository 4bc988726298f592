use crate::config::ConfigError;
use crate::parser::error::ParseError;
use crate::request::error::RequestError;
use crate::transport::error::TransportError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherMachineError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to build data frame")]
    Frame(#[from] PolarsError),
}
