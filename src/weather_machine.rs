//! The main entry point: builds a request, fetches or replays the raw
//! response, and parses it into a [`SeriesSet`].

use crate::config::WeatherMachineConfig;
use crate::error::WeatherMachineError;
use crate::parser::series_parser::SeriesParser;
use crate::request::builder::{DataRequest, RequestBuilder};
use crate::transport::loader::WeatherMachineLoader;
use crate::types::catalog::{Catalog, VariableKey};
use crate::types::series_set::SeriesSet;
use crate::types::time_range::TimeRange;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Client for the LANL weather machine.
///
/// Raw responses are kept in a cache directory, so repeating a request (or
/// calling [`WeatherMachine::replay`]) parses the stored capture instead of
/// contacting the server again.
///
/// ```rust,no_run
/// # use weathermachine::{WeatherMachine, WeatherMachineError, TimeRange};
/// # #[tokio::main]
/// # async fn main() -> Result<(), WeatherMachineError> {
/// let client = WeatherMachine::new().await?;
/// let set = client
///     .request()
///     .station("ta54")
///     .keys(&["spd1", "dir1", "temp0"])
///     .range(TimeRange::new((2017, 3, 1), (2017, 3, 2))?)
///     .call()
///     .await?;
/// println!("{} samples, first wind speed {:?}", set.len(), set.get("spd1"));
/// # Ok(())
/// # }
/// ```
pub struct WeatherMachine {
    builder: RequestBuilder,
    parser: SeriesParser,
    loader: WeatherMachineLoader,
}

#[bon]
impl WeatherMachine {
    /// Creates a client with the default configuration, caching under the
    /// OS cache directory (e.g. `~/.cache/weathermachine_cache` on Linux).
    ///
    /// # Errors
    ///
    /// [`WeatherMachineError::CacheDirResolution`] if there is no OS cache
    /// directory, [`WeatherMachineError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, WeatherMachineError> {
        let cache_folder = get_cache_dir().map_err(WeatherMachineError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Creates a client with the default configuration and a custom cache directory.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, WeatherMachineError> {
        Self::with_config(WeatherMachineConfig::default(), cache_folder).await
    }

    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// [`WeatherMachineError::Config`] if [`WeatherMachineConfig::validate`]
    /// rejects the configuration.
    ///
    /// ```rust,no_run
    /// # use weathermachine::{WeatherMachine, WeatherMachineConfig, WeatherMachineError};
    /// # use std::path::{Path, PathBuf};
    /// # async fn run() -> Result<(), WeatherMachineError> {
    /// let config = WeatherMachineConfig::from_json_file(Path::new("weathermachine.json"))?;
    /// let client = WeatherMachine::with_config(config, PathBuf::from("/tmp/wm")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_config(
        config: WeatherMachineConfig,
        cache_folder: PathBuf,
    ) -> Result<Self, WeatherMachineError> {
        config.validate()?;
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| WeatherMachineError::CacheDirCreation(cache_folder.clone(), e))?;
        debug!(
            "Weather machine client at {} caching in {}",
            config.endpoint,
            cache_folder.display()
        );
        Ok(Self {
            builder: RequestBuilder::new(config.catalog),
            parser: SeriesParser::new(config.parser),
            loader: WeatherMachineLoader::new(&cache_folder, config.endpoint),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        self.builder.catalog()
    }

    pub fn loader(&self) -> &WeatherMachineLoader {
        &self.loader
    }

    /// Requests `keys` for `station` over `range` and parses the response.
    ///
    /// With `use_cache` (default `true`) a capture stored by an earlier
    /// identical request is parsed instead of fetching again.
    ///
    /// # Errors
    ///
    /// [`WeatherMachineError::Request`] for invalid arguments,
    /// [`WeatherMachineError::Transport`] for network or cache failures and
    /// [`WeatherMachineError::Parse`] if the response cannot be read.
    #[builder]
    pub async fn request(
        &self,
        station: &str,
        keys: &[&str],
        range: TimeRange,
        use_cache: Option<bool>,
    ) -> Result<SeriesSet, WeatherMachineError> {
        let request = self.builder.build(station, keys.iter().copied(), range)?;

        let raw = if use_cache.unwrap_or(true) && self.loader.is_cached(&request).await {
            info!("Cache hit for {}", request.cache_file_name());
            self.loader.load_cached(&request).await?
        } else {
            self.loader.fetch(&request).await?
        };
        self.parse(&raw, &request)
    }

    /// Parses the stored capture of a request without touching the network.
    ///
    /// # Errors
    ///
    /// [`crate::TransportError::CacheRead`] (wrapped) when the request was
    /// never fetched into this cache directory.
    #[builder]
    pub async fn replay(
        &self,
        station: &str,
        keys: &[&str],
        range: TimeRange,
    ) -> Result<SeriesSet, WeatherMachineError> {
        let request = self.builder.build(station, keys.iter().copied(), range)?;
        let raw = self.loader.load_cached(&request).await?;
        self.parse(&raw, &request)
    }

    /// Parses any file holding a raw response, e.g. one saved by hand from
    /// the web form. Keys are not checked against the catalog.
    pub async fn replay_file(
        &self,
        path: &Path,
        keys: &[&str],
    ) -> Result<SeriesSet, WeatherMachineError> {
        let keys: Vec<VariableKey> = keys.iter().map(|k| VariableKey::from(*k)).collect();
        let raw = WeatherMachineLoader::read_capture(path).await?;
        info!("Parsing capture {}", path.display());
        Ok(self.parser.parse(&raw, &keys)?)
    }

    fn parse(&self, raw: &str, request: &DataRequest) -> Result<SeriesSet, WeatherMachineError> {
        let set = self.parser.parse(raw, request.keys())?;
        debug!(
            "Parsed {} samples of {} for tower {}",
            set.len(),
            request.checkbox(),
            request.station()
        );
        Ok(set)
    }
}
