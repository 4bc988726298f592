use crate::request::builder::DataRequest;
use crate::transport::error::TransportError;
use log::{info, warn};
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

pub const DEFAULT_ENDPOINT: &str =
    "http://environweb.lanl.gov/weathermachine/data_request_green_weather.asp";

/// Talks to the weather machine and keeps the raw responses on disk.
///
/// Captures are stored untouched, one flat text file per request, so they can
/// be parsed again later without hitting the network.
pub struct WeatherMachineLoader {
    cache_dir: PathBuf,
    endpoint: String,
    download_client: Client,
}

impl WeatherMachineLoader {
    pub fn new(cache_dir: &Path, endpoint: impl Into<String>) -> WeatherMachineLoader {
        WeatherMachineLoader {
            cache_dir: cache_dir.to_path_buf(),
            endpoint: endpoint.into(),
            download_client: Client::new(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn capture_path(&self, request: &DataRequest) -> PathBuf {
        self.cache_dir.join(request.cache_file_name())
    }

    pub async fn is_cached(&self, request: &DataRequest) -> bool {
        fs::metadata(self.capture_path(request)).await.is_ok()
    }

    /// Posts the request form and returns the raw response text.
    ///
    /// The response is written to the cache directory before it is returned.
    pub async fn fetch(&self, request: &DataRequest) -> Result<String, TransportError> {
        info!(
            "Requesting {} for tower {} ({}) from {}",
            request.checkbox(),
            request.station(),
            request.range(),
            self.endpoint
        );

        let response = self
            .download_client
            .post(&self.endpoint)
            .form(&request.form_fields())
            .send()
            .await
            .map_err(|e| TransportError::NetworkRequest(self.endpoint.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.endpoint, e);
                return Err(if let Some(status) = e.status() {
                    TransportError::HttpStatus {
                        url: self.endpoint.clone(),
                        status,
                        source: e,
                    }
                } else {
                    TransportError::NetworkRequest(self.endpoint.clone(), e)
                });
            }
        };

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::NetworkRequest(self.endpoint.clone(), e))?;
        if text.trim().is_empty() {
            return Err(TransportError::EmptyResponse(self.endpoint.clone()));
        }
        info!(
            "Received {} bytes for tower {}",
            text.len(),
            request.station()
        );

        let path = self.store_capture(request, &text).await?;
        info!("Wrote raw response to {}", path.display());
        Ok(text)
    }

    /// Reads the capture written by an earlier [`fetch`](Self::fetch) of the same request.
    pub async fn load_cached(&self, request: &DataRequest) -> Result<String, TransportError> {
        let path = self.capture_path(request);
        let text = Self::read_capture(&path).await?;
        info!("Read raw response from {}", path.display());
        Ok(text)
    }

    /// Reads any flat text file holding a raw weather machine response.
    pub async fn read_capture(path: &Path) -> Result<String, TransportError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| TransportError::CacheRead(path.to_path_buf(), e))
    }

    /// Writes `text` as the capture of `request`.
    ///
    /// The text goes to a temporary file in the cache directory first and is
    /// renamed into place, so readers never see a half-written capture. The
    /// directory itself is not created here; [`crate::WeatherMachine`] creates
    /// it when the client is constructed.
    pub async fn store_capture(
        &self,
        request: &DataRequest,
        text: &str,
    ) -> Result<PathBuf, TransportError> {
        let path = self.capture_path(request);
        let cache_dir = self.cache_dir.clone();
        let bytes = text.as_bytes().to_vec();
        let target = path.clone();

        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new_in(&cache_dir)
                .map_err(|e| TransportError::CacheWrite(target.clone(), e))?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| TransportError::CacheWrite(target.clone(), e))?;
            temp_file
                .flush()
                .map_err(|e| TransportError::CacheWrite(target.clone(), e))?;
            temp_file
                .persist(&target)
                .map_err(|e| TransportError::CacheWrite(target.clone(), e.error))?;
            Ok::<(), TransportError>(())
        })
        .await??;

        Ok(path)
    }
}
