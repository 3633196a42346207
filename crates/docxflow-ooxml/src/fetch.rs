//! Retrieval of images referenced by regular URLs

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::blocking::Client;

use crate::error::Result;
#[cfg(feature = "fetch")]
use crate::error::OoxmlError;

/// Source of image bytes for non-data URLs
///
/// Implementations block until the bytes are available. Failures surface as
/// `OoxmlError::Fetch`; the emitter turns them into warnings.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP(S) fetcher
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    timeout: Duration,
}

#[cfg(feature = "fetch")]
impl HttpImageFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OoxmlError::Fetch {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(feature = "fetch")]
impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |message: String| OoxmlError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
