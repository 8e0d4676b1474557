//! HTTP GET primitive used by the resource cache.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::warn;

use crate::error::{AppError, ErrorKind};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the raw body behind a URL.
///
/// Implementations return the full body on a success status and an error
/// otherwise; no retries.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Blocking `reqwest` client with a fixed timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::new(ErrorKind::Transport, format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(ErrorKind::Transport, format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "unexpected HTTP status");
            return Err(AppError::new(
                ErrorKind::HttpStatus,
                format!("unexpected HTTP status: {status}"),
            ));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::new(ErrorKind::Transport, format!("failed to read body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}
