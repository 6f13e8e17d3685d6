//! HTTP fetchers for the conversion endpoint.
//!
//! Two interchangeable mechanisms: [`Fetcher`] on the async reqwest client
//! and [`BlockingFetcher`] on the blocking one (no Tokio runtime required).
//! Both return the same [`DownloadedFile`] for the same response.

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};

use crate::filename::extract_filename;

/// Endpoint the service listens on by default.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/convert-csv-to-excel";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str = concat!("csvxl-fetch/", env!("CARGO_PKG_VERSION"));

/// Binary payload plus the filename the server suggested (may be empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Error type for download operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or body transfer failure
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success status with the response body
    #[error("HTTP {0}: {1}")]
    Http(u16, String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn filename_from(headers: &HeaderMap) -> String {
    let value = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    extract_filename(value)
}

/// Async fetcher.
#[derive(Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    url: String,
}

impl Fetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the endpoint and collect the body.
    pub async fn fetch(&self) -> Result<DownloadedFile, ClientError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http(status.as_u16(), body));
        }

        let filename = filename_from(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        log::debug!("fetched {} bytes from {}", bytes.len(), self.url);
        Ok(DownloadedFile {
            bytes: bytes.to_vec(),
            filename,
        })
    }
}

/// Blocking fetcher. Must not be used from inside an async runtime.
#[derive(Clone)]
pub struct BlockingFetcher {
    http: reqwest::blocking::Client,
    url: String,
}

impl BlockingFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch(&self) -> Result<DownloadedFile, ClientError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status.as_u16(), body));
        }

        let filename = filename_from(response.headers());
        let bytes = response
            .bytes()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        log::debug!("fetched {} bytes from {}", bytes.len(), self.url);
        Ok(DownloadedFile {
            bytes: bytes.to_vec(),
            filename,
        })
    }
}
