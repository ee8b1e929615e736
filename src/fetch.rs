//! HTTP Fetch Module
//! Read-only retrieval of CSV resources over HTTP(S).

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to '{url}' returned status {status}")]
    Status { url: String, status: u16 },
    #[error("Response from '{url}' is not valid UTF-8: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

const USER_AGENT: &str = concat!("chartfeed/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches CSV resources over HTTP(S).
///
/// One GET per call; no caching, no retry. Paths are joined onto an
/// optional base URL, with no validation of their shape - a malformed
/// path surfaces as a request error.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Option<String>,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Base URL that relative resource paths are resolved against.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Full URL for a resource path.
    pub fn url_for(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) if base.ends_with('/') => format!("{base}{path}"),
            Some(base) => format!("{base}/{path}"),
            None => path.to_string(),
        }
    }

    /// GET a resource and decode its body as strict UTF-8 text.
    ///
    /// Transport errors and non-2xx statuses are network failures; a body
    /// that is not valid UTF-8 is a decode failure.
    pub fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Request {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Request {
            url: url.clone(),
            source: e,
        })?;

        String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::Decode { url, source: e })
    }
}
