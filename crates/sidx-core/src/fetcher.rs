//! HTTP fetching of remote search index files.
//!
//! Sites regenerate `search_index.js` wholesale on every documentation
//! build, so conditional requests are the only way to avoid re-downloading
//! unchanged indexes. The fetcher sends `If-None-Match` / `If-Modified-Since`
//! when prior `ETag` / `Last-Modified` values are known and reports a 304
//! as [`FetchResult::NotModified`].

use crate::{Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for fetching search index files with conditional requests.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the default 30 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sidx/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetch a URL, sending conditional headers when prior values exist.
    pub async fn fetch_with_cache(
        &self,
        url: &str,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> Result<FetchResult> {
        let mut request = self.client.get(url);

        if let Some(tag) = etag {
            debug!("setting If-None-Match: {}", tag);
            request = request.header(IF_NONE_MATCH, tag);
        }
        if let Some(lm) = last_modified {
            debug!("setting If-Modified-Since: {}", lm);
            request = request.header(IF_MODIFIED_SINCE, lm);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            info!("index not modified (304) for {}", url);
            return Ok(FetchResult::NotModified);
        }

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "no search index at '{url}'; check that the site publishes one"
                )));
            }
            return match response.error_for_status() {
                Err(err) => Err(Error::Network(err)),
                Ok(_) => Err(Error::Other(format!(
                    "unexpected status {status} from '{url}'"
                ))),
            };
        }

        let new_etag = header_string(&response, ETAG);
        let new_last_modified = header_string(&response, LAST_MODIFIED);

        let content = response.text().await?;
        let sha256 = calculate_sha256(&content);
        info!("fetched {} bytes from {}", content.len(), url);

        Ok(FetchResult::Modified {
            content,
            etag: new_etag,
            last_modified: new_last_modified,
            sha256,
        })
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

/// Result of a conditional fetch.
#[derive(Debug)]
pub enum FetchResult {
    /// Server reports the index unchanged since the last fetch.
    NotModified,
    /// New content was downloaded.
    Modified {
        /// The fetched payload.
        content: String,
        /// `ETag` header value if present.
        etag: Option<String>,
        /// `Last-Modified` header value if present.
        last_modified: Option<String>,
        /// SHA-256 digest of the payload, base64 encoded.
        sha256: String,
    },
}

fn calculate_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    STANDARD.encode(hasher.finalize())
}
