//! Relay client: indirection URL construction and the two fetch variants.

use crate::blocklist::Blocklist;
use crate::error::RelayError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use log::warn;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tokio::task::spawn_blocking;
use url::Url;

/// Relay endpoint used when none is configured.
pub const DEFAULT_RELAY_BASE: &str = "https://cors-anywhere.azurewebsites.net/";

/// Every relayed request gives up after this long unless configured
/// otherwise.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// An absolute target URL plus its derived indirection URL.
///
/// Construction is the only place input validation happens; once built, both
/// URLs are immutable and the mapping is a pure function of the target's
/// hostname, port, path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayTarget {
    target: Url,
    relayed: Url,
}

impl RelayTarget {
    /// Builds a target from a raw string, rejecting anything that does not
    /// parse as an absolute URL with a host.
    pub fn new(raw: &str, relay_base: &Url) -> Result<Self, RelayError> {
        let target = Url::parse(raw).map_err(|err| {
            RelayError::InvalidInput(format!("{raw}: {err}"))
        })?;
        Self::from_url(target, relay_base)
    }

    /// Builds a target from an already-parsed URL.
    pub fn from_url(target: Url, relay_base: &Url) -> Result<Self, RelayError> {
        let Some(host) = target.host_str() else {
            return Err(RelayError::InvalidInput(format!(
                "{target}: URL has no host"
            )));
        };
        let port = target.port().unwrap_or(match target.scheme() {
            "https" => 443,
            _ => 80,
        });
        let query = target
            .query()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();
        // The origin+path+query string is embedded as the relay base's path
        // with only the URL library's implicit encoding. The relay endpoint
        // expects exactly this shape.
        let embedded = format!("{host}:{port}{}{query}", target.path());
        let mut relayed = relay_base.clone();
        relayed.set_path(&embedded);
        Ok(Self { target, relayed })
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn relayed(&self) -> &Url {
        &self.relayed
    }
}

/// HTTP client that reads every target through the relay endpoint.
///
/// The relay is a capability boundary, not a cache: the rendering context
/// cannot read cross-origin bodies directly, so all inlining goes through it.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    relay_base: Url,
    blocklist: Blocklist,
}

impl RelayClient {
    /// Builds a client for the given relay endpoint with the default
    /// timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(relay_base: Url, blocklist: Blocklist) -> Result<Self, anyhow::Error> {
        Self::with_timeout(relay_base, blocklist, DEFAULT_FETCH_TIMEOUT)
    }

    /// Builds a client with an explicit per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn with_timeout(
        relay_base: Url,
        blocklist: Blocklist,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            relay_base,
            blocklist,
        })
    }

    pub fn relay_base(&self) -> &Url {
        &self.relay_base
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Derives the indirection URL for `target`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `target` has no host.
    pub fn relay_url(&self, target: &Url) -> Result<Url, RelayError> {
        Ok(RelayTarget::from_url(target.clone(), &self.relay_base)?
            .relayed()
            .clone())
    }

    /// Fetches `target` through the relay as text.
    ///
    /// A 4xx/5xx response with a non-empty body is treated as the result,
    /// not an error; pages frequently serve useful content alongside error
    /// statuses and the relay degrades best-effort.
    ///
    /// # Errors
    /// `FetchFailure` on transport failure or an empty body.
    pub async fn fetch_text(&self, target: &Url) -> Result<String, RelayError> {
        let relayed = self.relay_url(target)?;
        let response = self.http.get(relayed).send().await.map_err(|err| {
            warn!("failed to fetch text for {target}: {err}");
            RelayError::fetch(target, err)
        })?;
        let text = response.text().await.map_err(|err| {
            warn!("failed to read body for {target}: {err}");
            RelayError::fetch(target, err)
        })?;
        if text.is_empty() {
            warn!("empty response body for {target}");
            return Err(RelayError::fetch(target, "empty response body"));
        }
        Ok(text)
    }

    /// Fetches `target` through the relay as binary and encodes it as a
    /// base64 data URI. The MIME type comes from the response's
    /// `Content-Type`, falling back to `application/octet-stream`.
    ///
    /// # Errors
    /// `FetchFailure` on transport failure or an empty body,
    /// `EncodingFailure` if the binary-to-text conversion fails.
    pub async fn fetch_data_uri(&self, target: &Url) -> Result<String, RelayError> {
        let relayed = self.relay_url(target)?;
        let response = self.http.get(relayed).send().await.map_err(|err| {
            warn!("failed to fetch binary for {target}: {err}");
            RelayError::fetch(target, err)
        })?;
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_owned())
            .unwrap_or_else(|| "application/octet-stream".to_owned());
        let body: Bytes = response.bytes().await.map_err(|err| {
            warn!("failed to read binary body for {target}: {err}");
            RelayError::fetch(target, err)
        })?;
        if body.is_empty() {
            warn!("empty binary response for {target}");
            return Err(RelayError::fetch(target, "empty response body"));
        }
        // Encoding large payloads is CPU-bound; keep it off the cooperative
        // thread.
        let encoded = spawn_blocking(move || BASE64.encode(&body))
            .await
            .map_err(|err| {
                warn!("base64 encoding failed for {target}: {err}");
                RelayError::encoding(target, err)
            })?;
        Ok(format!("data:{mime};base64,{encoded}"))
    }
}
