//! Relay client for the periscope sandbox.
//!
//! All outbound reads go through a third-party indirection endpoint that
//! fetches the target on our behalf; the rendering context cannot read
//! cross-origin bodies itself. This crate builds the indirection URLs,
//! performs the text and binary-as-data-URI fetch variants, resolves
//! relative references and classifies blocklisted hosts.

pub mod blocklist;
pub mod client;
pub mod error;

pub use blocklist::Blocklist;
pub use client::{DEFAULT_FETCH_TIMEOUT, DEFAULT_RELAY_BASE, RelayClient, RelayTarget};
pub use error::RelayError;

use core::future::Future;
use core::pin::Pin;
use url::Url;

/// Boxed future for dyn-safe async fetch methods.
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RelayError>> + Send + 'a>>;

/// Capability handed to the rewrite pipeline.
///
/// Implemented by [`RelayClient`] in production and by in-memory doubles in
/// tests, so processors never depend on the network directly.
pub trait ResourceFetcher: Send + Sync {
    /// Fetches the target as text.
    fn fetch_text<'a>(&'a self, target: &'a Url) -> FetchFuture<'a, String>;

    /// Fetches the target as binary, returned as a base64 data URI.
    fn fetch_data_uri<'a>(&'a self, target: &'a Url) -> FetchFuture<'a, String>;

    /// Whether the host is excluded from inlining.
    fn is_blocked(&self, url: &Url) -> bool;
}

impl ResourceFetcher for RelayClient {
    fn fetch_text<'a>(&'a self, target: &'a Url) -> FetchFuture<'a, String> {
        Box::pin(self.fetch_text(target))
    }

    fn fetch_data_uri<'a>(&'a self, target: &'a Url) -> FetchFuture<'a, String> {
        Box::pin(self.fetch_data_uri(target))
    }

    fn is_blocked(&self, url: &Url) -> bool {
        self.blocklist().is_blocked(url)
    }
}

/// Standard relative-URL resolution against `base`.
///
/// # Errors
/// Returns `InvalidInput` if the reference cannot be resolved.
pub fn resolve(reference: &str, base: &Url) -> Result<Url, RelayError> {
    base.join(reference)
        .map_err(|err| RelayError::InvalidInput(format!("{reference}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_handles_relative_and_absolute() {
        let base = Url::parse("https://x.test/dir/page.html").unwrap();
        assert_eq!(
            resolve("img/a.png", &base).unwrap().as_str(),
            "https://x.test/dir/img/a.png"
        );
        assert_eq!(
            resolve("/top.css", &base).unwrap().as_str(),
            "https://x.test/top.css"
        );
        assert_eq!(
            resolve("https://other.test/x", &base).unwrap().as_str(),
            "https://other.test/x"
        );
    }

    #[test]
    fn resolved_blocklisted_host_stays_blocked() {
        let base = Url::parse("https://x.test/").unwrap();
        let resolved = resolve("https://www.google-analytics.com/ga.js", &base).unwrap();
        assert!(Blocklist::standard().is_blocked(&resolved));
    }
}
