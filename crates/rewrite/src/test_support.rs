//! In-memory fetcher double for network-free tests.

use relay::{Blocklist, FetchFuture, RelayError, ResourceFetcher};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// `ResourceFetcher` backed by maps keyed on the target URL string.
///
/// Records every requested URL so tests can assert what was (not) fetched.
#[derive(Default)]
pub struct MapFetcher {
    text: HashMap<String, String>,
    binary: HashMap<String, String>,
    blocklist: Option<Blocklist>,
    requests: Mutex<Vec<String>>,
}

impl MapFetcher {
    #[must_use]
    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.text.insert(url.to_owned(), body.to_owned());
        self
    }

    #[must_use]
    pub fn with_binary(mut self, url: &str, data_uri: &str) -> Self {
        self.binary.insert(url.to_owned(), data_uri.to_owned());
        self
    }

    #[must_use]
    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = Some(blocklist);
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, url: &Url) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
    }

    fn lookup(&self, map: &HashMap<String, String>, url: &Url) -> Result<String, RelayError> {
        self.record(url);
        map.get(url.as_str())
            .cloned()
            .ok_or_else(|| RelayError::FetchFailure {
                url: url.to_string(),
                reason: "no test fixture".to_owned(),
            })
    }
}

impl ResourceFetcher for MapFetcher {
    fn fetch_text<'a>(&'a self, target: &'a Url) -> FetchFuture<'a, String> {
        Box::pin(async move { self.lookup(&self.text, target) })
    }

    fn fetch_data_uri<'a>(&'a self, target: &'a Url) -> FetchFuture<'a, String> {
        Box::pin(async move { self.lookup(&self.binary, target) })
    }

    fn is_blocked(&self, url: &Url) -> bool {
        match &self.blocklist {
            Some(list) => list.is_blocked(url),
            None => Blocklist::standard().is_blocked(url),
        }
    }
}
