//! Hosts deliberately excluded from inlining.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use url::Url;

/// Analytics, CDN and font-service hosts whose sub-resources are left as-is.
/// Membership is an exact hostname match, not a suffix match.
static DEFAULT_HOSTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "fonts.googleapis.com",
        "www.googletagmanager.com",
        "code.jquery.com",
        "cdn.jsdelivr.net",
        "www.google.com",
        "cse.google.com",
        "www.google-analytics.com",
        "dmp.im-apps.net",
        "static.cloudflareinsights.com",
    ])
});

/// Fixed set of hostnames excluded from inlining.
#[derive(Debug, Clone)]
pub struct Blocklist {
    hosts: HashSet<String>,
}

impl Blocklist {
    /// The built-in tracker/CDN/font-service set.
    pub fn standard() -> Self {
        Self {
            hosts: DEFAULT_HOSTS.iter().map(|h| (*h).to_owned()).collect(),
        }
    }

    /// An explicit set, mainly for tests.
    pub fn from_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_blocked(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| self.hosts.contains(host))
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::standard()
    }
}
