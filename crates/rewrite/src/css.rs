//! Pattern-based `url()` rewriting for stylesheets and style attributes.
//!
//! This is not a CSS parser. It scans for `url(...)` references, inlines each
//! one that resolves to a fetchable http(s) resource, and leaves everything
//! else exactly as written.

use futures::future::join_all;
use log::warn;
use relay::ResourceFetcher;
use std::sync::Arc;
use url::Url;

/// One captured `url(...)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlRef {
    /// The exact matched substring, e.g. `url('a.png')`.
    full: String,
    /// The inner reference with quotes and whitespace stripped.
    reference: String,
}

/// Rewrites `url()` references in CSS text to inlined data URIs.
#[derive(Clone)]
pub struct CssRewriter {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl CssRewriter {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Rewrites every fetchable `url()` reference in `css` against `base`.
    ///
    /// References are fetched concurrently and substituted independently: a
    /// failure for one reference leaves that reference as literal text and
    /// never aborts the others. Substitution is by exact captured substring,
    /// so identical occurrences are all replaced with the same result.
    pub async fn rewrite(&self, css: &str, base: &Url) -> String {
        let refs = find_url_refs(css);
        if refs.is_empty() {
            return css.to_owned();
        }

        let jobs = refs
            .iter()
            .map(|url_ref| self.inline_reference(url_ref, base));
        let results = join_all(jobs).await;

        let mut out = css.to_owned();
        for (url_ref, data_uri) in refs.iter().zip(results) {
            if let Some(data_uri) = data_uri {
                out = out.replace(&url_ref.full, &format!("url('{data_uri}')"));
            }
        }
        out
    }

    async fn inline_reference(&self, url_ref: &UrlRef, base: &Url) -> Option<String> {
        let resolved = match relay::resolve(&url_ref.reference, base) {
            Ok(url) => url,
            Err(err) => {
                warn!("unresolvable css reference {}: {err}", url_ref.reference);
                return None;
            }
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        if self.fetcher.is_blocked(&resolved) {
            warn!("ignoring css resource from {resolved}");
            return None;
        }
        match self.fetcher.fetch_data_uri(&resolved).await {
            Ok(data_uri) => Some(data_uri),
            Err(err) => {
                warn!("failed to fetch css resource {resolved}: {err}");
                None
            }
        }
    }
}

/// Captures every `url(...)` occurrence, quotes optional, deduplicated.
fn find_url_refs(css: &str) -> Vec<UrlRef> {
    let mut refs: Vec<UrlRef> = Vec::new();
    let mut rest = css;
    while let Some(start) = rest.find("url(") {
        let after_open = &rest[start + 4..];
        let Some(close) = after_open.find(')') else {
            break;
        };
        let full = &rest[start..start + 4 + close + 1];
        let inner = after_open[..close].trim();
        let reference = inner
            .strip_prefix('\'')
            .and_then(|r| r.strip_suffix('\''))
            .or_else(|| inner.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
            .unwrap_or(inner);
        if !reference.is_empty() && !refs.iter().any(|r| r.full == full) {
            refs.push(UrlRef {
                full: full.to_owned(),
                reference: reference.to_owned(),
            });
        }
        rest = &rest[start + 4 + close + 1..];
    }
    refs
}
