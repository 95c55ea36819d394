//! Inlines `<img>` sources as data URIs.

use super::{ElementProcessor, TransformFuture};
use html::{Document, NodeId, Selector};
use log::warn;
use relay::ResourceFetcher;
use std::sync::Arc;
use url::Url;

pub struct ImageProcessor {
    fetcher: Arc<dyn ResourceFetcher>,
    base: Url,
    selector: Selector,
}

impl ImageProcessor {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, base: Url) -> Self {
        Self {
            fetcher,
            base,
            selector: Selector::parse("img[src]").expect("static selector"),
        }
    }
}

impl ElementProcessor for ImageProcessor {
    fn name(&self) -> &'static str {
        "image"
    }

    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn lazy_load(&self) -> bool {
        true
    }

    fn process<'a>(&'a self, doc: &'a mut Document, node: NodeId) -> TransformFuture<'a> {
        Box::pin(async move {
            let Some(src) = doc
                .attr(node, "src")
                .filter(|src| !src.is_empty())
                .map(str::to_owned)
            else {
                return Ok(None);
            };
            // Already inlined; processing again would be a pointless re-fetch.
            if src.starts_with("data:") {
                return Ok(None);
            }
            let resolved = match relay::resolve(&src, &self.base) {
                Ok(url) => url,
                Err(err) => {
                    warn!("unresolvable image src {src}: {err}");
                    return Ok(None);
                }
            };
            match self.fetcher.fetch_data_uri(&resolved).await {
                Ok(data_uri) => {
                    let copy = doc.clone_subtree(node);
                    doc.set_attr(copy, "src", &data_uri);
                    Ok(Some(copy))
                }
                Err(err) => {
                    warn!("failed to fetch image {resolved}: {err}");
                    Ok(None)
                }
            }
        })
    }
}
