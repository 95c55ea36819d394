//! Replaces external scripts with inline copies of their source.

use super::{ElementProcessor, TransformFuture};
use html::{Document, NodeId, Selector};
use log::warn;
use relay::ResourceFetcher;
use std::sync::Arc;
use url::Url;

pub struct ScriptProcessor {
    fetcher: Arc<dyn ResourceFetcher>,
    base: Url,
    selector: Selector,
}

impl ScriptProcessor {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, base: Url) -> Self {
        Self {
            fetcher,
            base,
            selector: Selector::parse("script[src]").expect("static selector"),
        }
    }
}

impl ElementProcessor for ScriptProcessor {
    fn name(&self) -> &'static str {
        "script"
    }

    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn lazy_load(&self) -> bool {
        false
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
            let resolved = match relay::resolve(&src, &self.base) {
                Ok(url) => url,
                Err(err) => {
                    warn!("unresolvable script src {src}: {err}");
                    return Ok(None);
                }
            };
            if self.fetcher.is_blocked(&resolved) {
                warn!("ignoring script from {resolved}");
                return Ok(None);
            }
            match self.fetcher.fetch_text(&resolved).await {
                Ok(body) => {
                    // A fresh element: the src attribute is dropped entirely
                    // so the frame never reaches out for the original.
                    let replacement = doc.create_element("script");
                    let text = doc.create_text(&body);
                    doc.append_child(replacement, text);
                    Ok(Some(replacement))
                }
                Err(err) => {
                    warn!("failed to fetch script {resolved}: {err}");
                    Ok(None)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MapFetcher;

    fn base() -> Url {
        Url::parse("https://x.test/").unwrap()
    }

    #[tokio::test]
    async fn inlines_fetched_source_without_src() {
        let fetcher = Arc::new(
            MapFetcher::default().with_text("https://x.test/app.js", "console.log(1);"),
        );
        let processor = ScriptProcessor::new(fetcher, base());
        let mut doc = html::parse(r#"<script src="/app.js"></script>"#);
        let script = doc.first_element("script").unwrap();

        let replacement = processor.process(&mut doc, script).await.unwrap().unwrap();
        assert_eq!(doc.attr(replacement, "src"), None);
        assert_eq!(doc.text_content(replacement), "console.log(1);");
    }

    #[tokio::test]
    async fn empty_src_is_skipped_without_a_fetch() {
        let fetcher = Arc::new(
            MapFetcher::default().with_text("https://x.test/", "<html>page</html>"),
        );
        let processor = ScriptProcessor::new(fetcher.clone(), base());
        let mut doc = html::parse(r#"<script src=""></script>"#);
        let script = doc.first_element("script").unwrap();

        let result = processor.process(&mut doc, script).await.unwrap();
        assert!(result.is_none());
        // An empty reference would otherwise inline the page's own HTML.
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn blocked_host_is_skipped() {
        let fetcher = Arc::new(
            MapFetcher::default().with_text("https://code.jquery.com/jquery.js", "var $;"),
        );
        let processor = ScriptProcessor::new(fetcher.clone(), base());
        let mut doc = html::parse(r#"<script src="https://code.jquery.com/jquery.js"></script>"#);
        let script = doc.first_element("script").unwrap();

        let result = processor.process(&mut doc, script).await.unwrap();
        assert!(result.is_none());
        assert!(fetcher.requests().is_empty());
    }
}
