//! Replaces stylesheet links with inline `<style>` elements.

use super::{ElementProcessor, TransformFuture};
use crate::css::CssRewriter;
use html::{Document, NodeId, Selector};
use log::warn;
use relay::ResourceFetcher;
use std::sync::Arc;
use url::Url;

pub struct StylesheetProcessor {
    fetcher: Arc<dyn ResourceFetcher>,
    css: CssRewriter,
    base: Url,
    selector: Selector,
}

impl StylesheetProcessor {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, base: Url) -> Self {
        Self {
            css: CssRewriter::new(fetcher.clone()),
            fetcher,
            base,
            selector: Selector::parse("link[rel=stylesheet]").expect("static selector"),
        }
    }
}

impl ElementProcessor for StylesheetProcessor {
    fn name(&self) -> &'static str {
        "stylesheet"
    }

    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn lazy_load(&self) -> bool {
        true
    }

    fn process<'a>(&'a self, doc: &'a mut Document, node: NodeId) -> TransformFuture<'a> {
        Box::pin(async move {
            if doc.tag(node) != Some("link") {
                warn!("stylesheet processor given a non-link element");
                return Ok(None);
            }
            let Some(href) = doc
                .attr(node, "href")
                .filter(|href| !href.is_empty())
                .map(str::to_owned)
            else {
                return Ok(None);
            };
            let resolved = match relay::resolve(&href, &self.base) {
                Ok(url) => url,
                Err(err) => {
                    warn!("unresolvable stylesheet href {href}: {err}");
                    return Ok(None);
                }
            };
            if self.fetcher.is_blocked(&resolved) {
                warn!("ignoring stylesheet from {resolved}");
                return Ok(None);
            }
            match self.fetcher.fetch_text(&resolved).await {
                Ok(sheet) => {
                    // url() references inside the sheet are relative to the
                    // sheet's own URL, not the page's.
                    let rewritten = self.css.rewrite(&sheet, &resolved).await;
                    let replacement = doc.create_element("style");
                    let text = doc.create_text(&rewritten);
                    doc.append_child(replacement, text);
                    Ok(Some(replacement))
                }
                Err(err) => {
                    warn!("failed to fetch stylesheet {resolved}: {err}");
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
    async fn link_becomes_style_with_rewritten_sheet() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .with_text(
                    "https://x.test/css/site.css",
                    "a { background: url('a.png') }",
                )
                .with_binary("https://x.test/css/a.png", "data:image/png;base64,QQ=="),
        );
        let processor = StylesheetProcessor::new(fetcher, base());
        let mut doc = html::parse(r#"<link rel="stylesheet" href="/css/site.css">"#);
        let link = doc.first_element("link").unwrap();

        let replacement = processor.process(&mut doc, link).await.unwrap().unwrap();
        assert_eq!(doc.tag(replacement), Some("style"));
        assert_eq!(
            doc.text_content(replacement),
            "a { background: url('data:image/png;base64,QQ==') }"
        );
    }

    #[tokio::test]
    async fn empty_href_is_skipped_without_a_fetch() {
        let fetcher = Arc::new(MapFetcher::default());
        let processor = StylesheetProcessor::new(fetcher.clone(), base());
        let mut doc = html::parse(r#"<link rel="stylesheet" href="">"#);
        let link = doc.first_element("link").unwrap();

        let result = processor.process(&mut doc, link).await.unwrap();
        assert!(result.is_none());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn missing_sheet_leaves_link_in_place() {
        let fetcher = Arc::new(MapFetcher::default());
        let processor = StylesheetProcessor::new(fetcher, base());
        let mut doc = html::parse(r#"<link rel="stylesheet" href="/gone.css">"#);
        let link = doc.first_element("link").unwrap();

        let result = processor.process(&mut doc, link).await.unwrap();
        assert!(result.is_none());
    }
}
