//! Routes anchor clicks back to the host instead of navigating the frame.

use super::{ElementProcessor, TransformFuture};
use html::{Document, NodeId, Selector};
use log::warn;
use serde_json::json;
use url::Url;

pub struct HyperlinkProcessor {
    base: Url,
    selector: Selector,
}

impl HyperlinkProcessor {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            selector: Selector::parse("a[href]").expect("static selector"),
        }
    }
}

impl ElementProcessor for HyperlinkProcessor {
    fn name(&self) -> &'static str {
        "hyperlink"
    }

    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn lazy_load(&self) -> bool {
        false
    }

    fn process<'a>(&'a self, doc: &'a mut Document, node: NodeId) -> TransformFuture<'a> {
        Box::pin(async move {
            let Some(href) = doc.attr(node, "href").map(str::to_owned) else {
                return Ok(None);
            };
            // Fragment, mailto:, javascript: and friends keep their native
            // behavior inside the frame.
            if !href.starts_with("http:") && !href.starts_with("https:") {
                return Ok(None);
            }
            let resolved = match relay::resolve(&href, &self.base) {
                Ok(url) => url,
                Err(err) => {
                    warn!("unresolvable anchor href {href}: {err}");
                    return Ok(None);
                }
            };
            let message = json!({ "type": "REDIRECT", "url": resolved.as_str() });
            let onclick = format!("window.parent.postMessage({message}, '*'); return false;");

            let copy = doc.clone_subtree(node);
            doc.set_attr(copy, "onclick", &onclick);
            // Kept as a real fallback even though onclick supersedes it.
            doc.set_attr(copy, "href", resolved.as_str());
            doc.remove_attr(copy, "target");
            Ok(Some(copy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> HyperlinkProcessor {
        HyperlinkProcessor::new(Url::parse("https://x.test/").unwrap())
    }

    #[tokio::test]
    async fn rewrites_absolute_link_with_redirect_message() {
        let mut doc = html::parse(r#"<a href="https://x.test/b" target="_blank">go</a>"#);
        let a = doc.first_element("a").unwrap();

        let copy = processor().process(&mut doc, a).await.unwrap().unwrap();
        let onclick = doc.attr(copy, "onclick").unwrap();
        assert!(onclick.contains("postMessage"));
        assert!(onclick.contains(r#""type":"REDIRECT""#));
        assert!(onclick.contains("https://x.test/b"));
        assert_eq!(doc.attr(copy, "href"), Some("https://x.test/b"));
        assert_eq!(doc.attr(copy, "target"), None);
    }

    #[tokio::test]
    async fn non_http_schemes_are_skipped() {
        for href in ["#top", "mailto:a@x.test", "javascript:void(0)", "/relative"] {
            let mut doc = html::parse(&format!(r#"<a href="{href}">x</a>"#));
            let a = doc.first_element("a").unwrap();
            assert!(
                processor().process(&mut doc, a).await.unwrap().is_none(),
                "expected skip for {href}"
            );
        }
    }
}
