//! Rewrites `style` attributes in place (on a clone).

use super::{ElementProcessor, TransformFuture};
use crate::css::CssRewriter;
use html::{Document, NodeId, Selector};
use relay::ResourceFetcher;
use std::sync::Arc;
use url::Url;

pub struct InlineStyleProcessor {
    css: CssRewriter,
    base: Url,
    selector: Selector,
}

impl InlineStyleProcessor {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, base: Url) -> Self {
        Self {
            css: CssRewriter::new(fetcher),
            base,
            selector: Selector::parse("[style]").expect("static selector"),
        }
    }
}

impl ElementProcessor for InlineStyleProcessor {
    fn name(&self) -> &'static str {
        "inline-style"
    }

    fn selector(&self) -> &Selector {
        &self.selector
    }

    fn lazy_load(&self) -> bool {
        true
    }

    fn process<'a>(&'a self, doc: &'a mut Document, node: NodeId) -> TransformFuture<'a> {
        Box::pin(async move {
            let Some(style) = doc.attr(node, "style").map(str::to_owned) else {
                return Ok(None);
            };
            let rewritten = self.css.rewrite(&style, &self.base).await;
            if rewritten == style {
                return Ok(None);
            }
            let copy = doc.clone_subtree(node);
            doc.set_attr(copy, "style", &rewritten);
            Ok(Some(copy))
        })
    }
}
