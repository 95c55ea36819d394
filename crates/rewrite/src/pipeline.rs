//! Ordered rewrite pass over a parsed document.

use crate::processor::{
    ElementProcessor, HyperlinkProcessor, ImageProcessor, InlineStyleProcessor, ScriptProcessor,
    StylesheetProcessor,
};
use html::Document;
use log::{debug, warn};
use relay::ResourceFetcher;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

/// Script injected into `<head>` before any element is touched.
///
/// Overrides the two history-mutation entry points so script-driven
/// navigation inside the sandboxed frame is reported to the host instead of
/// executed locally: a history replacement posts `REDIRECT`, a push posts
/// `NAVIGATE`.
const NAVIGATION_SHIM: &str = "\n\
    history.replaceState = function(state, title, url) {\n\
        window.parent.postMessage({ type: 'REDIRECT', url: url }, '*');\n\
    };\n\
    history.pushState = function(state, title, url) {\n\
        window.parent.postMessage({ type: 'NAVIGATE', url: url }, '*');\n\
    };\n";

/// Runs the fixed processor list over a document.
pub struct PipelineManager {
    processors: Vec<Box<dyn ElementProcessor>>,
}

impl PipelineManager {
    /// Builds the pipeline for one page. Order is fixed: image, script,
    /// stylesheet, inline style, hyperlink.
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, base: Url) -> Self {
        Self {
            processors: vec![
                Box::new(ImageProcessor::new(fetcher.clone(), base.clone())),
                Box::new(ScriptProcessor::new(fetcher.clone(), base.clone())),
                Box::new(StylesheetProcessor::new(fetcher.clone(), base.clone())),
                Box::new(InlineStyleProcessor::new(fetcher, base.clone())),
                Box::new(HyperlinkProcessor::new(base)),
            ],
        }
    }

    /// Rewrites `doc` in place.
    ///
    /// Each processor enumerates its elements once, as a static snapshot
    /// taken before any replacement in that pass, then transforms them
    /// sequentially. A transform failure degrades to "no replacement"; every
    /// intermediate state is a well-formed, displayable document, so partial
    /// failure is never fatal.
    pub async fn process(&self, doc: &mut Document) {
        self.inject_navigation_shim(doc);
        for processor in &self.processors {
            let snapshot = doc.select(processor.selector());
            debug!(
                "{} pass over {} element(s)",
                processor.name(),
                snapshot.len()
            );
            for node in snapshot {
                // An earlier replacement in this pass may have removed a
                // nested match; its id must not be trusted afterwards.
                if !doc.is_attached(node) {
                    continue;
                }
                match processor.process(doc, node).await {
                    Ok(Some(replacement)) if replacement != node => {
                        doc.replace_node(node, replacement);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!("{} transform failed: {err}", processor.name());
                    }
                }
            }
        }
        debug!("rewrite complete");
    }

    /// Detached variant for callers that cannot wait.
    ///
    /// The pass runs on the runtime and mutates the shared document when it
    /// gets the lock; reads performed before the task finishes may observe
    /// the unrewritten tree.
    pub fn process_detached(self: Arc<Self>, doc: Arc<Mutex<Document>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut doc = doc.lock().await;
            self.process(&mut doc).await;
        })
    }

    fn inject_navigation_shim(&self, doc: &mut Document) {
        let head = doc.ensure_head();
        let script = doc.create_element("script");
        doc.set_attr(script, "type", "text/javascript");
        let body = doc.create_text(NAVIGATION_SHIM);
        doc.append_child(script, body);
        doc.append_child(head, script);
    }
}
