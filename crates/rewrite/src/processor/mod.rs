//! Element processors: one CSS selector plus one async transform each.

use anyhow::Error;
use core::future::Future;
use core::pin::Pin;
use html::{Document, NodeId, Selector};

mod hyperlink;
mod image;
mod inline_style;
mod script;
mod stylesheet;

pub use hyperlink::HyperlinkProcessor;
pub use image::ImageProcessor;
pub use inline_style::InlineStyleProcessor;
pub use script::ScriptProcessor;
pub use stylesheet::StylesheetProcessor;

/// Boxed future returned by a transform.
pub type TransformFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<NodeId>, Error>> + Send + 'a>>;

/// One rewrite rule over the parsed document.
///
/// The transform builds a detached replacement node and returns its id, or
/// `None` to leave the element unchanged. Sub-resource failures never
/// propagate: a transform logs and returns `None`, so a partially processed
/// document is always a valid, displayable document.
pub trait ElementProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Selector used to enumerate this processor's elements.
    fn selector(&self) -> &Selector;

    /// Whether this resource class defers fetching in native rendering.
    /// Informational metadata only; it does not gate behavior.
    fn lazy_load(&self) -> bool;

    /// Transforms one element, returning the detached replacement (if any).
    fn process<'a>(&'a self, doc: &'a mut Document, node: NodeId) -> TransformFuture<'a>;
}
