//! Rewriting pipeline for relayed pages.
//!
//! Walks a parsed document and substitutes every externally hosted
//! sub-resource: images and stylesheet `url()` references become data URIs,
//! external scripts and stylesheets become inline copies, and anchors are
//! rerouted through the host's navigation protocol. A navigation shim is
//! injected so script-driven history mutation is observable by the host.

pub mod css;
pub mod pipeline;
pub mod processor;
pub mod test_support;

pub use css::CssRewriter;
pub use pipeline::PipelineManager;
pub use processor::{ElementProcessor, TransformFuture};
