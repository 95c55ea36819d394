//! Document model for the periscope relay.
//!
//! This crate owns the parsed representation of a relayed page: an arena-backed
//! tree built from html5ever's parse output, a small selector matcher used by
//! the rewrite pipeline to enumerate elements, and a serializer that turns the
//! (possibly rewritten) tree back into displayable HTML.

pub mod dom;
pub mod parser;

pub use dom::select::Selector;
pub use dom::{Document, DomNode, NodeKind};
pub use indextree::NodeId;
pub use parser::parse;
