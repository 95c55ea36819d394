//! HTML parsing.
//!
//! Parsing goes through html5ever's reference DOM and is then converted
//! node-by-node into our arena [`Document`]. The conversion keeps doctype,
//! comments and whitespace text so the serialized result stays faithful to
//! what the relay fetched.

use crate::dom::Document;
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Parses an HTML string into a [`Document`].
///
/// html5ever recovers from malformed markup the way browsers do, so this
/// never fails; garbage input produces a small but well-formed tree.
pub fn parse(html: &str) -> Document {
    let rc_dom: RcDom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut doc = Document::new();
    let root = doc.root();
    convert_children(&rc_dom.document, &mut doc, root);
    doc
}

fn convert_children(rc_node: &Handle, doc: &mut Document, parent: NodeId) {
    for child in rc_node.children.borrow().iter() {
        convert_node(child, doc, parent);
    }
}

fn convert_node(rc_node: &Handle, doc: &mut Document, parent: NodeId) {
    match &rc_node.data {
        RcNodeData::Document => convert_children(rc_node, doc, parent),

        RcNodeData::Doctype { name, .. } => {
            let node = doc.create_doctype(&name.to_string());
            doc.append_child(parent, node);
        }

        RcNodeData::Text { contents } => {
            let node = doc.create_text(&contents.borrow().to_string());
            doc.append_child(parent, node);
        }

        RcNodeData::Comment { contents } => {
            let node = doc.create_comment(&contents.to_string());
            doc.append_child(parent, node);
        }

        RcNodeData::Element { name, attrs, .. } => {
            let node = doc.create_element(&name.local.to_string());
            for attr in attrs.borrow().iter() {
                doc.set_attr(node, &attr.name.local.to_string(), &attr.value.to_string());
            }
            doc.append_child(parent, node);
            convert_children(rc_node, doc, node);
        }

        RcNodeData::ProcessingInstruction { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn builds_standard_skeleton() {
        let doc = parse("<p>hi</p>");
        assert!(doc.first_element("html").is_some());
        assert!(doc.head().is_some());
        let p = doc.first_element("p").unwrap();
        assert_eq!(doc.text_content(p), "hi");
    }

    #[test]
    fn keeps_attributes() {
        let doc = parse(r#"<a href="/x" target="_blank">go</a>"#);
        let a = doc.first_element("a").unwrap();
        assert_eq!(doc.attr(a, "href"), Some("/x"));
        assert_eq!(doc.attr(a, "target"), Some("_blank"));
    }

    #[test]
    fn survives_malformed_markup() {
        let doc = parse("<div><p>unclosed<div>more");
        assert!(doc.first_element("html").is_some());
        assert!(doc.to_html().contains("unclosed"));
    }
}
