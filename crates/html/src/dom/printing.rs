//! HTML serialization.
//!
//! Turns the (possibly rewritten) tree back into markup the frame can
//! display. Kept deliberately close to what the parser accepts: raw-text
//! elements keep their content verbatim, void elements get no close tag.

use super::{Document, DomNode, NodeKind};
use indextree::NodeId;
use std::fmt::Write as _;

/// Elements whose content model is raw text; their text children must not be
/// entity-escaped or the payload (inlined scripts, rewritten stylesheets)
/// would be corrupted.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(DomNode { kind, attrs }) = doc.node(id) else {
        return;
    };
    match kind {
        NodeKind::Document => {
            for child in id.children(doc.arena()) {
                write_node(doc, child, out);
            }
        }
        NodeKind::Doctype { name } => {
            let _ = write!(out, "<!DOCTYPE {name}>");
        }
        NodeKind::Comment { text } => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeKind::Text { text } => escape_text(text, out),
        NodeKind::Element { tag } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
            for child in id.children(doc.arena()) {
                if raw
                    && let Some(DomNode {
                        kind: NodeKind::Text { text },
                        ..
                    }) = doc.node(child)
                {
                    out.push_str(text);
                    continue;
                }
                write_node(doc, child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

impl Document {
    /// Serializes the whole document to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, self.root(), &mut out);
        out
    }

    /// Serializes one subtree (used by tests and diagnostics).
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_node(self, id, &mut out);
        out
    }
}
