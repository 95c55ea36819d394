//! Arena-backed DOM tree and mutation helpers.

use indextree::{Arena, NodeId};
use smallvec::SmallVec;

pub mod printing;
pub mod select;

use select::Selector;

/// Attribute storage: most elements carry only a handful of attributes.
pub type AttrList = SmallVec<[(String, String); 4]>;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Doctype {
        name: String,
    },
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: AttrList,
}

impl DomNode {
    fn element(tag: String) -> Self {
        Self {
            kind: NodeKind::Element { tag },
            attrs: AttrList::new(),
        }
    }
}

/// A parsed page. Owns every node, including detached ones produced while
/// the rewrite pipeline builds replacements.
#[derive(Debug)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        Self {
            root: arena.new_node(DomNode::default()),
            arena,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.arena.get(id).map(indextree::Node::get)
    }

    /// Tag name if `id` is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.arena.get_mut(id) {
            let attrs = &mut node.get_mut().attrs;
            if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
                slot.1 = value.to_owned();
            } else {
                attrs.push((name.to_owned(), value.to_owned()));
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.arena.get_mut(id) {
            node.get_mut().attrs.retain(|(key, _)| key != name);
        }
    }

    /// Creates a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DomNode::element(tag.to_owned()))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: AttrList::new(),
        })
    }

    /// Creates a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode {
            kind: NodeKind::Comment {
                text: text.to_owned(),
            },
            attrs: AttrList::new(),
        })
    }

    /// Creates a detached doctype node.
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.arena.new_node(DomNode {
            kind: NodeKind::Doctype {
                name: name.to_owned(),
            },
            attrs: AttrList::new(),
        })
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        parent.prepend(child, &mut self.arena);
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// Deep-copies the subtree rooted at `id`, returning a detached copy.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let data = self
            .node(id)
            .cloned()
            .unwrap_or_default();
        let copy = self.arena.new_node(data);
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            let child_copy = self.clone_subtree(child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    /// Unlinks `id` from its parent; the subtree stays alive but is no
    /// longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Puts `new` in `old`'s position and detaches `old`'s subtree.
    ///
    /// Position-addressed rather than identity-based: the caller only needs
    /// the old node's id, which stays valid until this call.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) {
        old.insert_after(new, &mut self.arena);
        self.detach(old);
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for descendant in id.descendants(&self.arena) {
            if let Some(DomNode {
                kind: NodeKind::Text { text },
                ..
            }) = self.node(descendant)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// First element with the given tag, in document order.
    pub fn first_element(&self, tag: &str) -> Option<NodeId> {
        self.root
            .descendants(&self.arena)
            .find(|&id| self.tag(id) == Some(tag))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.first_element("head")
    }

    /// Returns the `<head>` element, creating one under `<html>` (or the
    /// document root) if the parse produced none.
    pub fn ensure_head(&mut self) -> NodeId {
        if let Some(head) = self.head() {
            return head;
        }
        let head = self.create_element("head");
        if let Some(html) = self.first_element("html") {
            html.prepend(head, &mut self.arena);
        } else {
            self.root.prepend(head, &mut self.arena);
        }
        head
    }

    /// Whether `id` is still reachable from the document root. Nodes
    /// detached by an earlier replacement fail this check.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if self.arena.get(id).is_none_or(indextree::Node::is_removed) {
            return false;
        }
        id.ancestors(&self.arena).any(|ancestor| ancestor == self.root)
    }

    /// All elements matching `selector`, as a snapshot in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.root
            .descendants(&self.arena)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    pub(crate) fn arena(&self) -> &Arena<DomNode> {
        &self.arena
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_overwrites_existing() {
        let mut doc = Document::new();
        let img = doc.create_element("img");
        doc.set_attr(img, "src", "/a.png");
        doc.set_attr(img, "src", "/b.png");
        assert_eq!(doc.attr(img, "src"), Some("/b.png"));
        assert_eq!(doc.node(img).map(|n| n.attrs.len()), Some(1));
    }

    #[test]
    fn clone_subtree_is_detached_and_deep() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let text = doc.create_text("hello");
        doc.append_child(div, text);
        doc.append_child(doc.root(), div);

        let copy = doc.clone_subtree(div);
        assert_ne!(copy, div);
        assert_eq!(doc.text_content(copy), "hello");

        // Mutating the copy leaves the original alone.
        doc.set_attr(copy, "class", "x");
        assert_eq!(doc.attr(div, "class"), None);
    }

    #[test]
    fn replace_node_keeps_position() {
        let mut doc = Document::new();
        let parent = doc.create_element("p");
        doc.append_child(doc.root(), parent);
        let first = doc.create_text("a");
        let second = doc.create_element("img");
        let third = doc.create_text("b");
        doc.append_child(parent, first);
        doc.append_child(parent, second);
        doc.append_child(parent, third);

        let replacement = doc.create_element("span");
        doc.replace_node(second, replacement);

        let children = doc.children(parent);
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], replacement);
        assert!(!doc.is_attached(second));
        assert!(doc.is_attached(replacement));
    }

    #[test]
    fn ensure_head_creates_one_when_missing() {
        let mut doc = Document::new();
        let html = doc.create_element("html");
        doc.append_child(doc.root(), html);
        assert!(doc.head().is_none());
        let head = doc.ensure_head();
        assert_eq!(doc.head(), Some(head));
        assert_eq!(doc.children(html)[0], head);
    }
}
