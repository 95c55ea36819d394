//! Minimal CSS selector matching.
//!
//! The rewrite pipeline only ever asks for `tag`, `[attr]`, `tag[attr]` or
//! `tag[attr=value]`, so that is the whole grammar. Values may be quoted with
//! single or double quotes.

use super::Document;
use indextree::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    attr: Option<String>,
    value: Option<String>,
}

impl Selector {
    /// Parses a selector, returning `None` for anything outside the
    /// supported grammar.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let (tag_part, attr_part) = match input.find('[') {
            Some(open) => {
                let close = input.rfind(']')?;
                if close != input.len() - 1 || close <= open {
                    return None;
                }
                (&input[..open], Some(&input[open + 1..close]))
            }
            None => (input, None),
        };

        let tag = if tag_part.is_empty() {
            None
        } else {
            if !tag_part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return None;
            }
            Some(tag_part.to_ascii_lowercase())
        };

        let (attr, value) = match attr_part {
            None => (None, None),
            Some(body) => match body.split_once('=') {
                None => (Some(body.trim().to_ascii_lowercase()), None),
                Some((name, raw)) => {
                    let raw = raw.trim();
                    let unquoted = raw
                        .strip_prefix('"')
                        .and_then(|r| r.strip_suffix('"'))
                        .or_else(|| raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
                        .unwrap_or(raw);
                    (
                        Some(name.trim().to_ascii_lowercase()),
                        Some(unquoted.to_owned()),
                    )
                }
            },
        };

        if tag.is_none() && attr.is_none() {
            return None;
        }

        Some(Self { tag, attr, value })
    }

    /// Whether the element at `id` matches. Non-element nodes never match.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(tag) = doc.tag(id) else {
            return false;
        };
        if let Some(want) = &self.tag {
            if !tag.eq_ignore_ascii_case(want) {
                return false;
            }
        }
        if let Some(attr) = &self.attr {
            match doc.attr(id, attr) {
                None => return false,
                Some(actual) => {
                    if let Some(want) = &self.value {
                        if !actual.eq_ignore_ascii_case(want) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}
