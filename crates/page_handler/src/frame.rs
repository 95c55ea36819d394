//! A displayable snapshot of a rewritten document.

use crate::blob::{BlobHandle, BlobUrlStore, FrameId};
use bytes::Bytes;
use html::Document;

/// A parsed (and rewritten) document together with its display handle.
///
/// Exactly one handle is live per frame; dropping the frame revokes it. The
/// lifecycle attaches a successor's handle to the view before dropping the
/// predecessor so the view never points at revoked bytes.
#[derive(Debug)]
pub struct FrameData {
    doc: Document,
    handle: BlobHandle,
}

impl FrameData {
    /// Serializes `doc` and registers the bytes with the store.
    pub fn new(doc: Document, store: &BlobUrlStore) -> Self {
        let handle = store.create(Bytes::from(doc.to_html()), "text/html");
        Self { doc, handle }
    }

    /// The displayable `blob:` URL for this frame.
    pub fn url(&self) -> &str {
        self.handle.url()
    }

    /// Identity used by the messenger's access-control check.
    pub fn id(&self) -> FrameId {
        self.handle.frame_id()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Releases the frame, revoking its display handle.
    pub fn close(self) {}
}
