//! Ownable, revocable byte resources backing displayed frames.
//!
//! Mirrors the object-URL contract the view consumes: creating an entry
//! yields a unique `blob:` style URL, and the bytes stay reachable until the
//! handle is revoked. Handles revoke themselves on drop so a frame that
//! never reaches the view still releases its bytes.

use bytes::Bytes;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Identity of one displayed frame. Messenger access control compares these
/// by value; they are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    /// Builds an id from a raw value; used by hosts that transport frame
    /// identity across a process boundary, and by tests.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug)]
struct BlobEntry {
    bytes: Bytes,
    mime: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: Mutex<HashMap<u64, BlobEntry>>,
    next_id: AtomicU64,
}

/// Shared store of live blob URLs.
#[derive(Debug, Clone, Default)]
pub struct BlobUrlStore {
    inner: Arc<StoreInner>,
}

impl BlobUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns the owning handle.
    pub fn create(&self, bytes: Bytes, mime: &str) -> BlobHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.insert(
                id,
                BlobEntry {
                    bytes,
                    mime: mime.to_owned(),
                },
            );
        }
        BlobHandle {
            id,
            url: format!("blob:periscope/{id}"),
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Whether a URL produced by [`Self::create`] is still live.
    pub fn contains(&self, url: &str) -> bool {
        parse_blob_url(url).is_some_and(|id| {
            self.inner
                .entries
                .lock()
                .map(|entries| entries.contains_key(&id))
                .unwrap_or(false)
        })
    }

    /// Bytes and MIME type for a live URL.
    pub fn get(&self, url: &str) -> Option<(Bytes, String)> {
        let id = parse_blob_url(url)?;
        let entries = self.inner.entries.lock().ok()?;
        entries
            .get(&id)
            .map(|entry| (entry.bytes.clone(), entry.mime.clone()))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_blob_url(url: &str) -> Option<u64> {
    url.strip_prefix("blob:periscope/")?.parse().ok()
}

/// Exclusive owner of one stored blob. Exactly one handle exists per entry;
/// dropping it revokes the URL.
#[derive(Debug)]
pub struct BlobHandle {
    id: u64,
    url: String,
    store: Weak<StoreInner>,
}

impl BlobHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn frame_id(&self) -> FrameId {
        FrameId(self.id)
    }

    /// Explicit revocation; equivalent to dropping the handle.
    pub fn revoke(self) {}
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade()
            && let Ok(mut entries) = store.entries.lock()
        {
            entries.remove(&self.id);
            debug!("revoked {}", self.url);
        }
    }
}
