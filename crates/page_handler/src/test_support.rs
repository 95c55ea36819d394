//! Recording view surface for lifecycle tests.

use crate::blob::BlobUrlStore;
use crate::state::ViewSurface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Loading(bool),
    /// A frame was attached. `previous_still_live` captures whether the
    /// previously displayed frame's URL was still resolvable at attach time,
    /// which is how tests observe the attach-before-revoke ordering.
    Display {
        url: String,
        previous_still_live: Option<bool>,
    },
    Error(String),
    Address(String),
}

/// `ViewSurface` that records every call.
#[derive(Debug)]
pub struct RecordingView {
    store: BlobUrlStore,
    events: Vec<ViewEvent>,
    last_displayed: Option<String>,
}

impl RecordingView {
    pub fn new(store: BlobUrlStore) -> Self {
        Self {
            store,
            events: Vec::new(),
            last_displayed: None,
        }
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn displayed_urls(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Display { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ViewSurface for RecordingView {
    fn set_loading(&mut self, loading: bool) {
        self.events.push(ViewEvent::Loading(loading));
    }

    fn display(&mut self, frame_url: &str) {
        let previous_still_live = self
            .last_displayed
            .as_deref()
            .map(|previous| self.store.contains(previous));
        self.events.push(ViewEvent::Display {
            url: frame_url.to_owned(),
            previous_still_live,
        });
        self.last_displayed = Some(frame_url.to_owned());
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(ViewEvent::Error(message.to_owned()));
    }

    fn set_address(&mut self, url: &str) {
        self.events.push(ViewEvent::Address(url.to_owned()));
    }
}
