//! Cross-frame message protocol and routing.
//!
//! The rendered frame's injected shim and rewritten anchors post structured
//! messages to the host. The sole access-control check is frame identity:
//! a message is honored only if its source is the currently displayed
//! frame, compared by id, never by origin string.

use crate::blob::FrameId;
use crate::state::{ViewHandler, ViewSurface};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// JSON-shaped message posted from the frame to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrameMessage {
    /// Replace the current navigation target and update address-bar state.
    #[serde(rename = "REDIRECT")]
    Redirect { url: String },
    /// Navigate without updating address-bar state; the URL may be relative
    /// to the current page.
    #[serde(rename = "NAVIGATE")]
    Navigate { url: String },
    /// Logged only; no state change.
    #[serde(rename = "MESSAGE")]
    Message { url: String },
}

impl<V: ViewSurface> ViewHandler<V> {
    /// Routes one raw message received from a frame.
    ///
    /// Messages from any source other than the live frame, unparsable
    /// payloads and unrecognized types are all silently ignored.
    pub async fn handle_frame_message(&mut self, source: FrameId, raw: &str) {
        if Some(source) != self.current_frame_id() {
            debug!("dropping message from non-current frame");
            return;
        }
        let Ok(message) = serde_json::from_str::<FrameMessage>(raw) else {
            debug!("ignoring unrecognized frame message: {raw}");
            return;
        };
        match message {
            FrameMessage::Redirect { url } => {
                info!("redirecting to {url}");
                self.navigate_and_reflect(&url).await;
            }
            FrameMessage::Navigate { url } => {
                let Some(base) = self.current_page().map(|page| page.url().clone()) else {
                    return;
                };
                match relay::resolve(&url, &base) {
                    Ok(resolved) => {
                        info!("navigating to {resolved}");
                        self.navigate(resolved.as_str()).await;
                    }
                    Err(err) => warn!("unresolvable navigation target {url}: {err}"),
                }
            }
            FrameMessage::Message { url } => {
                info!("message from frame: {url}");
            }
        }
    }
}
