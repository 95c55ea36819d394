//! Page and frame lifecycle for the periscope relay.
//!
//! Owns the currently displayed document and its revocable display handle,
//! drives navigations through fetch → parse → rewrite → display, and routes
//! navigation intents posted by the sandboxed frame back into the lifecycle.

pub mod blob;
pub mod frame;
pub mod messenger;
pub mod page;
pub mod state;
pub mod test_support;

pub use blob::{BlobHandle, BlobUrlStore, FrameId};
pub use frame::FrameData;
pub use messenger::FrameMessage;
pub use page::Page;
pub use state::{ViewHandler, ViewSurface};
