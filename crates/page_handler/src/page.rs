//! One navigation's page state.

use crate::frame::FrameData;
use html::Document;
use relay::{RelayError, ResourceFetcher};
use url::Url;

/// Wraps the originating URL, a loading flag and (once displayed) the frame.
///
/// A same-URL reload is structurally a re-fetch: `load` never serves from
/// any cache, and if the page already holds a frame it is released before
/// the new document is constructed.
#[derive(Debug)]
pub struct Page {
    url: Url,
    frame: Option<FrameData>,
    loading: bool,
}

impl Page {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            frame: None,
            loading: true,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn frame(&self) -> Option<&FrameData> {
        self.frame.as_ref()
    }

    /// Fetches and parses the primary document.
    ///
    /// The caller rewrites the returned tree and hands it back through
    /// [`Self::attach_frame`].
    ///
    /// # Errors
    /// Primary-document fetch failures are fatal to the navigation and
    /// propagate; no partial state is retained.
    pub async fn load(&mut self, fetcher: &dyn ResourceFetcher) -> Result<Document, RelayError> {
        if self.frame.is_some() {
            drop(self.frame.take());
        }
        self.loading = true;
        let text = fetcher.fetch_text(&self.url).await?;
        Ok(html::parse(&text))
    }

    /// Installs the displayed frame, returning the previous one (if any) so
    /// the caller controls release ordering.
    pub fn attach_frame(&mut self, frame: FrameData) -> Option<FrameData> {
        self.loading = false;
        self.frame.replace(frame)
    }

    /// Releases the current frame.
    pub fn release_frame(&mut self) -> Option<FrameData> {
        self.loading = false;
        self.frame.take()
    }
}
