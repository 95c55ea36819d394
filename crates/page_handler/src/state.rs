//! Navigation lifecycle: Idle -> Loading -> Parsed -> Rewriting -> Displayed.

use crate::blob::{BlobUrlStore, FrameId};
use crate::frame::FrameData;
use crate::page::Page;
use anyhow::Error;
use log::{debug, error};
use relay::{RelayError, ResourceFetcher};
use rewrite::PipelineManager;
use std::sync::Arc;
use url::Url;

/// The host UI slots the lifecycle drives. Widget wiring lives outside this
/// crate; implementations just mirror these calls onto whatever surface
/// hosts the frame.
pub trait ViewSurface {
    fn set_loading(&mut self, loading: bool);
    /// Points the frame at a display URL. Called before the previous frame's
    /// handle is revoked.
    fn display(&mut self, frame_url: &str);
    fn show_error(&mut self, message: &str);
    /// Reflects a navigation in the address-bar slot.
    fn set_address(&mut self, url: &str);
}

/// Owns the currently displayed page and arbitrates navigation requests.
pub struct ViewHandler<V: ViewSurface> {
    fetcher: Arc<dyn ResourceFetcher>,
    blobs: BlobUrlStore,
    view: V,
    current_page: Option<Page>,
    /// Bumped once per navigation request. A navigation may only commit its
    /// frame while its own generation is still the latest; stale results are
    /// discarded instead of raced into the display slot.
    generation: u64,
}

impl<V: ViewSurface> ViewHandler<V> {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, blobs: BlobUrlStore, view: V) -> Self {
        Self {
            fetcher,
            blobs,
            view,
            current_page: None,
            generation: 0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page.as_ref()
    }

    /// Identity of the currently displayed frame, for messenger checks.
    pub fn current_frame_id(&self) -> Option<FrameId> {
        self.current_page
            .as_ref()
            .and_then(Page::frame)
            .map(FrameData::id)
    }

    pub fn blobs(&self) -> &BlobUrlStore {
        &self.blobs
    }

    /// Navigates to `raw_url` without touching the address-bar slot.
    ///
    /// Validation and primary-document failures surface as a single error
    /// state on the view; nothing partial is ever displayed.
    pub async fn navigate(&mut self, raw_url: &str) {
        if let Err(err) = self.try_navigate(raw_url).await {
            self.surface_failure(raw_url, &err);
        }
    }

    /// Navigates and reflects the target in the address-bar slot.
    ///
    /// The target is validated before the slot is written, so an unparsable
    /// URL never lands in the address bar.
    pub async fn navigate_and_reflect(&mut self, raw_url: &str) {
        if let Err(err) = parse_target(raw_url) {
            self.surface_failure(raw_url, &err.into());
            return;
        }
        self.view.set_address(raw_url);
        self.navigate(raw_url).await;
    }

    fn surface_failure(&mut self, raw_url: &str, err: &Error) {
        error!("failed to load {raw_url}: {err}");
        self.view.set_loading(false);
        self.view.show_error(&format!("Failed to load site: {err}"));
    }

    async fn try_navigate(&mut self, raw_url: &str) -> Result<(), Error> {
        let url = parse_target(raw_url)?;
        let generation = self.begin_navigation();
        self.view.set_loading(true);

        let mut page = Page::new(url.clone());
        let mut doc = page.load(&*self.fetcher).await?;

        let pipeline = PipelineManager::new(self.fetcher.clone(), url);
        pipeline.process(&mut doc).await;

        let frame = FrameData::new(doc, &self.blobs);
        self.commit(generation, page, frame);
        Ok(())
    }

    fn begin_navigation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Installs a finished navigation, unless it has been superseded.
    ///
    /// The generation is re-validated here, after every await point, so the
    /// read-then-mutate sequence on the current-frame slot is never split
    /// across a suspension.
    fn commit(&mut self, generation: u64, mut page: Page, frame: FrameData) {
        if generation != self.generation {
            debug!(
                "navigation to {} superseded; discarding stale frame",
                page.url()
            );
            return;
        }
        // Attach the new frame before the old page (and its handle) drops,
        // so the view never shows a blank frame.
        self.view.display(frame.url());
        self.view.set_loading(false);
        page.attach_frame(frame);
        self.current_page = Some(page);
    }
}

fn parse_target(raw_url: &str) -> Result<Url, RelayError> {
    Url::parse(raw_url.trim())
        .map_err(|err| RelayError::InvalidInput(format!("{raw_url}: {err}")))
}
