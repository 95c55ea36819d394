//! Command-line driver: fetch one URL through the relay, rewrite it, and
//! print the result.

use anyhow::{Error, anyhow};
use log::info;
use page_handler::{BlobUrlStore, ViewHandler, ViewSurface};
use relay::{Blocklist, RelayClient};
use std::env;
use std::sync::Arc;
use url::Url;

mod config;

use config::PeriscopeConfig;

/// Console implementation of the view slots.
#[derive(Default)]
struct ConsoleView {
    frame_url: Option<String>,
    error: Option<String>,
}

impl ViewSurface for ConsoleView {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            info!("loading...");
        }
    }

    fn display(&mut self, frame_url: &str) {
        self.frame_url = Some(frame_url.to_owned());
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_owned());
    }

    fn set_address(&mut self, url: &str) {
        info!("address: {url}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let target = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: periscope <url>"))?;
    let config = PeriscopeConfig::from_env();

    let relay_base = Url::parse(&config.relay_base)?;
    let client = RelayClient::with_timeout(relay_base, Blocklist::standard(), config.timeout)?;
    let blobs = BlobUrlStore::new();
    let mut handler = ViewHandler::new(Arc::new(client), blobs.clone(), ConsoleView::default());

    handler.navigate_and_reflect(&target).await;

    if let Some(error) = &handler.view().error {
        return Err(anyhow!("{error}"));
    }
    let frame_url = handler
        .view()
        .frame_url
        .clone()
        .ok_or_else(|| anyhow!("no frame displayed"))?;
    info!("displayed {frame_url}");

    if config.dump_html {
        let (bytes, _mime) = blobs
            .get(&frame_url)
            .ok_or_else(|| anyhow!("display handle missing for {frame_url}"))?;
        println!("{}", String::from_utf8_lossy(&bytes));
    } else {
        println!("{frame_url}");
    }
    Ok(())
}
