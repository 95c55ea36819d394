//! Navigation lifecycle and messenger behavior over full documents.

use page_handler::blob::FrameId;
use page_handler::test_support::{RecordingView, ViewEvent};
use page_handler::{BlobUrlStore, ViewHandler};
use rewrite::test_support::MapFetcher;
use std::sync::Arc;

fn handler(fetcher: MapFetcher) -> ViewHandler<RecordingView> {
    let blobs = BlobUrlStore::new();
    let view = RecordingView::new(blobs.clone());
    ViewHandler::new(Arc::new(fetcher), blobs, view)
}

#[tokio::test]
async fn navigation_displays_rewritten_document() {
    let fetcher = MapFetcher::default()
        .with_text(
            "https://x.test/",
            r#"<html><body><img src="/a.png"><a href="https://x.test/b">go</a></body></html>"#,
        )
        .with_binary("https://x.test/a.png", "data:image/jpeg;base64,/9g=");
    let mut handler = handler(fetcher);

    handler.navigate("https://x.test/").await;

    let page = handler.current_page().expect("page displayed");
    assert!(!page.is_loading());
    let frame = page.frame().expect("frame attached");
    let (bytes, mime) = handler.blobs().get(frame.url()).expect("blob live");
    let displayed = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(mime, "text/html");
    assert!(displayed.contains("data:image/jpeg;base64,/9g="));
    // The onclick payload is attribute-escaped in the serialized frame.
    assert!(displayed.contains("postMessage"));
    assert!(displayed.contains("REDIRECT"));
    assert!(displayed.contains("history.pushState"));
}

#[tokio::test]
async fn new_frame_attached_before_old_one_revoked() {
    let fetcher = MapFetcher::default()
        .with_text("https://x.test/one", "<p>one</p>")
        .with_text("https://x.test/two", "<p>two</p>");
    let mut handler = handler(fetcher);

    handler.navigate("https://x.test/one").await;
    let first_url = handler
        .current_page()
        .and_then(|page| page.frame())
        .unwrap()
        .url()
        .to_owned();

    handler.navigate("https://x.test/two").await;

    // At the moment the second frame was attached, the first was still live.
    let display_events: Vec<&ViewEvent> = handler
        .view()
        .events()
        .iter()
        .filter(|event| matches!(event, ViewEvent::Display { .. }))
        .collect();
    assert_eq!(display_events.len(), 2);
    assert!(matches!(
        display_events[1],
        ViewEvent::Display {
            previous_still_live: Some(true),
            ..
        }
    ));
    // And it is revoked once the transition completes.
    assert!(!handler.blobs().contains(&first_url));
    assert_eq!(handler.blobs().len(), 1);
}

#[tokio::test]
async fn failed_navigation_keeps_previous_page_displayed() {
    let fetcher = MapFetcher::default().with_text("https://x.test/", "<p>home</p>");
    let mut handler = handler(fetcher);

    handler.navigate("https://x.test/").await;
    let first_url = handler
        .current_page()
        .and_then(|page| page.frame())
        .unwrap()
        .url()
        .to_owned();

    handler.navigate("https://gone.test/").await;

    assert!(handler.blobs().contains(&first_url));
    assert_eq!(
        handler.current_page().unwrap().url().as_str(),
        "https://x.test/"
    );
    assert!(handler
        .view()
        .events()
        .iter()
        .any(|event| matches!(event, ViewEvent::Error(_))));
}

#[tokio::test]
async fn message_from_non_current_frame_is_ignored() {
    let fetcher = MapFetcher::default()
        .with_text("https://x.test/", "<p>home</p>")
        .with_text("https://x.test/b", "<p>b</p>");
    let mut handler = handler(fetcher);
    handler.navigate("https://x.test/").await;

    let foreign = FrameId::from_raw(u64::MAX);
    handler
        .handle_frame_message(foreign, r#"{"type":"REDIRECT","url":"https://x.test/b"}"#)
        .await;

    assert_eq!(
        handler.current_page().unwrap().url().as_str(),
        "https://x.test/"
    );
    assert_eq!(handler.view().displayed_urls().len(), 1);
}

#[tokio::test]
async fn redirect_message_navigates_and_updates_address() {
    let fetcher = MapFetcher::default()
        .with_text("https://x.test/", "<p>home</p>")
        .with_text("https://x.test/b", "<p>b</p>");
    let mut handler = handler(fetcher);
    handler.navigate("https://x.test/").await;

    let current = handler.current_frame_id().unwrap();
    handler
        .handle_frame_message(current, r#"{"type":"REDIRECT","url":"https://x.test/b"}"#)
        .await;

    assert_eq!(
        handler.current_page().unwrap().url().as_str(),
        "https://x.test/b"
    );
    assert!(handler
        .view()
        .events()
        .iter()
        .any(|event| matches!(event, ViewEvent::Address(url) if url == "https://x.test/b")));
}

#[tokio::test]
async fn navigate_message_resolves_relative_url_without_address_update() {
    let fetcher = MapFetcher::default()
        .with_text("https://x.test/dir/", "<p>home</p>")
        .with_text("https://x.test/dir/next", "<p>next</p>");
    let mut handler = handler(fetcher);
    handler.navigate("https://x.test/dir/").await;

    let current = handler.current_frame_id().unwrap();
    handler
        .handle_frame_message(current, r#"{"type":"NAVIGATE","url":"next"}"#)
        .await;

    assert_eq!(
        handler.current_page().unwrap().url().as_str(),
        "https://x.test/dir/next"
    );
    assert!(!handler
        .view()
        .events()
        .iter()
        .any(|event| matches!(event, ViewEvent::Address(_))));
}

#[tokio::test]
async fn message_type_message_changes_nothing() {
    let fetcher = MapFetcher::default().with_text("https://x.test/", "<p>home</p>");
    let mut handler = handler(fetcher);
    handler.navigate("https://x.test/").await;

    let current = handler.current_frame_id().unwrap();
    let events_before = handler.view().events().len();
    handler
        .handle_frame_message(current, r#"{"type":"MESSAGE","url":"hello"}"#)
        .await;
    assert_eq!(handler.view().events().len(), events_before);
}
