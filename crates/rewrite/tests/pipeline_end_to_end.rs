//! End-to-end rewrite scenarios over full documents.

use rewrite::PipelineManager;
use rewrite::test_support::MapFetcher;
use std::sync::Arc;
use url::Url;

fn base() -> Url {
    Url::parse("https://x.test/").unwrap()
}

#[tokio::test]
async fn image_is_inlined_and_origin_never_left_in_markup() {
    let fetcher = Arc::new(
        MapFetcher::default().with_binary("https://x.test/a.png", "data:image/jpeg;base64,/9g="),
    );
    let pipeline = PipelineManager::new(fetcher.clone(), base());
    let mut doc = html::parse(r#"<html><body><img src="/a.png"></body></html>"#);
    pipeline.process(&mut doc).await;

    let img = doc.first_element("img").unwrap();
    assert!(doc.attr(img, "src").unwrap().starts_with("data:"));
    assert!(!doc.to_html().contains("/a.png"));
    assert_eq!(fetcher.requests(), ["https://x.test/a.png"]);
}

#[tokio::test]
async fn anchor_gets_redirect_onclick_and_loses_target() {
    let pipeline = PipelineManager::new(Arc::new(MapFetcher::default()), base());
    let mut doc = html::parse(r#"<html><body><a href="https://x.test/b" target="_top">go</a></body></html>"#);
    pipeline.process(&mut doc).await;

    let a = doc.first_element("a").unwrap();
    let onclick = doc.attr(a, "onclick").unwrap();
    assert!(onclick.contains("postMessage"));
    assert!(onclick.contains(r#""type":"REDIRECT""#));
    assert!(onclick.contains("https://x.test/b"));
    assert_eq!(doc.attr(a, "target"), None);
    assert_eq!(doc.attr(a, "href"), Some("https://x.test/b"));
}

#[tokio::test]
async fn partial_stylesheet_failure_degrades_only_itself() {
    let fetcher = Arc::new(
        MapFetcher::default()
            .with_text(
                "https://x.test/site.css",
                "a { background: url('ok.png') } b { background: url('bad.png') }",
            )
            .with_binary("https://x.test/ok.png", "data:image/png;base64,T0s="),
    );
    let pipeline = PipelineManager::new(fetcher, base());
    let mut doc = html::parse(r#"<html><head><link rel="stylesheet" href="/site.css"></head></html>"#);
    pipeline.process(&mut doc).await;

    let style = doc.first_element("style").unwrap();
    let sheet = doc.text_content(style);
    assert!(sheet.contains("url('data:image/png;base64,T0s=')"));
    assert!(sheet.contains("url('bad.png')"));
    assert!(doc.first_element("link").is_none());
}

#[tokio::test]
async fn blocked_hosts_keep_their_references() {
    let fetcher = Arc::new(MapFetcher::default().with_text(
        "https://www.google-analytics.com/ga.js",
        "var ga;",
    ));
    let pipeline = PipelineManager::new(fetcher.clone(), base());
    let mut doc = html::parse(
        r#"<html><head>
            <script src="https://www.google-analytics.com/ga.js"></script>
            <link rel="stylesheet" href="https://fonts.googleapis.com/css?family=X">
        </head></html>"#,
    );
    pipeline.process(&mut doc).await;

    let html_out = doc.to_html();
    assert!(html_out.contains(r#"src="https://www.google-analytics.com/ga.js""#));
    assert!(html_out.contains(r#"href="https://fonts.googleapis.com/css?family=X""#));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn failed_primary_resources_leave_a_displayable_document() {
    // Nothing resolvable at all: every element degrades, none disappear.
    let pipeline = PipelineManager::new(Arc::new(MapFetcher::default()), base());
    let mut doc = html::parse(
        r#"<html><body>
            <img src="/gone.png">
            <script src="/gone.js"></script>
            <p style="background: url('/gone.png')">text</p>
        </body></html>"#,
    );
    pipeline.process(&mut doc).await;

    let html_out = doc.to_html();
    assert!(html_out.contains(r#"<img src="/gone.png">"#));
    assert!(html_out.contains(r#"src="/gone.js""#));
    assert!(html_out.contains("text"));
}
