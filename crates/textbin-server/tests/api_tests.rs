//! End-to-end tests for the HTTP API, driven through the router in-process.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use textbin_core::auth::ApiToken;
use textbin_core::document::Document;
use textbin_server::config::Theme;
use textbin_server::routes;
use textbin_server::state::AppState;
use textbin_storage::{FsDocumentFile, MemoryDocumentFile};

const TOKEN: &str = "test-token";

async fn app_with(file: &MemoryDocumentFile) -> Router {
    let document = Document::open(Arc::new(file.clone())).await.unwrap();
    let state = Arc::new(AppState::new(document, ApiToken::new(TOKEN), Theme::Auto));
    routes::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("X-API-Token", token);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn content_body(content: &str) -> String {
    serde_json::json!({ "content": content }).to_string()
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}

fn bytes_written(resp: &axum::response::Response) -> Option<usize> {
    resp.headers()
        .get("X-Bytes-Written")
        .map(|v| v.to_str().unwrap().parse().unwrap())
}

#[tokio::test]
async fn fetch_empty_document_is_no_content() {
    let file = MemoryDocumentFile::with_content("");
    let app = app_with(&file).await;

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_string(resp).await.is_empty());
}

#[tokio::test]
async fn fetch_returns_loaded_text() {
    let file = MemoryDocumentFile::with_content("line one\nline two\n");
    let app = app_with(&file).await;

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_string(resp).await, "line one\nline two\n");
}

#[tokio::test]
async fn missing_file_is_created_with_placeholder() {
    let file = MemoryDocumentFile::new();
    let app = app_with(&file).await;

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, textbin_core::document::PLACEHOLDER);
    assert_eq!(
        file.contents().await.as_deref(),
        Some(textbin_core::document::PLACEHOLDER)
    );
}

#[tokio::test]
async fn save_replaces_document_and_reports_bytes() {
    let file = MemoryDocumentFile::with_content("old");
    let app = app_with(&file).await;

    let resp = app
        .clone()
        .oneshot(post("/save", Some(TOKEN), &content_body("héllo")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), Some("héllo".len()));
    assert_eq!(body_json(resp).await["status"], "success");

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(body_string(resp).await, "héllo");
    assert_eq!(file.contents().await.as_deref(), Some("héllo"));
}

#[tokio::test]
async fn repeated_save_reports_no_changes_without_writing() {
    let file = MemoryDocumentFile::with_content("same");
    let app = app_with(&file).await;

    let resp = app
        .oneshot(post("/save", Some(TOKEN), &content_body("same")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), None);
    assert_eq!(body_json(resp).await["status"], "no changes");
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn save_with_empty_content_clears_document() {
    let file = MemoryDocumentFile::with_content("something");
    let app = app_with(&file).await;

    let resp = app
        .clone()
        .oneshot(post("/save", Some(TOKEN), &content_body("")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), Some(0));

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn append_concatenates_without_separator() {
    let file = MemoryDocumentFile::with_content("abc");
    let app = app_with(&file).await;

    let resp = app
        .clone()
        .oneshot(post("/append", Some(TOKEN), &content_body("def")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), Some(3));
    assert_eq!(body_json(resp).await["status"], "success");

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(body_string(resp).await, "abcdef");
    assert_eq!(file.contents().await.as_deref(), Some("abcdef"));
}

#[tokio::test]
async fn empty_append_is_a_no_op() {
    let file = MemoryDocumentFile::with_content("abc");
    let app = app_with(&file).await;

    let resp = app
        .oneshot(post("/append", Some(TOKEN), &content_body("")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), None);
    assert_eq!(body_json(resp).await["status"], "no changes");
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let file = MemoryDocumentFile::with_content("keep");
    let app = app_with(&file).await;

    for path in ["/save", "/append"] {
        let resp = app
            .clone()
            .oneshot(post(path, None, &content_body("nope")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "unauthorized");
        assert!(body["message"].as_str().unwrap().contains("missing credential"));
    }

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(body_string(resp).await, "keep");
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let file = MemoryDocumentFile::with_content("keep");
    let app = app_with(&file).await;

    let resp = app
        .clone()
        .oneshot(post("/save", Some("test-token-but-longer"), &content_body("nope")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("invalid credential"));

    let resp = app
        .clone()
        .oneshot(post("/append", Some(""), &content_body("nope")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(body_string(resp).await, "keep");
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let file = MemoryDocumentFile::with_content("keep");
    let app = app_with(&file).await;

    let resp = app
        .oneshot(post("/save", Some(TOKEN), "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].as_str().unwrap().starts_with("error decoding JSON"));
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn missing_content_field_is_bad_request() {
    let file = MemoryDocumentFile::with_content("keep");
    let app = app_with(&file).await;

    let resp = app
        .oneshot(post("/append", Some(TOKEN), r#"{"text": "wrong field"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "missing 'content' field in JSON");
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn null_content_saves_empty_document() {
    let file = MemoryDocumentFile::with_content("something");
    let app = app_with(&file).await;

    let resp = app
        .clone()
        .oneshot(post("/save", Some(TOKEN), r#"{"content": null}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), Some(0));
    assert_eq!(body_json(resp).await["status"], "success");

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(file.contents().await.as_deref(), Some(""));
}

#[tokio::test]
async fn null_content_append_is_a_no_op() {
    let file = MemoryDocumentFile::with_content("keep");
    let app = app_with(&file).await;

    let resp = app
        .oneshot(post("/append", Some(TOKEN), r#"{"content": null}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(bytes_written(&resp), None);
    assert_eq!(body_json(resp).await["status"], "no changes");
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn non_string_content_is_bad_request() {
    let file = MemoryDocumentFile::with_content("keep");
    let app = app_with(&file).await;

    let resp = app
        .oneshot(post("/save", Some(TOKEN), r#"{"content": 42}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("error decoding JSON"));
    assert_eq!(file.write_count(), 0);
}

#[tokio::test]
async fn failed_write_leaves_store_untouched() {
    let file = MemoryDocumentFile::with_content("before");
    let app = app_with(&file).await;
    file.fail_writes(true);

    for path in ["/save", "/append"] {
        let resp = app
            .clone()
            .oneshot(post(path, Some(TOKEN), &content_body("after")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "internal_error");
        assert!(body["message"].as_str().unwrap().starts_with("error writing file"));
    }

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(body_string(resp).await, "before");
}

#[tokio::test]
async fn fetch_and_editor_need_no_token() {
    let file = MemoryDocumentFile::with_content("x");
    let app = app_with(&file).await;

    let resp = app.clone().oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn editor_page_embeds_token_and_escaped_content() {
    let file = MemoryDocumentFile::with_content("<b>bold</b> & more");
    let app = app_with(&file).await;

    let resp = app.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains(r#"data-token="test-token""#));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let file = MemoryDocumentFile::with_content("x");
    let app = app_with(&file).await;

    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(resp.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
}

#[tokio::test]
async fn state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".textbin");

    let open = |path: std::path::PathBuf| async move {
        let document = Document::open(Arc::new(FsDocumentFile::new(path)))
            .await
            .unwrap();
        routes::router(Arc::new(AppState::new(
            document,
            ApiToken::new(TOKEN),
            Theme::Dark,
        )))
    };

    let app = open(path.clone()).await;
    let resp = app
        .clone()
        .oneshot(post("/save", Some(TOKEN), &content_body("first")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app
        .oneshot(post("/append", Some(TOKEN), &content_body("\nsecond")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let app = open(path.clone()).await;
    let resp = app.oneshot(get("/fetch")).await.unwrap();
    assert_eq!(body_string(resp).await, "first\nsecond");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond");
}
