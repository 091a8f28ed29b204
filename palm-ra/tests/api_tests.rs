//! HTTP API tests for palm-ra
//!
//! Requests go through the full router with `oneshot`, no listener needed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use http_body_util::BodyExt;
use palm_common::generate;
use palm_ra::services::StageSchedule;
use palm_ra::store::{MemoryStore, SharedStore};
use palm_ra::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

const BOUNDARY: &str = "palm-test-boundary";

/// Minimal PNG signature plus a few bytes; content is never decoded
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRpalm";

fn setup_app(schedule: StageSchedule) -> Router {
    let store: SharedStore = Arc::new(MemoryStore::new());
    build_router(AppState::new(store, schedule))
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"hand.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn upload(app: &Router, data: &[u8]) -> String {
    let (status, body) = send(app, upload_request(multipart_body("palm", "image/png", data))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["id"].as_str().expect("id in upload response").to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(StageSchedule::immediate());
    let (status, body) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "palm-ra");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_upload_returns_id_and_processing_record() {
    // nominal schedule keeps the record in processing for the whole test
    let app = setup_app(StageSchedule::default());
    let id = upload(&app, PNG_BYTES).await;
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let (status, body) = send(&app, get_request(&format!("/api/analysis/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["status"], "processing");
    assert_eq!(body["progress"], 0);
    assert!(body["result"].is_null());
}

#[tokio::test]
async fn test_status_response_uses_camel_case_and_hides_fingerprint() {
    let app = setup_app(StageSchedule::default());
    let id = upload(&app, PNG_BYTES).await;

    let (_, body) = send(&app, get_request(&format!("/api/analysis/{}", id))).await;
    let object = body.as_object().unwrap();

    assert!(object.contains_key("createdAt"));
    assert!(object.contains_key("updatedAt"));
    assert!(!object.contains_key("created_at"));
    assert!(!object.contains_key("contentFingerprint"));
    assert!(!object.contains_key("imageData"));
    assert!(!body.to_string().contains(&BASE64_STANDARD.encode(PNG_BYTES)));
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let app = setup_app(StageSchedule::immediate());
    let request = upload_request(multipart_body("palm", "text/plain", b"not a palm"));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Only image files are allowed");
}

#[tokio::test]
async fn test_upload_without_palm_field() {
    let app = setup_app(StageSchedule::immediate());
    let request = upload_request(multipart_body("photo", "image/png", PNG_BYTES));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_over_limit() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let state = AppState::new(store, StageSchedule::immediate()).with_max_upload_bytes(16);
    let app = build_router(state);

    let request = upload_request(multipart_body("palm", "image/png", &[0u8; 64]));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_at_limit_is_accepted() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let state = AppState::new(store, StageSchedule::immediate()).with_max_upload_bytes(16);
    let app = build_router(state);

    upload(&app, &[7u8; 16]).await;
}

#[tokio::test]
async fn test_get_unknown_analysis() {
    let app = setup_app(StageSchedule::immediate());
    let uri = format!("/api/analysis/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, get_request(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_malformed_id_is_not_found() {
    let app = setup_app(StageSchedule::immediate());
    let (status, _) = send(&app, get_request("/api/analysis/not-a-uuid")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_then_poll_until_completed() {
    let app = setup_app(StageSchedule::scaled(0.01));
    let id = upload(&app, PNG_BYTES).await;
    let uri = format!("/api/analysis/{}", id);

    let started = Instant::now();
    let mut last_progress = 0;
    let body = loop {
        let (status, body) = send(&app, get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);

        let progress = body["progress"].as_u64().unwrap();
        assert!(progress >= last_progress, "progress went backwards");
        last_progress = progress;

        if body["status"] != "processing" {
            break body;
        }
        assert!(started.elapsed() < Duration::from_secs(5), "analysis never finished");
        tokio::time::sleep(Duration::from_millis(5)).await;
    };

    assert_eq!(body["status"], "completed");
    assert_eq!(body["progress"], 100);

    let expected = serde_json::to_value(generate(&BASE64_STANDARD.encode(PNG_BYTES))).unwrap();
    assert_eq!(body["result"], expected);
    assert!(body["result"]["life_line"]["strength"].is_string());
}

#[tokio::test]
async fn test_identical_uploads_get_identical_readings() {
    let app = setup_app(StageSchedule::immediate());
    let first = upload(&app, PNG_BYTES).await;
    let second = upload(&app, PNG_BYTES).await;
    assert_ne!(first, second);

    let mut results = Vec::new();
    for id in [&first, &second] {
        let uri = format!("/api/analysis/{}", id);
        let started = Instant::now();
        loop {
            let (_, body) = send(&app, get_request(&uri)).await;
            if body["status"] == "completed" {
                results.push(body["result"].clone());
                break;
            }
            assert!(started.elapsed() < Duration::from_secs(5));
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    assert_eq!(results[0], results[1]);
}
