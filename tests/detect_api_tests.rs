// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// tests/detect_api_tests.rs - HTTP contract tests for the detection service
//
// These drive the real router without binding a socket. The model file is
// absent in CI, so the suite exercises the degraded-service contract; the
// loaded-model path is covered by the vision unit tests.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use fabstir_vision_node::api::{build_router, AppState};
use fabstir_vision_node::vision::{DetectionModelManager, DetectorConfig};

const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const BOUNDARY: &str = "------------------------fabstirvisiontest";

async fn test_router() -> axum::Router {
    // Path does not exist: manager comes up with no model, which is the
    // permanent degraded state the service contract covers
    let manager = DetectionModelManager::new(DetectorConfig {
        model_path: "./does-not-exist/general.onnx".to_string(),
    })
    .await
    .unwrap();

    build_router(AppState {
        model_manager: Arc::new(manager),
    })
}

/// Build a multipart/form-data body with a single file field
fn multipart_body(field_name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn detect_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/detect")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_model_not_loaded() {
    let router = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body,
        json!({"status": "model_not_loaded", "model_loaded": false})
    );
}

#[tokio::test]
async fn test_detect_without_model_returns_model_not_loaded() {
    let router = test_router().await;
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();

    let response = router
        .oneshot(detect_request(multipart_body(
            "file", "main.png", "image/png", &png,
        )))
        .await
        .unwrap();

    // Failures still answer 200; the error rides the body
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, json!({"error": "Model not loaded", "count": 0}));
}

#[tokio::test]
async fn test_model_check_wins_over_bad_content_type() {
    // With the model unavailable, even a disallowed upload reports the
    // model error - no decode is attempted
    let router = test_router().await;

    let response = router
        .oneshot(detect_request(multipart_body(
            "file",
            "clip.gif",
            "image/gif",
            &[0x47, 0x49, 0x46],
        )))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(body["error"], "Model not loaded");
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_detect_without_file_part_returns_empty_file() {
    let router = test_router().await;

    // A text field only, no file part
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"comment\"\r\n\r\nhello\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let response = router.oneshot(detect_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, json!({"error": "Empty file", "count": 0}));
}

#[tokio::test]
async fn test_multi_megabyte_upload_reaches_pipeline() {
    // Mobile-camera JPEGs routinely run 2-5 MB; the router must accept
    // bodies up to the decoder's 10 MB guard, not axum's 2 MB default.
    // With the model unloaded the pipeline answer is the model error,
    // proving the body made it past the transport layer.
    let router = test_router().await;
    let payload = vec![0u8; 3 * 1024 * 1024];

    let response = router
        .oneshot(detect_request(multipart_body(
            "file",
            "main.jpg",
            "image/jpeg",
            &payload,
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, json!({"error": "Model not loaded", "count": 0}));
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    // Past the 10 MB maximum the transport cuts the body off and the
    // failure rides the generic processing arm of the contract
    let router = test_router().await;
    let payload = vec![0u8; 11 * 1024 * 1024];

    let response = router
        .oneshot(detect_request(multipart_body(
            "file",
            "main.jpg",
            "image/jpeg",
            &payload,
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["count"], 0);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Processing error:"));
}

#[tokio::test]
async fn test_failure_body_has_no_success_keys() {
    let router = test_router().await;
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();

    let response = router
        .oneshot(detect_request(multipart_body(
            "file", "main.png", "image/png", &png,
        )))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert!(body.get("success").is_none());
    assert!(body.get("detections").is_none());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let router = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/detect")
                .header(header::ORIGIN, "https://app.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
    let allowed_methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .map(|v| v.to_str().unwrap())
        .unwrap_or_default();
    assert!(allowed_methods.contains("POST"));
    assert!(!allowed_methods.contains("DELETE"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detect_response_roundtrip() {
    // The mobile client deserializes the body with these exact keys
    let router = test_router().await;
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();

    let response = router
        .oneshot(detect_request(multipart_body(
            "file", "main.jpg", "image/jpeg", &png,
        )))
        .await
        .unwrap();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: fabstir_vision_node::api::DetectResponse =
        serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed.count, 0);
    assert!(parsed.error.is_some());
}
