// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed over HTTP
//!
//! Covers the success path, request validation, the not-loaded state,
//! model failures and framework-level JSON rejections.

use super::common::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_embed_returns_unit_vector() {
    let app = embedding_app(Some(Arc::new(FakeEmbedder::default())));

    let (status, body) = post_json(app, "/embed", json!({ "text": "Hello world" })).await;

    assert_eq!(status, StatusCode::OK);
    let embedding: Vec<f32> = serde_json::from_value(body["embedding"].clone()).unwrap();
    assert_eq!(embedding.len(), TEST_DIMENSION);
    let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "norm was {}", norm);
}

#[tokio::test]
async fn test_embed_is_deterministic() {
    let model = Arc::new(FakeEmbedder::default());

    let (_, first) = post_json(
        embedding_app(Some(model.clone())),
        "/embed",
        json!({ "text": "same input" }),
    )
    .await;
    let (_, second) = post_json(
        embedding_app(Some(model.clone())),
        "/embed",
        json!({ "text": "same input" }),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_embed_passes_text_unchanged() {
    let model = Arc::new(FakeEmbedder::default());
    let app = embedding_app(Some(model.clone()));

    let (status, _) = post_json(app, "/embed", json!({ "text": "  spaced\n out  " })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        model.last_text.lock().unwrap().as_deref(),
        Some("  spaced\n out  ")
    );
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let model = Arc::new(FakeEmbedder::default());

    for text in ["", "   ", "\n\t"] {
        let app = embedding_app(Some(model.clone()));
        let (status, body) = post_json(app, "/embed", json!({ "text": text })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "text {:?}", text);
        assert_eq!(body["error_type"], "validation_error");
        assert_eq!(body["message"], "Field 'text' must be a non-empty string.");
        assert_eq!(body["details"]["field"], "text");
    }

    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_model_not_loaded_returns_503() {
    let app = embedding_app(None);

    let (status, body) = post_json(app, "/embed", json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_type"], "service_unavailable");
    assert_eq!(body["message"], "Model not loaded yet.");
}

#[tokio::test]
async fn test_validation_precedes_model_check() {
    let app = embedding_app(None);

    let (status, _) = post_json(app, "/embed", json!({ "text": " " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_model_failure_returns_generic_500() {
    let app = embedding_app(Some(Arc::new(FailingEmbedder)));

    let (status, body) = post_json(app, "/embed", json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], "internal_error");
    assert_eq!(
        body["message"],
        "Internal server error while generating embedding."
    );
    assert!(!body.to_string().contains("/secret/path"));
}

#[tokio::test]
async fn test_malformed_json_rejected_before_handler() {
    let model = Arc::new(FakeEmbedder::default());
    let app = embedding_app(Some(model.clone()));

    let (status, _) = post_raw(app, "/embed", "{\"text\": ").await;

    assert!(status.is_client_error(), "got {}", status);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_text_field_rejected() {
    let model = Arc::new(FakeEmbedder::default());
    let app = embedding_app(Some(model.clone()));

    let (status, _) = post_json(app, "/embed", json!({ "content": "hello" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let app = embedding_app(Some(Arc::new(FakeEmbedder::default())));
    let request = Request::builder()
        .method("POST")
        .uri("/embed")
        .body(Body::from(r#"{"text": "hello"}"#))
        .unwrap();

    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_long_text_is_accepted() {
    let app = embedding_app(Some(Arc::new(FakeEmbedder::default())));
    let text = "word ".repeat(10_000);

    let (status, _) = post_json(app, "/embed", json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = embedding_app(Some(Arc::new(FakeEmbedder::default())));
    let request = Request::builder()
        .method("POST")
        .uri("/embed")
        .header("content-type", "application/json")
        .header("origin", "http://search.example")
        .body(Body::from(r#"{"text": "hello"}"#))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_any_method_and_header() {
    let app = embedding_app(Some(Arc::new(FakeEmbedder::default())));
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/embed")
        .header("origin", "http://search.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "*");
    assert_eq!(headers["access-control-allow-headers"], "*");
}
