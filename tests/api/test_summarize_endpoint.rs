// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /summarize over HTTP

use super::common::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use text_inference_services::summarization::SummaryLength;

#[tokio::test]
async fn test_summarize_success() {
    let model = Arc::new(FakeSummarizer::default());
    let app = summary_app(Some(model.clone()));

    let (status, body) = post_json(
        app,
        "/summarize",
        json!({ "text": "one two three four five six", "max_tokens": 3, "min_tokens": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "one two three" }));
}

#[tokio::test]
async fn test_defaults_and_trimming() {
    let model = Arc::new(FakeSummarizer::default());
    let app = summary_app(Some(model.clone()));

    let (status, _) = post_json(app, "/summarize", json!({ "text": "  an article \n" })).await;

    assert_eq!(status, StatusCode::OK);
    let (text, length) = model.last_call.lock().unwrap().clone().unwrap();
    assert_eq!(text, "an article");
    assert_eq!(
        length,
        SummaryLength {
            min_tokens: 32,
            max_tokens: 128
        }
    );
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let model = Arc::new(FakeSummarizer::default());
    let body = json!({ "text": "The quick brown fox jumps over the lazy dog", "max_tokens": 5, "min_tokens": 0 });

    let (_, first) = post_json(summary_app(Some(model.clone())), "/summarize", body.clone()).await;
    let (_, second) = post_json(summary_app(Some(model.clone())), "/summarize", body).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let model = Arc::new(FakeSummarizer::default());

    let (status, body) = post_json(
        summary_app(Some(model.clone())),
        "/summarize",
        json!({ "text": "   " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Empty text");
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_text_length_boundary() {
    let model = Arc::new(FakeSummarizer::default());

    let (status, _) = post_json(
        summary_app(Some(model.clone())),
        "/summarize",
        json!({ "text": "a".repeat(20_000) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        summary_app(Some(model.clone())),
        "/summarize",
        json!({ "text": "a".repeat(20_001) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Text too long");
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_token_bounds_rejected() {
    let cases = [
        (json!({ "text": "abc", "max_tokens": 0 }), "max_tokens"),
        (json!({ "text": "abc", "max_tokens": 2048 }), "max_tokens"),
        (json!({ "text": "abc", "min_tokens": -5 }), "min_tokens"),
        (json!({ "text": "abc", "max_tokens": 10, "min_tokens": 20 }), "min_tokens"),
    ];

    for (body, field) in cases {
        let (status, response) =
            post_json(summary_app(Some(Arc::new(FakeSummarizer::default()))), "/summarize", body)
                .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error_type"], "validation_error");
        assert_eq!(response["details"]["field"], field);
    }
}

#[tokio::test]
async fn test_model_not_loaded_returns_503_before_validation() {
    let (status, body) = post_json(summary_app(None), "/summarize", json!({ "text": "" })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Model not loaded");
}

#[tokio::test]
async fn test_model_failure_returns_generic_500() {
    let (status, body) = post_json(
        summary_app(Some(Arc::new(FailingSummarizer))),
        "/summarize",
        json!({ "text": "something to summarize" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Internal server error while generating summary."
    );
}

#[tokio::test]
async fn test_missing_text_rejected() {
    let (status, _) = post_json(
        summary_app(Some(Arc::new(FakeSummarizer::default()))),
        "/summarize",
        json!({ "max_tokens": 50 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = summary_app(Some(Arc::new(FakeSummarizer::default())));
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .header("origin", "http://search.example")
        .body(Body::from(r#"{"text": "hello world"}"#))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_method_and_header() {
    let app = summary_app(Some(Arc::new(FakeSummarizer::default())));
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/summarize")
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
