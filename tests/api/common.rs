// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for HTTP-level tests: in-process fake models and
//! request utilities driving the routers with `oneshot`.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use text_inference_services::api::{create_embedding_app, create_summary_app, ModelState};
use text_inference_services::embeddings::{l2_normalize, TextEmbedder};
use text_inference_services::models::{ModelHandle, EMBEDDING_MODEL, SUMMARIZATION_MODEL};
use text_inference_services::summarization::{Summarizer, SummaryLength};
use tower::ServiceExt; // for `oneshot`

pub const TEST_DIMENSION: usize = 384;

/// Deterministic embedder: bytes of the text spread over a unit vector
#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
    pub last_text: Mutex<Option<String>>,
}

#[async_trait]
impl TextEmbedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(text.to_string());

        let mut vector = vec![0.0f32; TEST_DIMENSION];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % TEST_DIMENSION] += byte as f32;
        }
        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        TEST_DIMENSION
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        anyhow::bail!("session run failed: /secret/path/model.onnx")
    }

    fn dimension(&self) -> usize {
        TEST_DIMENSION
    }
}

/// Summarizer returning the first `max_tokens` words of the input
#[derive(Default)]
pub struct FakeSummarizer {
    pub calls: AtomicUsize,
    pub last_call: Mutex<Option<(String, SummaryLength)>>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((text.to_string(), length));

        Ok(text
            .split_whitespace()
            .take(length.max_tokens)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _text: &str, _length: SummaryLength) -> Result<String> {
        anyhow::bail!("decoder output had unexpected shape")
    }
}

pub fn embedding_app(model: Option<Arc<dyn TextEmbedder>>) -> Router {
    let handle = match model {
        Some(model) => ModelHandle::loaded(model),
        None => ModelHandle::empty(),
    };
    create_embedding_app(ModelState::new(handle, EMBEDDING_MODEL.model_id))
}

pub fn summary_app(model: Option<Arc<dyn Summarizer>>) -> Router {
    let handle = match model {
        Some(model) => ModelHandle::loaded(model),
        None => ModelHandle::empty(),
    };
    create_summary_app(ModelState::new(handle, SUMMARIZATION_MODEL.model_id))
}

/// Sends a raw POST body with a JSON content type
pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Response body is parsed as JSON; non-JSON bodies (framework rejections) become `Null`
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
