// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::embed::embed_handler;
use super::handlers::health_handler;
use super::summarize::summarize_handler;
use crate::embeddings::TextEmbedder;
use crate::models::ModelHandle;
use crate::summarization::Summarizer;

/// Router state: the service's model slot and the identifier it reports
pub struct ModelState<M: ?Sized> {
    pub model: ModelHandle<M>,
    pub model_id: &'static str,
}

impl<M: ?Sized> ModelState<M> {
    pub fn new(model: ModelHandle<M>, model_id: &'static str) -> Self {
        Self { model, model_id }
    }
}

impl<M: ?Sized> Clone for ModelState<M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            model_id: self.model_id,
        }
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Router of the embedding service: `POST /embed`, `GET /health`
pub fn create_embedding_app(state: ModelState<dyn TextEmbedder>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<dyn TextEmbedder>))
        .route("/embed", post(embed_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Router of the summarization service: `POST /summarize`, `GET /health`
pub fn create_summary_app(state: ModelState<dyn Summarizer>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<dyn Summarizer>))
        .route("/summarize", post(summarize_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
