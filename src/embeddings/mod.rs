// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embeddings
//!
//! [`TextEmbedder`] is the seam between the HTTP layer and the model runtime;
//! [`OnnxEmbeddingModel`] is the ONNX Runtime implementation used in production.

pub mod onnx_model;
pub mod pooling;

pub use onnx_model::OnnxEmbeddingModel;
pub use pooling::{l2_normalize, Pooling};

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::inference::SessionOptions;
use crate::models::{
    ModelDownloader, EMBEDDING_DIMENSION, EMBEDDING_MODEL, EMBEDDING_ONNX_FILE,
    POOLING_CONFIG_FILE, TOKENIZER_FILE,
};

/// Turns text into a fixed-length, L2-normalized vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}

/// Fetches and loads BAAI/bge-small-en-v1.5
///
/// Pooling follows the model's sentence-transformers config; CLS pooling is
/// used when that config is missing or unreadable.
pub async fn load_embedding_model(
    downloader: &ModelDownloader,
    options: SessionOptions,
) -> Result<Arc<dyn TextEmbedder>> {
    info!("Loading embedding model '{}'...", EMBEDDING_MODEL.model_id);

    let files = downloader
        .fetch(&EMBEDDING_MODEL)
        .await
        .with_context(|| format!("Failed to fetch {}", EMBEDDING_MODEL.model_id))?;

    let model_path = files.path(EMBEDDING_ONNX_FILE)?.to_path_buf();
    let tokenizer_path = files.path(TOKENIZER_FILE)?.to_path_buf();
    let pooling = match files.optional(POOLING_CONFIG_FILE) {
        Some(path) => Pooling::from_config_file(path).unwrap_or_else(|e| {
            warn!("Ignoring pooling config: {:#}", e);
            Pooling::Cls
        }),
        None => Pooling::Cls,
    };

    let model = tokio::task::spawn_blocking(move || {
        OnnxEmbeddingModel::new(
            EMBEDDING_MODEL.model_id,
            &model_path,
            &tokenizer_path,
            pooling,
            EMBEDDING_DIMENSION,
            &options,
        )
    })
    .await
    .context("Embedding model load task panicked")??;

    info!("Model loaded.");
    Ok(Arc::new(model))
}
