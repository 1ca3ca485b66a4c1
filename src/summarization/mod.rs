// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Abstractive summarization
//!
//! [`Summarizer`] is what the HTTP layer depends on;
//! [`OnnxSummarizationModel`] runs distilbart-cnn-12-6 through ONNX Runtime.

pub mod decoder;
pub mod encoder;
pub mod generation;
pub mod model;

pub use decoder::BartDecoder;
pub use encoder::{BartEncoder, EncoderOutput};
pub use generation::GenerationConfig;
pub use model::{OnnxSummarizationModel, SummarizationModelPaths};

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::inference::SessionOptions;
use crate::models::{
    ModelDownloader, DECODER_ONNX_FILE, ENCODER_ONNX_FILE, MODEL_CONFIG_FILE,
    SUMMARIZATION_MODEL, TOKENIZER_FILE,
};

/// Length bounds of a generated summary, in decoder tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLength {
    pub min_tokens: usize,
    pub max_tokens: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Deterministic summary of `text` within `length`
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String>;
}

/// Fetches and loads sshleifer/distilbart-cnn-12-6
pub async fn load_summarization_model(
    downloader: &ModelDownloader,
    options: SessionOptions,
) -> Result<Arc<dyn Summarizer>> {
    info!("Loading summarization model '{}'...", SUMMARIZATION_MODEL.model_id);

    let files = downloader
        .fetch(&SUMMARIZATION_MODEL)
        .await
        .with_context(|| format!("Failed to fetch {}", SUMMARIZATION_MODEL.model_id))?;

    let encoder = files.path(ENCODER_ONNX_FILE)?.to_path_buf();
    let decoder = files.path(DECODER_ONNX_FILE)?.to_path_buf();
    let tokenizer = files.path(TOKENIZER_FILE)?.to_path_buf();
    let config = files.path(MODEL_CONFIG_FILE)?.to_path_buf();

    let model = tokio::task::spawn_blocking(move || {
        OnnxSummarizationModel::new(
            SUMMARIZATION_MODEL.model_id,
            SummarizationModelPaths {
                encoder: &encoder,
                decoder: &decoder,
                tokenizer: &tokenizer,
                config: &config,
            },
            &options,
        )
    })
    .await
    .context("Summarization model load task panicked")??;

    info!("Model loaded successfully.");
    Ok(Arc::new(model))
}
