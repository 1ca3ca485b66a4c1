// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX seq2seq summarization model (distilbart-cnn-12-6)
//!
//! Combines encoder, decoder and tokenizer into the summarization pipeline:
//! 1. Tokenize the input (truncated to the model's position limit)
//! 2. Encode once
//! 3. Greedy-decode under the BART generation constraints
//! 4. Detokenize, skipping special tokens

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::decoder::BartDecoder;
use super::encoder::BartEncoder;
use super::generation::{greedy_search, GenerationConfig};
use super::{SummaryLength, Summarizer};
use crate::inference::SessionOptions;

/// Paths to the artifacts of one summarization model
#[derive(Debug, Clone, Copy)]
pub struct SummarizationModelPaths<'a> {
    pub encoder: &'a Path,
    pub decoder: &'a Path,
    pub tokenizer: &'a Path,
    pub config: &'a Path,
}

#[derive(Clone)]
pub struct OnnxSummarizationModel {
    encoder: BartEncoder,
    decoder: BartDecoder,
    tokenizer: Arc<Tokenizer>,
    config: GenerationConfig,
    model_name: String,
}

impl std::fmt::Debug for OnnxSummarizationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSummarizationModel")
            .field("model_name", &self.model_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OnnxSummarizationModel {
    /// Loads tokenizer, generation config and both ONNX graphs
    ///
    /// Loading is blocking work; call it from a blocking context.
    pub fn new(
        model_name: impl Into<String>,
        paths: SummarizationModelPaths<'_>,
        options: &SessionOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();
        info!("Initializing ONNX summarization model {}", model_name);

        let config = GenerationConfig::from_file(paths.config)?;
        debug!("Generation config: {:?}", config);

        if !paths.tokenizer.exists() {
            anyhow::bail!("Tokenizer file not found: {}", paths.tokenizer.display());
        }
        let mut tokenizer = Tokenizer::from_file(paths.tokenizer)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let encoder = BartEncoder::new(paths.encoder, options)?;
        let decoder = BartDecoder::new(paths.decoder, options)?;

        info!(
            "ONNX summarization model loaded: {} (vocab {})",
            model_name,
            tokenizer.get_vocab_size(true)
        );

        Ok(Self {
            encoder,
            decoder,
            tokenizer: Arc::new(tokenizer),
            config,
            model_name,
        })
    }

    /// Summarizes `text` (blocking)
    pub fn summarize_blocking(&self, text: &str, length: SummaryLength) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        debug!("Summarizing {} input tokens", input_ids.len());

        let encoded = self.encoder.encode(&input_ids, &attention_mask)?;

        let length = SummaryLength {
            min_tokens: length.min_tokens,
            max_tokens: length.max_tokens.min(self.config.max_position_embeddings),
        };
        let tokens = greedy_search(
            |sequence| self.decoder.forward(&encoded, sequence),
            length,
            &self.config,
        )?;
        debug!("Generated {} decoder tokens", tokens.len());

        let summary = self
            .tokenizer
            .decode(&tokens, true)
            .map_err(|e| anyhow::anyhow!("Failed to decode tokens: {}", e))?;

        Ok(summary.trim().to_string())
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.config
    }
}

#[async_trait]
impl Summarizer for OnnxSummarizationModel {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        let model = self.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || model.summarize_blocking(&text, length))
            .await
            .context("Summarization task panicked")?
    }
}
