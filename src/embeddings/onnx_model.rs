// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! BERT-style sentence embedding models such as bge-small-en-v1.5.
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Tokenization with truncation to the model's maximum sequence length
//! - CLS or mean pooling, chosen from the sentence-transformers config
//! - L2 normalization so every vector has unit length

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis, Ix2};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::pooling::{l2_normalize, Pooling};
use super::TextEmbedder;
use crate::inference::{build_session, has_input, SessionOptions};

/// Maximum sequence length accepted by BERT-base position embeddings
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// ONNX-based sentence embedding model
///
/// # Model Details
/// - Input: text (truncated to `max_length` tokens)
/// - Output: `dimension`-sized f32 vector with unit L2 norm
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning and thread-safe sharing.
/// The session sits behind a Mutex because a run needs exclusive access.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    /// Hidden size reported by the graph during load-time validation
    dimension: usize,
    max_length: usize,
    pooling: Pooling,
    /// bge graphs take token_type_ids, some exports drop the input
    uses_token_type_ids: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("pooling", &self.pooling)
            .finish_non_exhaustive()
    }
}

/// Tensors for one tokenized text
struct EncodedInput {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
    mask: Vec<i64>,
}

impl OnnxEmbeddingModel {
    /// Creates a new ONNX embedding model from disk paths
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The validation inference does not produce `[batch, seq_len, hidden]`
    /// - `hidden` differs from `expected_dimension`
    ///
    /// Loading is blocking work; call it from a blocking context.
    pub fn new(
        model_name: impl Into<String>,
        model_path: &Path,
        tokenizer_path: &Path,
        pooling: Pooling,
        expected_dimension: usize,
        options: &SessionOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();

        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Initializing ONNX embedding model {}", model_name);
        let session = build_session(model_path, options)?;
        let uses_token_type_ids = has_input(&session, "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: DEFAULT_MAX_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let mut model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: expected_dimension,
            max_length: DEFAULT_MAX_LENGTH,
            pooling,
            uses_token_type_ids,
        };

        // Validate the output shape with a test inference
        let hidden_dim = model.validate("validation test")?;
        if hidden_dim != expected_dimension {
            anyhow::bail!(
                "Model {} outputs {} dimensions (expected {})",
                model.model_name,
                hidden_dim,
                expected_dimension
            );
        }
        model.dimension = hidden_dim;

        info!(
            "ONNX embedding model loaded: {} ({} dimensions, {:?} pooling)",
            model.model_name, model.dimension, model.pooling
        );
        Ok(model)
    }

    fn encode_input(&self, text: &str) -> Result<EncodedInput> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = input_ids.len();

        Ok(EncodedInput {
            input_ids: Array2::from_shape_vec((1, seq_len), input_ids)
                .context("Failed to create input_ids array")?,
            attention_mask: Array2::from_shape_vec((1, seq_len), mask.clone())
                .context("Failed to create attention_mask array")?,
            token_type_ids: Array2::zeros((1, seq_len)),
            mask,
        })
    }

    /// Runs the graph and pools the first batch item into a sentence vector
    fn forward(&self, input: EncodedInput) -> Result<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Embedding session lock poisoned"))?;

        let outputs = if self.uses_token_type_ids {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input.input_ids)?,
                "attention_mask" => Value::from_array(input.attention_mask)?,
                "token_type_ids" => Value::from_array(input.token_type_ids)?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input.input_ids)?,
                "attention_mask" => Value::from_array(input.attention_mask)?
            ])?
        };

        // Use index [0] since exports name the hidden-state output differently
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        if output.ndim() != 3 {
            anyhow::bail!(
                "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden])",
                output.shape()
            );
        }

        let hidden = output
            .index_axis(Axis(0), 0)
            .into_dimensionality::<Ix2>()
            .context("Failed to view hidden states as [seq_len, hidden]")?;

        Ok(self.pooling.apply(hidden, &input.mask))
    }

    fn validate(&self, text: &str) -> Result<usize> {
        let input = self
            .encode_input(text)
            .context("Tokenizer validation failed")?;
        let pooled = self.forward(input).context("Validation inference failed")?;
        debug!("Validation inference produced {} dimensions", pooled.len());
        Ok(pooled.len())
    }

    /// Generates a normalized embedding for a single text (blocking)
    ///
    /// 1. Tokenize (truncating to `max_length`)
    /// 2. Run ONNX inference
    /// 3. Pool token states into one vector
    /// 4. L2-normalize
    pub fn embed_blocking(&self, text: &str) -> Result<Vec<f32>> {
        let input = self.encode_input(text)?;
        let mut embedding = self.forward(input)?;

        if embedding.len() != self.dimension {
            anyhow::bail!(
                "Unexpected embedding dimension: {} (expected {})",
                embedding.len(),
                self.dimension
            );
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    /// Counts tokens in a text string, including special tokens
    pub fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        Ok(encoding.get_attention_mask().iter().map(|&m| m as usize).sum())
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn pooling(&self) -> Pooling {
        self.pooling
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || model.embed_blocking(&text))
            .await
            .context("Embedding task panicked")?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
