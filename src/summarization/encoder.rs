// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BART encoder
//!
//! Runs the encoder half of the seq2seq model once per request, producing
//! the hidden states every decoder step attends to.

use anyhow::{Context, Result};
use ndarray::{Array2, Array3, Ix3};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::inference::{build_session, SessionOptions};

/// Encoder output for a single input sequence
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// `[1, seq_len, d_model]`
    pub hidden_states: Array3<f32>,
    /// `[1, seq_len]`
    pub attention_mask: Array2<i64>,
}

#[derive(Clone)]
pub struct BartEncoder {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for BartEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BartEncoder").finish_non_exhaustive()
    }
}

impl BartEncoder {
    /// Load the encoder graph (`encoder_model.onnx`)
    pub fn new(model_path: &Path, options: &SessionOptions) -> Result<Self> {
        info!("Loading BART encoder from {}", model_path.display());
        let session = build_session(model_path, options)?;
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Encode one tokenized input
    ///
    /// # Arguments
    /// - `input_ids`: token ids including BOS/EOS
    /// - `attention_mask`: 1 for every real token
    pub fn encode(&self, input_ids: &[i64], attention_mask: &[i64]) -> Result<EncoderOutput> {
        if input_ids.is_empty() {
            anyhow::bail!("Encoder input is empty");
        }
        if input_ids.len() != attention_mask.len() {
            anyhow::bail!(
                "input_ids ({}) and attention_mask ({}) differ in length",
                input_ids.len(),
                attention_mask.len()
            );
        }

        let seq_len = input_ids.len();
        let ids = Array2::from_shape_vec((1, seq_len), input_ids.to_vec())
            .context("Failed to create input_ids array")?;
        let mask = Array2::from_shape_vec((1, seq_len), attention_mask.to_vec())
            .context("Failed to create attention_mask array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Encoder session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => Value::from_array(ids).context("Failed to create input_ids tensor")?,
                "attention_mask" => Value::from_array(mask.clone()).context("Failed to create attention_mask tensor")?
            ])
            .context("Encoder inference failed")?;

        // last_hidden_state
        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract encoder output tensor")?;
        debug!("Encoder output shape: {:?}", output_tensor.shape());

        let hidden_states = output_tensor
            .to_owned()
            .into_dimensionality::<Ix3>()
            .context("Encoder output is not [batch, seq_len, d_model]")?;

        Ok(EncoderOutput {
            hidden_states,
            attention_mask: mask,
        })
    }
}
