// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BART decoder
//!
//! Each step re-runs the full decoder sequence (no past key/values) and
//! returns the logits of the last position.

use anyhow::{Context, Result};
use ndarray::{Array2, Axis};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::encoder::EncoderOutput;
use crate::inference::{build_session, SessionOptions};

#[derive(Clone)]
pub struct BartDecoder {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for BartDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BartDecoder").finish_non_exhaustive()
    }
}

impl BartDecoder {
    /// Load the decoder graph (`decoder_model.onnx`)
    pub fn new(model_path: &Path, options: &SessionOptions) -> Result<Self> {
        info!("Loading BART decoder from {}", model_path.display());
        let session = build_session(model_path, options)?;
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Run a single forward pass and return next-token logits `[vocab_size]`
    pub fn forward(&self, encoder: &EncoderOutput, decoder_input_ids: &[u32]) -> Result<Vec<f32>> {
        if decoder_input_ids.is_empty() {
            anyhow::bail!("Decoder input is empty");
        }

        let dec_len = decoder_input_ids.len();
        let ids: Vec<i64> = decoder_input_ids.iter().map(|&id| id as i64).collect();
        let ids = Array2::from_shape_vec((1, dec_len), ids)
            .context("Failed to create decoder input_ids array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Decoder session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => Value::from_array(ids)
                    .context("Failed to create decoder input_ids tensor")?,
                "encoder_attention_mask" => Value::from_array(encoder.attention_mask.clone())
                    .context("Failed to create encoder attention mask tensor")?,
                "encoder_hidden_states" => Value::from_array(encoder.hidden_states.clone())
                    .context("Failed to create encoder hidden states tensor")?
            ])
            .context("Decoder inference failed")?;

        // logits [batch, dec_len, vocab_size]
        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract logits tensor")?;

        let shape = output_tensor.shape();
        if shape.len() != 3 || shape[1] == 0 {
            anyhow::bail!(
                "Unexpected decoder output shape: {:?} (expected [batch, seq_len, vocab])",
                shape
            );
        }
        debug!("Decoder output shape: {:?}", shape);

        let last_pos = shape[1] - 1;
        let logits = output_tensor
            .index_axis(Axis(0), 0)
            .index_axis(Axis(0), last_pos)
            .iter()
            .copied()
            .collect::<Vec<f32>>();

        Ok(logits)
    }
}
