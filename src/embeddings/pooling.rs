// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence pooling and normalization over token-level hidden states

use anyhow::{Context, Result};
use ndarray::ArrayView2;
use serde::Deserialize;
use std::path::Path;

/// How token embeddings are reduced to one sentence embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pooling {
    /// Hidden state of the first ([CLS]) token
    Cls,
    /// Attention-mask weighted mean over all tokens
    Mean,
}

/// sentence-transformers `1_Pooling/config.json`
#[derive(Debug, Clone, Default, Deserialize)]
struct PoolingConfig {
    #[serde(default)]
    pooling_mode_cls_token: bool,
    #[serde(default)]
    pooling_mode_mean_tokens: bool,
}

impl Pooling {
    /// Reads the pooling mode from a sentence-transformers pooling config
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pooling config {}", path.display()))?;
        Self::from_config_str(&raw)
    }

    pub fn from_config_str(raw: &str) -> Result<Self> {
        let config: PoolingConfig =
            serde_json::from_str(raw).context("Invalid pooling config JSON")?;
        if config.pooling_mode_cls_token {
            Ok(Pooling::Cls)
        } else if config.pooling_mode_mean_tokens {
            Ok(Pooling::Mean)
        } else {
            anyhow::bail!("Pooling config enables neither CLS nor mean pooling")
        }
    }

    /// Pools `[seq_len, hidden_dim]` hidden states into `[hidden_dim]`
    pub fn apply(self, hidden: ArrayView2<f32>, attention_mask: &[i64]) -> Vec<f32> {
        match self {
            Pooling::Cls => cls_pool(hidden),
            Pooling::Mean => mean_pool(hidden, attention_mask),
        }
    }
}

pub fn cls_pool(hidden: ArrayView2<f32>) -> Vec<f32> {
    if hidden.nrows() == 0 {
        return vec![0.0; hidden.ncols()];
    }
    hidden.row(0).to_vec()
}

/// Mean over sequence positions, weighted by the attention mask so padding is ignored
pub fn mean_pool(hidden: ArrayView2<f32>, attention_mask: &[i64]) -> Vec<f32> {
    let (seq_len, hidden_dim) = hidden.dim();
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for i in 0..seq_len {
        let mask_value = attention_mask.get(i).copied().unwrap_or(0) as f32;
        sum_mask += mask_value;
        for (j, value) in pooled.iter_mut().enumerate() {
            *value += hidden[[i, j]] * mask_value;
        }
    }

    for value in &mut pooled {
        *value /= sum_mask.max(1e-9);
    }

    pooled
}

/// Scales the vector to unit Euclidean length; a zero vector is left as is
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
