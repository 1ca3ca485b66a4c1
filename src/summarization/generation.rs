// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Greedy sequence generation for BART-style decoders
//!
//! The decoder itself is abstracted as a step function that maps the tokens
//! generated so far to next-token logits, so the search and its constraints
//! can be exercised without a model.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::SummaryLength;

/// Generation-related fields of a BART `config.json`
///
/// Missing keys fall back to the values BART checkpoints ship with. An
/// explicit `null` for a forced token disables forcing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_decoder_start_token_id")]
    pub decoder_start_token_id: u32,
    #[serde(default = "default_bos_token_id")]
    pub bos_token_id: u32,
    #[serde(default = "default_eos_token_id")]
    pub eos_token_id: u32,
    #[serde(default = "default_pad_token_id")]
    pub pad_token_id: u32,
    #[serde(default = "default_forced_bos_token_id")]
    pub forced_bos_token_id: Option<u32>,
    #[serde(default = "default_forced_eos_token_id")]
    pub forced_eos_token_id: Option<u32>,
    #[serde(default = "default_no_repeat_ngram_size")]
    pub no_repeat_ngram_size: usize,
    #[serde(default = "default_max_position_embeddings")]
    pub max_position_embeddings: usize,
}

fn default_decoder_start_token_id() -> u32 {
    2
}

fn default_bos_token_id() -> u32 {
    0
}

fn default_eos_token_id() -> u32 {
    2
}

fn default_pad_token_id() -> u32 {
    1
}

fn default_forced_bos_token_id() -> Option<u32> {
    Some(0)
}

fn default_forced_eos_token_id() -> Option<u32> {
    Some(2)
}

fn default_no_repeat_ngram_size() -> usize {
    3
}

fn default_max_position_embeddings() -> usize {
    1024
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            decoder_start_token_id: default_decoder_start_token_id(),
            bos_token_id: default_bos_token_id(),
            eos_token_id: default_eos_token_id(),
            pad_token_id: default_pad_token_id(),
            forced_bos_token_id: default_forced_bos_token_id(),
            forced_eos_token_id: default_forced_eos_token_id(),
            no_repeat_ngram_size: default_no_repeat_ngram_size(),
            max_position_embeddings: default_max_position_embeddings(),
        }
    }
}

impl GenerationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid model config JSON")
    }
}

/// Bans EOS while the sequence is shorter than `min_length`
pub fn apply_min_length(logits: &mut [f32], cur_len: usize, min_length: usize, eos_token_id: u32) {
    if cur_len < min_length {
        if let Some(score) = logits.get_mut(eos_token_id as usize) {
            *score = f32::NEG_INFINITY;
        }
    }
}

/// Tokens that would complete an n-gram already present in `tokens`
pub fn banned_ngram_tokens(tokens: &[u32], ngram_size: usize) -> HashSet<u32> {
    let mut banned = HashSet::new();
    if ngram_size == 0 || tokens.len() + 1 < ngram_size {
        return banned;
    }

    let prefix_len = ngram_size - 1;
    let current_prefix = &tokens[tokens.len() - prefix_len..];
    for window in tokens.windows(ngram_size) {
        if &window[..prefix_len] == current_prefix {
            banned.insert(window[prefix_len]);
        }
    }
    banned
}

pub fn apply_no_repeat_ngram(logits: &mut [f32], tokens: &[u32], ngram_size: usize) {
    for token in banned_ngram_tokens(tokens, ngram_size) {
        if let Some(score) = logits.get_mut(token as usize) {
            *score = f32::NEG_INFINITY;
        }
    }
}

/// Leaves only `token_id` selectable
pub fn force_token(logits: &mut [f32], token_id: u32) {
    for (idx, score) in logits.iter_mut().enumerate() {
        if idx != token_id as usize {
            *score = f32::NEG_INFINITY;
        }
    }
}

/// Applies every generation constraint for the next step
///
/// `tokens` holds the decoder sequence so far, starting with the decoder
/// start token.
pub fn process_logits(
    logits: &mut [f32],
    tokens: &[u32],
    length: SummaryLength,
    config: &GenerationConfig,
) {
    let cur_len = tokens.len();

    apply_min_length(logits, cur_len, length.min_tokens, config.eos_token_id);
    apply_no_repeat_ngram(logits, tokens, config.no_repeat_ngram_size);

    if cur_len == 1 {
        if let Some(bos) = config.forced_bos_token_id {
            force_token(logits, bos);
        }
    }
    if cur_len + 1 == length.max_tokens {
        if let Some(eos) = config.forced_eos_token_id {
            force_token(logits, eos);
        }
    }
}

/// Index of the highest score; the lowest index wins ties and NaN never wins
pub fn argmax(logits: &[f32]) -> Option<u32> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in logits.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx as u32)
}

/// Greedy search
///
/// Calls `step` with the current decoder sequence until EOS is produced or
/// the sequence reaches `length.max_tokens` (decoder start token included).
/// Returns the full sequence including the decoder start token.
pub fn greedy_search<F>(
    mut step: F,
    length: SummaryLength,
    config: &GenerationConfig,
) -> Result<Vec<u32>>
where
    F: FnMut(&[u32]) -> Result<Vec<f32>>,
{
    let mut tokens = vec![config.decoder_start_token_id];

    while tokens.len() < length.max_tokens {
        let mut logits = step(&tokens)?;
        process_logits(&mut logits, &tokens, length, config);

        let next = argmax(&logits)
            .ok_or_else(|| anyhow::anyhow!("Decoder produced no selectable token"))?;
        tokens.push(next);

        if next == config.eos_token_id {
            break;
        }
    }

    Ok(tokens)
}
