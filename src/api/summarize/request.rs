// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SummarizeRequest type for POST /summarize

use crate::api::ApiError;
use crate::summarization::SummaryLength;
use serde::{Deserialize, Serialize};

/// Longest accepted input, in characters after trimming
pub const MAX_TEXT_CHARS: usize = 20_000;

/// Upper bound for `max_tokens` (BART position limit)
pub const MAX_SUMMARY_TOKENS: i64 = 1024;

/// Request body for POST /summarize
///
/// # Example
/// ```json
/// { "text": "Long article ...", "max_tokens": 80, "min_tokens": 32 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,

    /// Default: 128
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,

    /// Default: 32
    #[serde(default = "default_min_tokens")]
    pub min_tokens: i64,
}

fn default_max_tokens() -> i64 {
    128
}

fn default_min_tokens() -> i64 {
    32
}

impl SummarizeRequest {
    /// Validates the request and returns the trimmed text with its length bounds
    ///
    /// # Validation Rules
    /// 1. **text**: non-empty after trimming, at most 20,000 characters
    /// 2. **max_tokens**: 1-1024
    /// 3. **min_tokens**: 0-`max_tokens`
    pub fn validate(&self) -> Result<(&str, SummaryLength), ApiError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ApiError::validation("text", "Empty text"));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ApiError::validation("text", "Text too long"));
        }

        if self.max_tokens < 1 || self.max_tokens > MAX_SUMMARY_TOKENS {
            return Err(ApiError::validation(
                "max_tokens",
                format!(
                    "max_tokens must be between 1 and {} (got {})",
                    MAX_SUMMARY_TOKENS, self.max_tokens
                ),
            ));
        }
        if self.min_tokens < 0 || self.min_tokens > self.max_tokens {
            return Err(ApiError::validation(
                "min_tokens",
                format!(
                    "min_tokens must be between 0 and max_tokens ({}) (got {})",
                    self.max_tokens, self.min_tokens
                ),
            ));
        }

        Ok((
            text,
            SummaryLength {
                min_tokens: self.min_tokens as usize,
                max_tokens: self.max_tokens as usize,
            },
        ))
    }
}
