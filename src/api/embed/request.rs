// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for POST /embed

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Number of characters shown in request log previews
pub const PREVIEW_CHARS: usize = 200;

/// Request body for POST /embed
///
/// # Example
/// ```json
/// { "text": "The quick brown fox" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Text to embed; must contain a non-whitespace character
    pub text: String,
}

impl EmbedRequest {
    /// Rejects empty and whitespace-only text
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.text.trim().is_empty() {
            return Err(ApiError::validation(
                "text",
                "Field 'text' must be a non-empty string.",
            ));
        }
        Ok(())
    }

    /// Single-line preview of the text for logs
    pub fn preview(&self) -> String {
        log_preview(&self.text)
    }
}

/// Collapses whitespace runs and shortens to at most [`PREVIEW_CHARS`] characters
pub fn log_preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > PREVIEW_CHARS {
        let head: String = collapsed.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        collapsed
    }
}
