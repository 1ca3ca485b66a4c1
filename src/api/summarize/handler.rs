// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /summarize HTTP handler

use crate::api::http_server::ModelState;
use crate::api::summarize::{SummarizeRequest, SummarizeResponse};
use crate::api::ApiError;
use crate::summarization::Summarizer;
use axum::{extract::State, Json};
use tracing::{error, info};

/// POST /summarize handler
///
/// The model check comes first, so a loading service answers 503 even for
/// requests that would fail validation.
///
/// # Request Body
/// ```json
/// { "text": "Long article ...", "max_tokens": 128, "min_tokens": 32 }
/// ```
///
/// # Response Body
/// ```json
/// { "summary": "Short summary." }
/// ```
pub async fn summarize_handler(
    State(state): State<ModelState<dyn Summarizer>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let model = state
        .model
        .get()
        .ok_or_else(|| ApiError::ServiceUnavailable("Model not loaded".to_string()))?;

    let (text, length) = request.validate()?;

    info!(
        "Summarizing {} chars (min_tokens={}, max_tokens={})",
        text.chars().count(),
        length.min_tokens,
        length.max_tokens
    );

    let summary = model.summarize(text, length).await.map_err(|e| {
        error!("Error generating summary: {:?}", e);
        ApiError::InternalError("Internal server error while generating summary.".to_string())
    })?;

    Ok(Json(SummarizeResponse { summary }))
}
