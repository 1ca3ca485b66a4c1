// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler
//!
//! Flow:
//! 1. Log input length and a preview
//! 2. Validate the request (non-empty text)
//! 3. Check that the embedding model is loaded
//! 4. Embed the text as received
//! 5. Map model failures to a generic internal error

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::http_server::ModelState;
use crate::api::ApiError;
use crate::embeddings::TextEmbedder;
use axum::{extract::State, Json};
use tracing::{error, info};

/// POST /embed handler
///
/// # Request Body
/// ```json
/// { "text": "The quick brown fox" }
/// ```
///
/// # Response Body
/// ```json
/// { "embedding": [0.013, -0.042, ...] }
/// ```
///
/// # Errors
/// - 400 if `text` is empty or whitespace-only
/// - 503 while the model is still loading
/// - 500 if the model fails
pub async fn embed_handler(
    State(state): State<ModelState<dyn TextEmbedder>>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    info!(
        "Received embedding request ({} chars): {}",
        request.text.chars().count(),
        request.preview()
    );

    request.validate()?;

    let model = state.model.get().ok_or_else(|| {
        error!("Embedding request received before the model finished loading");
        ApiError::ServiceUnavailable("Model not loaded yet.".to_string())
    })?;

    let embedding = model.embed(&request.text).await.map_err(|e| {
        error!("Error generating embedding: {:?}", e);
        ApiError::InternalError("Internal server error while generating embedding.".to_string())
    })?;

    Ok(Json(EmbedResponse { embedding }))
}
