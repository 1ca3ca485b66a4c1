// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::http_server::ModelState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// "healthy" once the model is loaded, "loading" before
    pub status: String,
    pub model: String,
}

impl HealthResponse {
    pub fn for_state<M: ?Sized>(state: &ModelState<M>) -> (StatusCode, Self) {
        let (status_code, status) = if state.model.is_ready() {
            (StatusCode::OK, "healthy")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "loading")
        };

        (
            status_code,
            HealthResponse {
                status: status.to_string(),
                model: state.model_id.to_string(),
            },
        )
    }
}

/// GET /health for either service
pub async fn health_handler<M: ?Sized + Send + Sync + 'static>(
    State(state): State<ModelState<M>>,
) -> impl IntoResponse {
    let (status_code, body) = HealthResponse::for_state(&state);
    (status_code, Json(body))
}
