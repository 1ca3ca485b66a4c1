// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod server;
pub mod summarize;

pub use embed::{embed_handler, EmbedRequest, EmbedResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_embedding_app, create_summary_app, ModelState};
pub use server::{run_embedding_service, run_summary_service, serve};
pub use summarize::{summarize_handler, SummarizeRequest, SummarizeResponse};
