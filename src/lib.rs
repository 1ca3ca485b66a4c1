// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod embeddings;
pub mod inference;
pub mod models;
pub mod summarization;
pub mod version;

// Re-export main types
pub use api::{ApiError, ModelState};
pub use embeddings::{OnnxEmbeddingModel, TextEmbedder};
pub use models::{DownloadSource, ModelDownloader, ModelHandle};
pub use summarization::{OnnxSummarizationModel, Summarizer, SummaryLength};
