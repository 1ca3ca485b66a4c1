// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! This module provides the POST /embed endpoint for generating
//! 384-dimensional embeddings with bge-small-en-v1.5.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::embed_handler;
pub use request::{log_preview, EmbedRequest};
pub use response::EmbedResponse;
