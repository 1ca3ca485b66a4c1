// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Summarization API Module
//!
//! This module provides the POST /summarize endpoint backed by
//! distilbart-cnn-12-6.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::summarize_handler;
pub use request::SummarizeRequest;
pub use response::SummarizeResponse;
