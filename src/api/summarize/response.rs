// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SummarizeResponse type for POST /summarize

use serde::{Deserialize, Serialize};

/// Response body for POST /summarize
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummarizeResponse {
    pub summary: String,
}
