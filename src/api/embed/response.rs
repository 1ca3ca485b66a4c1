// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for POST /embed

use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// `embedding` has the model's dimension (384 for bge-small-en-v1.5) and
/// unit L2 norm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}
