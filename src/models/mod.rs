// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model identities, artifact resolution and the shared model handle

pub mod downloading;
pub mod handle;

pub use downloading::{DownloadError, DownloadSource, ModelDownloader, ModelFiles};
pub use handle::{ModelAlreadyLoaded, ModelHandle};

/// A pretrained model and the files needed to run it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Public identifier of the model weights
    pub model_id: &'static str,
    /// Hub repository holding the ONNX export of those weights
    pub artifact_repo: &'static str,
    /// Repository-relative files that must be present
    pub required_files: &'static [&'static str],
    /// Repository-relative files used when present
    pub optional_files: &'static [&'static str],
}

pub const EMBEDDING_ONNX_FILE: &str = "onnx/model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const POOLING_CONFIG_FILE: &str = "1_Pooling/config.json";
pub const ENCODER_ONNX_FILE: &str = "onnx/encoder_model.onnx";
pub const DECODER_ONNX_FILE: &str = "onnx/decoder_model.onnx";
pub const MODEL_CONFIG_FILE: &str = "config.json";

/// BAAI/bge-small-en-v1.5 (384 dimensions, CLS pooling)
pub const EMBEDDING_MODEL: ModelSpec = ModelSpec {
    model_id: "BAAI/bge-small-en-v1.5",
    artifact_repo: "BAAI/bge-small-en-v1.5",
    required_files: &[EMBEDDING_ONNX_FILE, TOKENIZER_FILE],
    optional_files: &[POOLING_CONFIG_FILE],
};

/// Output dimension of [`EMBEDDING_MODEL`]
pub const EMBEDDING_DIMENSION: usize = 384;

/// sshleifer/distilbart-cnn-12-6, run from its ONNX export
pub const SUMMARIZATION_MODEL: ModelSpec = ModelSpec {
    model_id: "sshleifer/distilbart-cnn-12-6",
    artifact_repo: "Xenova/distilbart-cnn-12-6",
    required_files: &[
        ENCODER_ONNX_FILE,
        DECODER_ONNX_FILE,
        TOKENIZER_FILE,
        MODEL_CONFIG_FILE,
    ],
    optional_files: &[],
};
