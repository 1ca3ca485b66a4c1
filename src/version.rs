// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the text inference services

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "embed",
    "summarize",
    "health",
    "onnx-runtime",
    "hf-hub-download",
];

/// Get formatted version string for logging
pub fn get_version_string(service: &str) -> String {
    format!(
        "{} {} ({}) features: {}",
        service,
        VERSION_NUMBER,
        BUILD_DATE,
        FEATURES.join(", ")
    )
}
