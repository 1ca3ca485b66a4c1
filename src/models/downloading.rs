// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model artifact resolution
//!
//! Turns a [`ModelSpec`] into local file paths, either by pointing at an
//! operator-provided directory or by downloading through the HuggingFace Hub
//! cache. Downloads use the blocking hf-hub client on Tokio's blocking pool.

use hf_hub::api::sync::{ApiBuilder, ApiError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::ModelSpec;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("required file '{file}' not found in {dir}")]
    MissingLocalFile { file: String, dir: String },

    #[error("failed to initialize HuggingFace Hub client: {0}")]
    HubInit(#[source] ApiError),

    #[error("failed to download {repo}/{file}: {source}")]
    Hub {
        repo: String,
        file: String,
        #[source]
        source: ApiError,
    },

    #[error("download task panicked: {0}")]
    TaskFailed(String),

    #[error("artifact '{0}' was not resolved for this model")]
    UnknownArtifact(String),
}

/// Where model artifacts come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSource {
    /// HuggingFace Hub, optionally with a custom cache directory
    HuggingFace { cache_dir: Option<PathBuf> },
    /// Pre-populated directory laid out like the artifact repository
    LocalDir(PathBuf),
}

/// Resolved local paths of one model's artifacts, keyed by repository-relative name
#[derive(Debug, Clone)]
pub struct ModelFiles {
    paths: HashMap<String, PathBuf>,
}

impl ModelFiles {
    /// Path of a required artifact
    pub fn path(&self, file: &str) -> Result<&Path, DownloadError> {
        self.paths
            .get(file)
            .map(PathBuf::as_path)
            .ok_or_else(|| DownloadError::UnknownArtifact(file.to_string()))
    }

    /// Path of an optional artifact, `None` if it was not available
    pub fn optional(&self, file: &str) -> Option<&Path> {
        self.paths.get(file).map(PathBuf::as_path)
    }

}

#[derive(Debug, Clone)]
pub struct ModelDownloader {
    source: DownloadSource,
}

impl ModelDownloader {
    pub fn new(source: DownloadSource) -> Self {
        Self { source }
    }

    /// Resolves every artifact of `spec`
    ///
    /// Required files must all resolve; optional files that cannot be found
    /// are skipped with a warning.
    pub async fn fetch(&self, spec: &ModelSpec) -> Result<ModelFiles, DownloadError> {
        let source = self.source.clone();
        let spec = *spec;
        tokio::task::spawn_blocking(move || fetch_blocking(&source, &spec))
            .await
            .map_err(|e| DownloadError::TaskFailed(e.to_string()))?
    }
}

fn fetch_blocking(source: &DownloadSource, spec: &ModelSpec) -> Result<ModelFiles, DownloadError> {
    match source {
        DownloadSource::LocalDir(dir) => resolve_local(dir, spec),
        DownloadSource::HuggingFace { cache_dir } => download_from_hub(cache_dir.as_deref(), spec),
    }
}

fn resolve_local(dir: &Path, spec: &ModelSpec) -> Result<ModelFiles, DownloadError> {
    info!(
        "Resolving {} artifacts from local directory {}",
        spec.model_id,
        dir.display()
    );

    let mut paths = HashMap::new();
    for file in spec.required_files {
        let path = dir.join(file);
        if !path.is_file() {
            return Err(DownloadError::MissingLocalFile {
                file: file.to_string(),
                dir: dir.display().to_string(),
            });
        }
        paths.insert(file.to_string(), path);
    }

    for file in spec.optional_files {
        let path = dir.join(file);
        if path.is_file() {
            paths.insert(file.to_string(), path);
        } else {
            warn!("Optional artifact {} not present in {}", file, dir.display());
        }
    }

    Ok(ModelFiles { paths })
}

fn download_from_hub(cache_dir: Option<&Path>, spec: &ModelSpec) -> Result<ModelFiles, DownloadError> {
    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir.to_path_buf());
    }
    let api = builder.build().map_err(DownloadError::HubInit)?;
    let repo = api.model(spec.artifact_repo.to_string());

    info!(
        "Fetching {} artifacts from HuggingFace repo {}",
        spec.model_id, spec.artifact_repo
    );

    let mut paths = HashMap::new();
    for file in spec.required_files {
        let path = repo.get(file).map_err(|source| DownloadError::Hub {
            repo: spec.artifact_repo.to_string(),
            file: file.to_string(),
            source,
        })?;
        debug!("{} -> {}", file, path.display());
        paths.insert(file.to_string(), path);
    }

    for file in spec.optional_files {
        match repo.get(file) {
            Ok(path) => {
                debug!("{} -> {}", file, path.display());
                paths.insert(file.to_string(), path);
            }
            Err(e) => warn!("Optional artifact {} unavailable: {}", file, e),
        }
    }

    Ok(ModelFiles { paths })
}
