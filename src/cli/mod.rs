// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::{Args, Parser};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::inference::SessionOptions;
use crate::models::DownloadSource;

/// Default port of the embedding service
pub const EMBEDDING_SERVICE_PORT: u16 = 8000;

/// Default port of the summarization service
pub const SUMMARY_SERVICE_PORT: u16 = 8001;

/// Options shared by both services
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind (defaults to the service's own port)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory laid out like the model's artifact repository; skips downloading
    #[arg(long, env = "MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// HuggingFace Hub cache directory
    #[arg(long, env = "MODEL_CACHE_DIR")]
    pub model_cache_dir: Option<PathBuf>,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Try the CUDA execution provider before CPU
    #[arg(long, env = "ORT_USE_CUDA")]
    pub cuda: bool,
}

impl ServeArgs {
    pub fn socket_addr(&self, default_port: u16) -> SocketAddr {
        SocketAddr::new(self.host, self.port.unwrap_or(default_port))
    }

    pub fn download_source(&self) -> DownloadSource {
        match &self.model_dir {
            Some(dir) => DownloadSource::LocalDir(dir.clone()),
            None => DownloadSource::HuggingFace {
                cache_dir: self.model_cache_dir.clone(),
            },
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            intra_threads: self.intra_threads.max(1),
            prefer_cuda: self.cuda,
        }
    }
}

/// Text embedding service (BAAI/bge-small-en-v1.5)
#[derive(Parser, Debug)]
#[command(name = "embedding-service")]
#[command(version)]
#[command(about = "HTTP service computing sentence embeddings", long_about = None)]
pub struct EmbeddingServiceCli {
    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Text summarization service (sshleifer/distilbart-cnn-12-6)
#[derive(Parser, Debug)]
#[command(name = "summary-service")]
#[command(version)]
#[command(about = "HTTP service producing abstractive summaries", long_about = None)]
pub struct SummaryServiceCli {
    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Installs the fmt subscriber, honoring RUST_LOG and defaulting to `info`
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
