// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use text_inference_services::api::run_embedding_service;
use text_inference_services::cli::{init_tracing, EmbeddingServiceCli};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;

    let cli = EmbeddingServiceCli::parse();

    if let Err(e) = run_embedding_service(cli.serve).await {
        error!("Embedding service stopped: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
