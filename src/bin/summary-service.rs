// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use text_inference_services::api::run_summary_service;
use text_inference_services::cli::{init_tracing, SummaryServiceCli};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;

    let cli = SummaryServiceCli::parse();

    if let Err(e) = run_summary_service(cli.serve).await {
        error!("Summary service stopped: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
