// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::Router;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::http_server::{create_embedding_app, create_summary_app, ModelState};
use crate::cli::{ServeArgs, EMBEDDING_SERVICE_PORT, SUMMARY_SERVICE_PORT};
use crate::embeddings::{load_embedding_model, TextEmbedder};
use crate::models::{ModelDownloader, ModelHandle, EMBEDDING_MODEL, SUMMARIZATION_MODEL};
use crate::summarization::{load_summarization_model, Summarizer};
use crate::version::get_version_string;

/// Serves `app` while `loader` runs in the background
///
/// The listener is bound before loading starts, so requests are answered
/// (with 503) while the model loads. When the loader succeeds its model is
/// stored in `handle`; when it fails the server is dropped and the error is
/// returned. Ctrl-C shuts the server down gracefully.
pub async fn serve<M, F>(
    addr: SocketAddr,
    app: Router,
    handle: ModelHandle<M>,
    loader: F,
) -> Result<()>
where
    M: ?Sized + Send + Sync + 'static,
    F: Future<Output = Result<Arc<M>>> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", listener.local_addr()?);

    let loader = tokio::spawn(async move {
        let started = Instant::now();
        let model = loader.await?;
        handle.set(model)?;
        info!("Model ready after {:.1}s", started.elapsed().as_secs_f64());
        Ok::<(), anyhow::Error>(())
    });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("HTTP server error")?;
            return Ok(());
        }
        loaded = loader => {
            match loaded {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Failed to load model: {:?}", e);
                    return Err(e.context("Model loading failed"));
                }
                Err(e) => {
                    error!("Model loader task failed: {}", e);
                    anyhow::bail!("Model loader task failed: {}", e);
                }
            }
        }
    }

    server.await.context("HTTP server error")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Runs the embedding service until shutdown or a model load failure
pub async fn run_embedding_service(args: ServeArgs) -> Result<()> {
    info!("Starting {}", get_version_string("embedding-service"));

    let handle = ModelHandle::<dyn TextEmbedder>::empty();
    let app = create_embedding_app(ModelState::new(handle.clone(), EMBEDDING_MODEL.model_id));

    let downloader = ModelDownloader::new(args.download_source());
    let options = args.session_options();
    let loader = async move { load_embedding_model(&downloader, options).await };

    serve(args.socket_addr(EMBEDDING_SERVICE_PORT), app, handle, loader).await
}

/// Runs the summarization service until shutdown or a model load failure
pub async fn run_summary_service(args: ServeArgs) -> Result<()> {
    info!("Starting {}", get_version_string("summary-service"));

    let handle = ModelHandle::<dyn Summarizer>::empty();
    let app = create_summary_app(ModelState::new(handle.clone(), SUMMARIZATION_MODEL.model_id));

    let downloader = ModelDownloader::new(args.download_source());
    let options = args.session_options();
    let loader = async move { load_summarization_model(&downloader, options).await };

    serve(args.socket_addr(SUMMARY_SERVICE_PORT), app, handle, loader).await
}
