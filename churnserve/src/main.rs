use anyhow::Context;
use churnserve::{
    config::AppConfig,
    inference::{InferenceEngine, ModelSlot},
    model, server, telemetry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load Config
    let config_path = AppConfig::path_from_env();
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // 2. Init
    telemetry::init_tracing(&config.logging).context("installing tracing subscriber")?;
    let metrics = if config.metrics.enabled {
        Some(telemetry::init_metrics().context("installing metrics recorder")?)
    } else {
        None
    };
    model::init_ort().context("initialising ONNX Runtime")?;

    // 3. Create Router; predict answers 503 until the slot is filled
    let slot = ModelSlot::new();
    let mut state = server::AppState::new(slot.clone(), config.model.threshold);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }
    let app = server::create_router(state);

    // 4. Bind & Serve
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, threshold = config.model.threshold.value(), "server listening");

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // 5. Load the artifact; any failure stops the process before it is ready
    let model_config = config.model.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        model::load_artifact(&model_config.path, model_config.intra_threads)
    })
    .await
    .context("artifact loader task panicked")?;

    let artifact = match loaded {
        Ok(artifact) => artifact,
        Err(e) => {
            error!(error = %e, path = %config.model.path.display(), "failed to load model artifact");
            server.abort();
            return Err(e).context("loading model artifact");
        }
    };

    let engine = match InferenceEngine::new(Arc::new(artifact)) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "model artifact does not match the request schema");
            server.abort();
            return Err(e).context("verifying model artifact");
        }
    };

    let model_version = engine.descriptor().model_version.clone();
    if slot.install(engine).is_err() {
        anyhow::bail!("model slot was already filled");
    }
    info!(%model_version, "model ready");

    server.await.context("server task panicked")??;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
