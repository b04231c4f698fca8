pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    llm::{CompletionService, LlmClient, OpenAiClient},
};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::info;

impl AppState {
    /// Wires the OpenAI-backed completion service from startup configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.server.request_timeout_secs);
        let client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(&config.llm, timeout)?);

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Arc<dyn LlmClient>, config: &Config) -> Self {
        let timeout = Duration::from_secs(config.server.request_timeout_secs);
        Self {
            completion: Arc::new(CompletionService::new(client, &config.llm, timeout)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/query", post(handlers::query))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let app_state = AppState::from_config(&config)?;

    info!(
        "Using model {} with a {}s provider timeout",
        config.llm.model, config.server.request_timeout_secs
    );

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
