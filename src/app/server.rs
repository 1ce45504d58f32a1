use crate::adapters::http::HttpIntegration;
use crate::app::routes;
use crate::config::toml_config::ServiceConfig;
use crate::core::aggregator::Aggregator;
use crate::utils::error::{CompositeError, Result};
use crate::utils::monitor::RequestMetrics;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// Wires the reqwest client, policies and metrics into an engine.
pub fn build_aggregator(
    config: &ServiceConfig,
    metrics: Arc<RequestMetrics>,
) -> Result<Aggregator<HttpIntegration>> {
    let integration = HttpIntegration::new(config.endpoints(), config.timeout())?;
    Ok(Aggregator::new(integration, metrics, config.service_address()).with_policies(config.policy))
}

/// Serves the composite routes on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    aggregator: Arc<Aggregator<HttpIntegration>>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = routes::router(aggregator);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CompositeError::ServerError {
            message: e.to_string(),
        })
}

pub async fn run(config: ServiceConfig) -> Result<()> {
    let metrics = Arc::new(RequestMetrics::new());
    let aggregator = Arc::new(build_aggregator(&config, metrics)?);

    let listener = TcpListener::bind(config.server.bind.as_str()).await?;
    info!("🚀 Listening on {}", listener.local_addr()?);
    info!("🏷️ Service address: {}", aggregator.service_address());

    serve(listener, aggregator, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
