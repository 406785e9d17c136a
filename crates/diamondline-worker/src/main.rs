//! Diamondline worker entry point.

use std::error::Error;
use std::sync::Arc;

use diamondline_cards::application::dispatch::{Dispatcher, LocalDispatcher};
use diamondline_core::cancel::CancellationSource;
use diamondline_core::clock::SystemClock;
use diamondline_reconciliation::service::ReconciliationService;
use diamondline_worker::adapters::catalog::FileCardCatalog;
use diamondline_worker::adapters::feed::FileRosterUpdateFeed;
use diamondline_worker::adapters::repository::MemoryCardRepository;
use diamondline_worker::config::WorkerConfig;
use diamondline_worker::routes;
use diamondline_worker::state::AppState;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Diamondline worker");

    let config = WorkerConfig::from_env()?;
    let cancel = CancellationSource::new();

    // Build collaborators.
    let repository = Arc::new(MemoryCardRepository::default());
    let dispatcher: Arc<dyn Dispatcher> =
        Arc::new(LocalDispatcher::new(Arc::new(SystemClock), repository));
    let service = Arc::new(ReconciliationService::new(
        Arc::new(FileCardCatalog::new(&config.data_dir)),
        Arc::new(FileRosterUpdateFeed::new(&config.data_dir)),
        Arc::clone(&dispatcher),
        config.reconcile,
    ));
    let app_state = AppState::new(service, dispatcher, cancel.token());

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    Ok(())
}

/// Waits for Ctrl-C, then cancels every running job.
async fn shutdown_signal(cancel: CancellationSource) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, cancelling running jobs");
    cancel.cancel();
}
