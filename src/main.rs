//! Contact intake service.
//!
//! Reads configuration from the environment and an optional `.env` file,
//! prepares the application directories, then selects the persistence
//! backend once before serving the contact form until shut down.

use contact_intake::{
    config::AppConfig,
    http::{self, AppState},
    submission::{
        adapters::layout::AppLayout,
        services::{SubmissionService, connect_remote, select_store},
    },
    telemetry,
};
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    telemetry::init()?;

    let config = AppConfig::from_env()?;
    let layout = AppLayout::prepare(&config.app_root)?;
    let (app_root, uploads, fallback) = layout.into_parts();

    let clock = Arc::new(DefaultClock);
    let remote = connect_remote(config.cosmos.as_ref(), Arc::clone(&clock)).await;
    let selection = select_store(remote, fallback);
    match selection.fallback_reason() {
        Some(reason) => warn!(%reason, backend = %selection.kind(), "using local fallback store"),
        None => info!(backend = %selection.kind(), "using remote store"),
    }

    let store = Arc::new(selection.into_store());
    let service = SubmissionService::new(store, clock, app_root.clone());
    let app = http::router(
        AppState::new(service, uploads),
        &app_root,
        config.max_body_bytes,
    );

    let listener = TcpListener::bind(config.socket_addr()).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    http::serve(listener, app).await?;

    info!("Server shut down");
    Ok(())
}
