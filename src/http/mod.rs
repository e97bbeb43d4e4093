//! HTTP surface.
//!
//! - `POST /submit` accepts the contact form, multipart or URL-encoded.
//! - `GET /health` reports liveness.
//! - Every other path is served from the static site in the application
//!   root.

pub mod error;
pub mod form;
pub mod multipart;
pub mod routes;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use camino::Utf8Path;
use mockable::Clock;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::submission::{
    adapters::uploads::UploadDirectory, ports::SubmissionStore, services::SubmissionService,
};

/// Shared request state: the submission service and the upload directory.
pub struct AppState<S, C>
where
    S: SubmissionStore,
    C: Clock + Send + Sync,
{
    service: Arc<SubmissionService<S, C>>,
    uploads: UploadDirectory,
}

impl<S, C> AppState<S, C>
where
    S: SubmissionStore,
    C: Clock + Send + Sync,
{
    /// Bundles the service and upload directory for the router.
    #[must_use]
    pub fn new(service: SubmissionService<S, C>, uploads: UploadDirectory) -> Self {
        Self {
            service: Arc::new(service),
            uploads,
        }
    }
}

impl<S, C> Clone for AppState<S, C>
where
    S: SubmissionStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            uploads: self.uploads.clone(),
        }
    }
}

/// Builds the application router.
///
/// `static_root` is served for any path without a dedicated route.
pub fn router<S, C>(
    state: AppState<S, C>,
    static_root: &Utf8Path,
    max_body_bytes: usize,
) -> Router
where
    S: SubmissionStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/submit", post(routes::submit::<S, C>))
        .route("/health", get(routes::health))
        .fallback_service(ServeDir::new(static_root))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` until Ctrl+C or `SIGTERM`.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, app: Router) -> io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
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
}
