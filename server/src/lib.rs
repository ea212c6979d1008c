//! HTTP server for the todo resource.
//!
//! # Design
//! - The store is injected through `AppState`, so tests run the real router
//!   against `InMemoryStore` and production runs it against `MongoStore`.
//! - `Frontend` picks between the development surface (CORS for a single
//!   origin) and the production surface (static bundle as router fallback).
//! - Each request runs on its own task; dropping the request future drops the
//!   in-flight store call with it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch};
use axum::Router;
use tokio::net::TcpListener;
use todo_core::TodoStore;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::ApiError;

/// What `PATCH /api/todos/{id}` does with the request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Validate the body, ignore it, and mark the record completed.
    #[default]
    ForceComplete,
    /// Apply the submitted `completed` / `body` fields.
    ApplyBody,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub update_mode: UpdateMode,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            update_mode: UpdateMode::default(),
        }
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }
}

#[derive(Debug, Clone)]
pub enum Frontend {
    /// Development: allow cross-origin calls from `origin` only.
    Cors { origin: HeaderValue },
    /// Production: serve the asset bundle in `dir` for non-API paths.
    Static { dir: PathBuf },
}

pub fn app(state: AppState, frontend: Frontend) -> Router {
    let router = Router::new()
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/{id}",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .with_state(state);

    let router = match frontend {
        Frontend::Cors { origin } => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]),
        ),
        Frontend::Static { dir } => router.fallback_service(ServeDir::new(dir)),
    };

    router.layer(TraceLayer::new_for_http())
}

/// Serves `app` until Ctrl+C or SIGTERM.
pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
