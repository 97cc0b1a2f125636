//! contactscout web server and REST API.
//!
//! Provides an Axum-based HTTP server with:
//! - Email resolution for a single login
//! - Saved-user list management
//! - Health endpoint

pub mod api;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use contactscout_core::db::Database;
use contactscout_core::pipeline::EmailResolutionPipeline;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub db: Mutex<Database>,
    pub pipeline: Arc<EmailResolutionPipeline>,
}

/// The web server.
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server with the given dependencies.
    pub fn new(db: Database, pipeline: Arc<EmailResolutionPipeline>) -> Self {
        let state = Arc::new(AppState {
            db: Mutex::new(db),
            pipeline,
        });
        Self { state }
    }

    /// The full application router with middleware attached.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the web server, listening on the given address, until
    /// `shutdown` resolves.
    pub async fn start<F>(self, listen_addr: &str, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listen_addr.parse()?;
        let app = self.router();

        info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("web server stopped");
        Ok(())
    }
}

/// Assemble the API routes around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(api::status::routes())
        .merge(api::github::routes())
        .merge(api::save::routes())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
