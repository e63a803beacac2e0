//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, JWT validation)
//! - Bind the server to a listener and serve with graceful shutdown
//! - Inject the gate-protected upstream clients into handlers

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::BffConfig;
use crate::http::handlers;
use crate::http::middleware::jwt_validation_middleware;
use crate::http::request::RequestIdLayer;
use crate::upstream::{CatalogClient, RecommendationsClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BffConfig>,
    pub recommendations: Arc<RecommendationsClient>,
    pub catalog: Arc<CatalogClient>,
    pub started_at: Instant,
}

/// HTTP server for the book BFF.
pub struct HttpServer {
    router: Router,
    config: BffConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The circuit gate is created here, once per process, and lives for the
    /// server lifetime.
    pub fn new(config: BffConfig) -> Self {
        let state = AppState {
            recommendations: Arc::new(RecommendationsClient::new(&config.recommendations)),
            catalog: Arc::new(CatalogClient::new(&config.catalog)),
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BffConfig, state: AppState) -> Router {
        // JWT validation applies to the /books surface only; /status stays
        // reachable for probes.
        let books = Router::new()
            .route("/books/{isbn}/related-books", get(handlers::related_books))
            .route("/books/isbn/{isbn}", get(handlers::book_by_isbn))
            .route("/books/{isbn}", get(handlers::book_by_isbn))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                jwt_validation_middleware,
            ));

        Router::new()
            .merge(books)
            .route("/status", get(handlers::status))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            catalog = %self.config.catalog.address,
            recommendations = %self.config.recommendations.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BffConfig {
        &self.config
    }
}
