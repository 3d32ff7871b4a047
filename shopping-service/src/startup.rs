//! Application startup and lifecycle management.

use crate::config::ShoppingConfig;
use crate::handlers;
use crate::services::{ItemStore, MongoItemStore, ProductSearchClient};
use axum::middleware::from_fn;
use axum::{
    routing::{delete, get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ShoppingConfig,
    pub store: Arc<dyn ItemStore>,
    pub product_search: ProductSearchClient,
}

/// Build the HTTP router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/add-item", post(handlers::items::add_item))
        .route("/view-list", get(handlers::items::view_list))
        .route("/count-items", get(handlers::items::count_items))
        .route("/delete-item", delete(handlers::items::delete_item))
        .route("/clear-list", delete(handlers::items::clear_list))
        .route("/generate-id", get(handlers::items::generate_id))
        .route("/search-item", get(handlers::items::search_item))
        .route("/search-online", get(handlers::search::search_online))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // outside the trace layer so the span sees a minted id
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect to MongoDB and bind the HTTP listener.
    pub async fn build(config: ShoppingConfig) -> Result<Self, AppError> {
        let store = MongoItemStore::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
            &config.mongodb.collection,
        )
        .await?;

        store.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        Self::build_with_store(config, Arc::new(store)).await
    }

    /// Bind the HTTP listener over an already constructed item store.
    pub async fn build_with_store(
        config: ShoppingConfig,
        store: Arc<dyn ItemStore>,
    ) -> Result<Self, AppError> {
        let product_search = ProductSearchClient::new(config.product_search.clone())?;
        if product_search.is_configured() {
            tracing::info!(
                host = %config.product_search.api_host,
                "Product search client initialized"
            );
        } else {
            tracing::warn!(
                "Product search credentials not configured - search-online will fail upstream"
            );
        }

        let state = AppState {
            config: config.clone(),
            store,
            product_search,
        };

        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Shopping service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Serve until SIGINT/SIGTERM, then close the item store.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let store = self.state.store.clone();
        let app = router(self.state);

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        store.close().await;

        if let Err(e) = &result {
            tracing::error!("HTTP server error: {}", e);
        }
        result
    }
}
