//! The Goal Breaker API server.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::rest;
use crate::state::AppState;

use axum::Router;
use goal_breaker_decomposer::{GoalDecomposer, GroqClient};
use goal_breaker_store::GoalStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Goal Breaker API server.
pub struct GoalBreakerServer {
    config: ServerConfig,
    state: AppState,
}

impl GoalBreakerServer {
    /// Opens the database and builds the Groq-backed decomposer.
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let store = GoalStore::open(config.store.clone())?;
        let client = GroqClient::new(config.groq.clone())?;
        let decomposer = GoalDecomposer::new(Arc::new(client));

        Ok(Self {
            state: AppState::new(store, decomposer),
            config,
        })
    }

    /// Creates a server around a pre-built state.
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Runs the server until `shutdown_signal` completes.
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr()?;
        let router = self.build_router();

        info!("Starting Goal Breaker API on http://{}", addr);
        info!(database = %self.config.store.db_path.display(), model = %self.config.groq.model, "configured");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        info!("Goal Breaker API stopped");
        Ok(())
    }
}

/// Builds the `axum` router for `state`.
///
/// Layers are applied in reverse order of definition.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let app = rest::router().with_state(state);

    let app = if config.cors_enabled {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    };

    if config.tracing {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}
