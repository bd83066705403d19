//! # Goal Breaker API
//!
//! HTTP service that turns a free-text goal into 7-10 daily subtasks with
//! a text-generation model, stores them, and tracks progress as subtasks
//! are completed.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use goal_breaker_api::{GoalBreakerServer, ServerConfig};
//!
//! let server = GoalBreakerServer::new(ServerConfig::from_env())?;
//! server.run_with_shutdown(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await?;
//! ```
//!
//! See [`rest`] for the endpoint list.

pub mod config;
pub mod error;
pub mod rest;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use server::{build_router, GoalBreakerServer};
pub use state::AppState;
