//! Goal Breaker API Server

use clap::Parser;
use goal_breaker_api::{GoalBreakerServer, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Breaks goals into daily subtasks and tracks their progress.
#[derive(Debug, Parser)]
#[command(name = "goal-breaker", version, about)]
struct Cli {
    /// Host to bind to
    #[arg(long, env = "GOAL_BREAKER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "GOAL_BREAKER_PORT")]
    port: Option<u16>,

    /// Bind to all interfaces (0.0.0.0)
    #[arg(long)]
    public: bool,

    /// SQLite database file
    #[arg(short, long, env = "GOAL_BREAKER_DB")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "goal_breaker_api=info,goal_breaker_store=info,goal_breaker_decomposer=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(host) = cli.host {
        config = config.with_host(host);
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }
    if cli.public {
        config = config.public();
    }
    if let Some(path) = cli.database {
        config.store = config.store.with_db_path(path);
    }

    let server = GoalBreakerServer::new(config)?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    server.run_with_shutdown(shutdown_signal).await?;

    Ok(())
}
