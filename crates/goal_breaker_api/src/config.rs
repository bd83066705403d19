//! Server configuration.

use goal_breaker_decomposer::GroqConfig;
use goal_breaker_store::StoreConfig;
use std::net::SocketAddr;

use crate::error::{Error, Result};

/// Environment variable for the bind host.
pub const ENV_HOST: &str = "GOAL_BREAKER_HOST";
/// Environment variable for the listen port.
pub const ENV_PORT: &str = "GOAL_BREAKER_PORT";
/// Environment variable toggling CORS headers (`false`/`0`/`off` disables).
pub const ENV_CORS: &str = "GOAL_BREAKER_CORS";

/// Configuration for the [`GoalBreakerServer`](crate::GoalBreakerServer).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind the server to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// If `true`, permissive CORS headers are sent.
    pub cors_enabled: bool,
    /// If `true`, HTTP requests are traced.
    pub tracing: bool,
    /// Database settings.
    pub store: StoreConfig,
    /// Text-generation settings.
    pub groq: GroqConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_enabled: true,
            tracing: true,
            store: StoreConfig::default(),
            groq: GroqConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self {
            store: StoreConfig::from_env(),
            groq: GroqConfig::from_env(),
            ..Default::default()
        };

        if let Ok(host) = std::env::var(ENV_HOST) {
            if !host.trim().is_empty() {
                config.host = host;
            }
        }
        if let Ok(port) = std::env::var(ENV_PORT) {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }
        if let Ok(cors) = std::env::var(ENV_CORS) {
            config.cors_enabled = !matches!(
                cors.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }

        config
    }

    /// Returns a configuration that binds to all network interfaces.
    pub fn public(mut self) -> Self {
        self.host = "0.0.0.0".to_string();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn with_groq(mut self, groq: GroqConfig) -> Self {
        self.groq = groq;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    /// The socket address the server binds to.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))
    }

    /// Validates the configuration before the server starts.
    pub fn validate(&self) -> Result<()> {
        self.addr()?;
        self.groq.validate()?;
        Ok(())
    }
}
