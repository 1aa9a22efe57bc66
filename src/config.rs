use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::utils::CircuitBreakerConfig;

// ============================================================================
// Service Configuration - CLI flags with environment fallbacks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "order-service", about = "Order management API", long_about = None)]
pub struct Config {
    /// Bind address for the API and metrics listeners
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// API port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Prometheus exposition port
    #[arg(long, env = "METRICS_PORT", default_value_t = 9090)]
    pub metrics_port: u16,

    /// Base URL of an external product service; the built-in catalog is used when unset
    #[arg(long, env = "PRODUCT_SERVICE_URL")]
    pub product_service_url: Option<String>,

    /// Bearer token sent to the product service when the caller supplies none
    #[arg(long, env = "PRODUCT_SERVICE_TOKEN")]
    pub product_service_token: Option<String>,

    /// Per-call catalog timeout in milliseconds
    #[arg(long, env = "CATALOG_TIMEOUT_MS", default_value_t = 5000)]
    pub catalog_timeout_ms: u64,

    /// Consecutive catalog failures before the circuit opens
    #[arg(long, env = "CATALOG_CIRCUIT_FAILURES", default_value_t = 5)]
    pub circuit_failure_threshold: u32,

    /// Seconds the circuit stays open before probing
    #[arg(long, env = "CATALOG_CIRCUIT_COOLDOWN_SECS", default_value_t = 30)]
    pub circuit_cooldown_secs: u64,

    /// Load demo users and orders at startup
    #[arg(long, env = "SEED_DATA", default_value_t = true, action = clap::ArgAction::Set)]
    pub seed: bool,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    pub fn api_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn circuit_breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.circuit_failure_threshold,
            cooldown: Duration::from_secs(self.circuit_cooldown_secs),
            ..CircuitBreakerConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            metrics_port: 9090,
            product_service_url: None,
            product_service_token: None,
            catalog_timeout_ms: 5000,
            circuit_failure_threshold: 5,
            circuit_cooldown_secs: 30,
            seed: true,
            log_format: LogFormat::Pretty,
        }
    }
}
