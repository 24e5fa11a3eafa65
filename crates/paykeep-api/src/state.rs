//! # Application State
//!
//! Shared state for the Axum application: configuration plus the
//! payment use-case service.

use paykeep_core::{BoxedPaymentRepository, PaymentService};
use std::time::Duration;

/// Per-operation timeout applied when CONTEXT_TIMEOUT_SECS is unset
const DEFAULT_CONTEXT_TIMEOUT_SECS: u64 = 2;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Postgres connection string
    pub database_url: String,
    /// Deadline applied to every use-case operation
    pub context_timeout: Duration,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/paykeep".to_string()),
            context_timeout: Duration::from_secs(
                std::env::var("CONTEXT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(DEFAULT_CONTEXT_TIMEOUT_SECS),
            ),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment use-case service
    pub service: PaymentService,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state over any storage backend, threading the configured
    /// timeout into the service.
    pub fn new(repo: BoxedPaymentRepository, config: AppConfig) -> Self {
        let service = PaymentService::new(repo, config.context_timeout);
        Self { service, config }
    }
}
