use liftcycle_core::rounding::DEFAULT_ROUNDING_INCREMENT;
use rust_decimal::Decimal;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Prescription engine defaults.
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            engine: EngineConfig::from_env(),
        }
    }
}

/// Defaults applied by the prescription engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Increment filled into load strategies created without one.
    pub default_rounding_increment: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rounding_increment: DEFAULT_ROUNDING_INCREMENT,
        }
    }
}

impl EngineConfig {
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `DEFAULT_ROUNDING_INCREMENT` | `2.5`   |
    pub fn from_env() -> Self {
        let default_rounding_increment = match std::env::var("DEFAULT_ROUNDING_INCREMENT") {
            Ok(raw) => {
                let value: Decimal = raw
                    .trim()
                    .parse()
                    .expect("DEFAULT_ROUNDING_INCREMENT must be a decimal number");
                assert!(
                    value > Decimal::ZERO,
                    "DEFAULT_ROUNDING_INCREMENT must be greater than zero"
                );
                value
            }
            Err(_) => DEFAULT_ROUNDING_INCREMENT,
        };

        Self {
            default_rounding_increment,
        }
    }
}
