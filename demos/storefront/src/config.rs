// demos/storefront/src/config.rs

use crate::errors::{AppError, Result};
use crate::sessions::SessionLimits;
use cartflow::{CartConfig, RefreshOrdering};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Postgres connection string. Without it the server keeps carts in memory.
  pub database_url: Option<String>,
  /// Create the schema and upsert the demo catalog on startup.
  pub seed_db: bool,
  pub cart: CartConfig,
  pub sessions: SessionLimits,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL");

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    let refresh_ordering = match get_env("CART_REFRESH_ORDERING") {
      Some(raw) => raw
        .parse::<RefreshOrdering>()
        .map_err(|e| AppError::Config(format!("Invalid CART_REFRESH_ORDERING: {}", e)))?,
      None => RefreshOrdering::default(),
    };

    let defaults = SessionLimits::default();
    let idle_ttl = match get_env("SESSION_IDLE_SECS") {
      Some(raw) => Duration::from_secs(
        raw
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid SESSION_IDLE_SECS: {}", e)))?,
      ),
      None => defaults.idle_ttl,
    };
    let max_sessions = match get_env("MAX_CART_SESSIONS") {
      Some(raw) => raw
        .parse::<usize>()
        .map_err(|e| AppError::Config(format!("Invalid MAX_CART_SESSIONS: {}", e)))?,
      None => defaults.max_sessions,
    };
    if max_sessions == 0 {
      return Err(AppError::Config("MAX_CART_SESSIONS must be at least 1".to_string()));
    }

    tracing::info!(
      server_host = %server_host,
      server_port,
      persistent = database_url.is_some(),
      seed_db,
      ?refresh_ordering,
      session_idle_secs = idle_ttl.as_secs(),
      max_sessions,
      "Application configuration loaded."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      seed_db,
      cart: CartConfig { refresh_ordering },
      sessions: SessionLimits { idle_ttl, max_sessions },
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
