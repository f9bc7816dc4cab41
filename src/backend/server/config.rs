/**
 * Server Configuration
 *
 * Loads server settings from environment variables (optionally from `.env`
 * via `dotenv`, done by the binary before calling `from_env`).
 *
 * # Variables
 *
 * - `DATABASE_URL` - PostgreSQL connection string (optional; without it the
 *   data routes answer 503)
 * - `SERVER_PORT` - listen port (default 3000)
 * - `JWT_SECRET` - HMAC secret for bearer tokens (required)
 *
 * `RUST_LOG` is read by the binary when installing the subscriber.
 */

use sqlx::PgPool;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Settings the server is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                builder = builder.database_url(url);
            }
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            let port = port.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "SERVER_PORT",
                message: e.to_string(),
            })?;
            builder = builder.port(port);
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }

        builder.build()
    }
}

/// Builder for [`ServerConfig`]
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    port: Option<u16>,
    jwt_secret: Option<String>,
}

impl ServerConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let jwt_secret = self
            .jwt_secret
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(ServerConfig {
            database_url: self.database_url,
            port: self.port.unwrap_or(DEFAULT_PORT),
            jwt_secret,
        })
    }
}

/// Connect to PostgreSQL and run migrations
///
/// Returns `None` when no URL is configured or the connection fails. The
/// server keeps running and the data routes answer 503.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let database_url = match database_url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Data routes will answer 503.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!().run(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        return None;
    }
    tracing::info!("Database ready");

    Some(pool)
}
