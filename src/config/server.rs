//! Server settings loaded from environment variables.
//!
//! `.env` is read by `main` before this runs, so values there apply too.

use crate::errors::{Error, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

use super::database;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Default location of the wizard starter file
pub const DEFAULT_STARTER_CONFIG: &str = "starter.toml";

/// Runtime configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to (`BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// `SeaORM` connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Whether to answer CORS preflights permissively (`ENABLE_CORS`)
    pub enable_cors: bool,
    /// Optional TOML file describing the wizard starter set (`STARTER_CONFIG`)
    pub starter_config: PathBuf,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `BIND_ADDR` or `ENABLE_CORS` cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch
    /// the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid BIND_ADDR: {e}"),
            })?;

        let enable_cors = match lookup("ENABLE_CORS") {
            None => true,
            Some(raw) => parse_flag(&raw).ok_or_else(|| Error::Config {
                message: format!("Invalid ENABLE_CORS value: {raw}"),
            })?,
        };

        Ok(Self {
            bind_addr,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| database::DEFAULT_DATABASE_URL.to_string()),
            enable_cors,
            starter_config: lookup("STARTER_CONFIG")
                .map_or_else(|| PathBuf::from(DEFAULT_STARTER_CONFIG), PathBuf::from),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
