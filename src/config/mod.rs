/// Database connection and table creation
pub mod database;

/// Server settings read from the environment
pub mod server;

/// Starter data for the new-account wizard, loaded from `starter.toml`
pub mod starter;

pub use server::ServerConfig;
pub use starter::StarterConfig;
