//! Database configuration module for `needs-tracker`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs, including the cascading foreign keys declared on each relation.

use crate::entities::{AuthToken, Delivery, Goal, Iteration, Need, Step, User};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::TableCreateStatement,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default location of the `SQLite` file when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/needs_tracker.sqlite?mode=rwc";

/// Creates the directory holding a file-backed `SQLite` database.
///
/// `sqlx` creates the file itself (`mode=rwc`) but not its parent directory.
/// In-memory and non-`SQLite` URLs are left alone.
pub fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = Path::new(rest.split('?').next().unwrap_or(rest));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
        debug!(dir = %parent.display(), "Ensured database directory");
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    schema.create_table_from_entity(entity).if_not_exists().to_owned()
}

/// Creates all tables that do not exist yet.
///
/// Parents are created before children so the foreign keys always point at
/// an existing table.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        table_for(&schema, User),
        table_for(&schema, AuthToken),
        table_for(&schema, Need),
        table_for(&schema, Goal),
        table_for(&schema, Step),
        table_for(&schema, Iteration),
        table_for(&schema, Delivery),
    ];

    for table in &tables {
        db.execute(builder.build(table)).await?;
    }
    info!("Database tables ensured");

    Ok(())
}
