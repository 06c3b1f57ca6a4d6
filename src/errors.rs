//! Unified error type for the service.
//!
//! Every fallible operation returns [`Result`]. The HTTP layer turns each
//! variant into a status code (see `api::error`).

use sea_orm::DbErr;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to the list of messages explaining why it was rejected.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// All errors that can occur in the service
#[derive(Debug, Error)]
pub enum Error {
    /// No credential, or one that does not match any issued token
    #[error("Authentication credentials were not provided or are invalid")]
    AuthenticationRequired,

    /// The requester is authenticated but does not own the entity
    #[error("You do not have permission to perform this action")]
    AuthorizationDenied,

    /// One or more request fields failed validation
    #[error("Validation failed on {} field(s)", .errors.len())]
    Validation {
        /// Messages keyed by field name
        errors: FieldErrors,
    },

    /// No row with this id exists
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"need"`
        entity: &'static str,
        /// Requested primary key
        id: i64,
    },

    /// A path segment that should be an id is not one (`/need/abc/`)
    #[error("Not found: {message}")]
    InvalidId {
        /// Why the segment was rejected
        message: String,
    },

    /// The requester has no incomplete iteration
    #[error("No active iteration")]
    NoActiveIteration,

    /// A row references a parent that no longer exists
    #[error("{entity} {id} references missing {parent}")]
    BrokenOwnership {
        /// Entity whose chain is broken
        entity: &'static str,
        /// Its primary key
        id: i64,
        /// The parent kind that could not be loaded
        parent: &'static str,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Password hashing or verification failed for reasons other than a mismatch
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Underlying argon2 error
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O error (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a validation error for a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        Self::Validation { errors }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
