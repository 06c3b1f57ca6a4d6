//! Accounts and token authentication.
//!
//! Registration creates a user and issues its token; login returns the same
//! token for as long as it exists. Logout deletes it, so the next login
//! issues a fresh one. Passwords are stored as Argon2id PHC strings.

use crate::{
    core::validation::{PASSWORD_MIN, USERNAME_MAX, Validator},
    entities::{AuthToken, User, auth_token, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Fields accepted by the registration endpoint.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Unique login name
    pub username: String,
    /// Optional contact email
    pub email: String,
    /// Password
    pub password1: String,
    /// Password confirmation, must equal `password1`
    pub password2: String,
}

/// Hashes a password with Argon2id and a random salt.
///
/// # Errors
/// Returns [`Error::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Checks `password` against a stored PHC hash.
///
/// # Errors
/// Returns [`Error::PasswordHash`] if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::PasswordHash {
        message: e.to_string(),
    })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::PasswordHash {
            message: e.to_string(),
        }),
    }
}

/// 40 lowercase hex characters.
fn generate_key() -> String {
    let a = Uuid::new_v4().simple().to_string();
    let b = Uuid::new_v4().simple().to_string();
    format!("{a}{}", &b[..8])
}

/// Returns the user's token, issuing one if they have none.
async fn token_for<C>(db: &C, user_id: i64) -> Result<String>
where
    C: sea_orm::ConnectionTrait,
{
    if let Some(token) = AuthToken::find()
        .filter(auth_token::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(token.key);
    }

    let token = auth_token::ActiveModel {
        key: Set(generate_key()),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(token.key)
}

/// Reports a lost race on the unique username as the usual field error.
fn insert_user_error(err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::field("username", USERNAME_TAKEN),
        _ => err.into(),
    }
}

/// Creates an account and returns its token key.
///
/// # Errors
/// Returns a validation error if the username is blank, too long or taken,
/// or if the passwords are too short or differ.
#[instrument(skip(db, registration), fields(username = %registration.username))]
pub async fn register(db: &DatabaseConnection, registration: Registration) -> Result<String> {
    let mut v = Validator::new();
    v.not_blank("username", &registration.username)
        .max_chars("username", &registration.username, USERNAME_MAX)
        .min_chars("password1", &registration.password1, PASSWORD_MIN);
    if registration.password1 != registration.password2 {
        v.add("non_field_errors", "The two password fields didn't match.");
    }
    if User::find()
        .filter(user::Column::Username.eq(registration.username.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        v.add("username", USERNAME_TAKEN);
    }
    v.finish()?;

    let password_hash = hash_password(&registration.password1)?;

    let txn = db.begin().await?;
    let user = user::ActiveModel {
        username: Set(registration.username),
        email: Set(registration.email),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(insert_user_error)?;
    let key = token_for(&txn, user.id).await?;
    txn.commit().await?;

    info!(user_id = user.id, "Registered user");
    Ok(key)
}

/// Checks credentials and returns the user's token key.
///
/// # Errors
/// Returns a validation error on unknown user or wrong password; the message
/// does not say which.
#[instrument(skip(db, password))]
pub async fn login(db: &DatabaseConnection, username: &str, password: &str) -> Result<String> {
    let rejected = || Error::field("non_field_errors", "Unable to log in with provided credentials.");

    let Some(user) = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        warn!("Login attempt for unknown user");
        return Err(rejected());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(rejected());
    }

    token_for(db, user.id).await
}

/// Resolves a token key to its user.
///
/// # Errors
/// Returns [`Error::AuthenticationRequired`] if no token has this key.
pub async fn authenticate(db: &DatabaseConnection, key: &str) -> Result<user::Model> {
    let (_, user) = AuthToken::find_by_id(key.to_string())
        .find_also_related(User)
        .one(db)
        .await?
        .ok_or(Error::AuthenticationRequired)?;
    user.ok_or(Error::AuthenticationRequired)
}

/// Revokes the user's token.
pub async fn logout(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    AuthToken::delete_many()
        .filter(auth_token::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    info!(user_id, "Logged out");
    Ok(())
}
