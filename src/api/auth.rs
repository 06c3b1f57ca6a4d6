//! Token authentication middleware.
//!
//! Reads `Authorization: Token <key>` (or `Bearer <key>`), resolves the key
//! to a user and injects [`AuthUser`] into the request extensions.

use super::AppState;
use crate::{core::account, errors::Error};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// The authenticated requester.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User primary key
    pub user_id: i64,
    /// Login name
    pub username: String,
}

fn token_from_header(value: &str) -> Option<&str> {
    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Rejects the request with 401 unless it carries a valid token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let key = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_header)
        .ok_or(Error::AuthenticationRequired)?
        .to_string();

    let user = account::authenticate(&state.db, &key).await?;
    debug!(user_id = user.id, "Authenticated request");

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        username: user.username,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_header() {
        assert_eq!(token_from_header("Token abc"), Some("abc"));
        assert_eq!(token_from_header("Bearer abc"), Some("abc"));
        assert_eq!(token_from_header("Token "), None);
        assert_eq!(token_from_header("Basic abc"), None);
        assert_eq!(token_from_header("abc"), None);
    }
}
