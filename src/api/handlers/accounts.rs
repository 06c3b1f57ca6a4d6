//! Registration, login, logout and health.

use crate::{
    api::{
        AppState,
        auth::AuthUser,
        models::{
            DetailResponse, HealthResponse, KeyResponse, LoginRequest, RegistrationRequest,
        },
    },
    core::account,
    errors::Result,
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

/// `POST /auth/registration/`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<KeyResponse>)> {
    let Json(payload) = payload?;
    let key = account::register(&state.db, payload.into_registration()?).await?;
    Ok((StatusCode::CREATED, Json(KeyResponse { key })))
}

/// `POST /auth/login/`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<KeyResponse>> {
    let Json(payload) = payload?;
    let (username, password) = payload.into_credentials()?;
    let key = account::login(&state.db, &username, &password).await?;
    Ok(Json(KeyResponse { key }))
}

/// `POST /auth/logout/`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DetailResponse>> {
    account::logout(&state.db, user.user_id).await?;
    Ok(Json(DetailResponse {
        detail: "Successfully logged out.".to_string(),
    }))
}

/// `GET /health/`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
