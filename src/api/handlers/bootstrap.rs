//! Account seeding endpoints. Both answer 200 with an empty body.

use crate::{
    api::{AppState, auth::AuthUser},
    core::bootstrap,
    errors::Result,
};
use axum::{Extension, extract::State, http::StatusCode};
use std::sync::Arc;

/// `POST /wizard/`
pub async fn wizard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    bootstrap::run_wizard(&state.db, user.user_id, &state.starter).await?;
    Ok(StatusCode::OK)
}

/// `POST /tutorial-setup/`
pub async fn tutorial_setup(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    bootstrap::run_tutorial_setup(&state.db, user.user_id).await?;
    Ok(StatusCode::OK)
}
