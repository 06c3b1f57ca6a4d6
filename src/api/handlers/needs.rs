//! Need endpoints.

use crate::{
    api::{
        AppState,
        auth::AuthUser,
        models::{NeedPayload, NeedView},
    },
    core::need,
    errors::Result,
};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;
use tracing::debug;

/// `GET /need/`: the requester's needs.
pub async fn list_needs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<NeedView>>> {
    debug!(user_id = user.user_id, "Listing needs");
    let needs = need::list_needs(&state.db, user.user_id).await?;
    Ok(Json(needs.into_iter().map(NeedView::from).collect()))
}

/// `POST /need/`: creates a need owned by the requester.
pub async fn create_need(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<NeedPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<NeedView>)> {
    let Json(payload) = payload?;
    let need = need::create_need(&state.db, user.user_id, payload.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(need.into())))
}

/// `GET /need/:id/`
pub async fn get_need(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<NeedView>> {
    let Path(id) = id?;
    let need = need::get_need_for_user(&state.db, user.user_id, id).await?;
    Ok(Json(need.into()))
}

/// `PUT /need/:id/`: full replace.
pub async fn update_need(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<NeedPayload>, JsonRejection>,
) -> Result<Json<NeedView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let need = need::update_need(&state.db, user.user_id, id, payload.into_input()?).await?;
    Ok(Json(need.into()))
}

/// `DELETE /need/:id/`: removes the need with its goals, steps and deliveries.
pub async fn delete_need(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    need::delete_need(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
