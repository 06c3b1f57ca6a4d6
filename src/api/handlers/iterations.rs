//! Iteration endpoints, including the requester's active iteration.

use crate::{
    api::{
        AppState,
        auth::AuthUser,
        models::{IterationPayload, IterationView},
    },
    core::iteration,
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

/// `GET /iteration/`
pub async fn list_iterations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<IterationView>>> {
    let iterations = iteration::list_iterations(&state.db, user.user_id).await?;
    Ok(Json(iterations.into_iter().map(IterationView::from).collect()))
}

/// `GET /iteration/active/`
pub async fn active_iteration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<IterationView>> {
    let iteration = iteration::get_active_iteration(&state.db, user.user_id).await?;
    Ok(Json(iteration.into()))
}

/// `POST /iteration/`: the owner is always the requester.
pub async fn create_iteration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<IterationPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<IterationView>)> {
    let Json(payload) = payload?;
    let iteration =
        iteration::create_iteration(&state.db, user.user_id, payload.into_input()).await?;
    Ok((StatusCode::CREATED, Json(iteration.into())))
}

/// `GET /iteration/:id/`
pub async fn get_iteration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<IterationView>> {
    let Path(id) = id?;
    let iteration = iteration::get_iteration_for_user(&state.db, user.user_id, id).await?;
    Ok(Json(iteration.into()))
}

/// `PUT /iteration/:id/`: full replace; the owner never changes.
pub async fn update_iteration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<IterationPayload>, JsonRejection>,
) -> Result<Json<IterationView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let iteration =
        iteration::update_iteration(&state.db, user.user_id, id, payload.into_input()).await?;
    Ok(Json(iteration.into()))
}

/// `DELETE /iteration/:id/`: removes the iteration and the deliveries scheduled in it.
pub async fn delete_iteration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    iteration::delete_iteration(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
