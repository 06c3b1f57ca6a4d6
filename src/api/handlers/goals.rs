//! Goal endpoints. Reads embed the parent need; writes answer with its id.

use crate::{
    api::{
        AppState,
        auth::AuthUser,
        models::{GoalPayload, GoalReadView, GoalWriteView},
    },
    core::goal,
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

/// `GET /goal/`: the requester's goals with their needs embedded.
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<GoalReadView>>> {
    let goals = goal::list_goals(&state.db, user.user_id).await?;
    Ok(Json(goals.into_iter().map(GoalReadView::from).collect()))
}

/// `GET /goal/need/:need/`
pub async fn list_goals_by_need(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    need_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<GoalReadView>>> {
    let Path(need_id) = need_id?;
    let goals = goal::list_goals_by_need(&state.db, user.user_id, need_id).await?;
    Ok(Json(goals.into_iter().map(GoalReadView::from).collect()))
}

/// `POST /goal/`
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GoalPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalWriteView>)> {
    let Json(payload) = payload?;
    let goal = goal::create_goal(&state.db, payload.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(goal.into())))
}

/// `GET /goal/:id/`: embeds the parent need.
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<GoalReadView>> {
    let Path(id) = id?;
    let row = goal::get_goal_with_need(&state.db, user.user_id, id).await?;
    Ok(Json(row.into()))
}

/// `PUT /goal/:id/`: full replace, may move the goal to another need.
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<GoalPayload>, JsonRejection>,
) -> Result<Json<GoalWriteView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let goal = goal::update_goal(&state.db, user.user_id, id, payload.into_input()?).await?;
    Ok(Json(goal.into()))
}

/// `DELETE /goal/:id/`
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    goal::delete_goal(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
