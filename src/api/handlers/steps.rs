//! Step endpoints. Every step in a response carries `percentageCompleted`,
//! recomputed from its deliveries.

use crate::{
    api::{
        AppState,
        auth::AuthUser,
        models::{StepPayload, StepView},
    },
    core::{progress::percentage_completed, step},
    entities::step::Model,
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
use sea_orm::DatabaseConnection;
use std::sync::Arc;

async fn view(db: &DatabaseConnection, step: Model) -> Result<StepView> {
    let percentage = percentage_completed(db, step.id).await?;
    Ok(StepView::new(step, percentage))
}

async fn views(db: &DatabaseConnection, steps: Vec<Model>) -> Result<Vec<StepView>> {
    let mut out = Vec::with_capacity(steps.len());
    for step in steps {
        out.push(view(db, step).await?);
    }
    Ok(out)
}

/// `GET /step/`
pub async fn list_steps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<StepView>>> {
    let steps = step::list_steps(&state.db, user.user_id).await?;
    Ok(Json(views(&state.db, steps).await?))
}

/// `GET /step/goal/:goal/`
pub async fn list_steps_by_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    goal_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<StepView>>> {
    let Path(goal_id) = goal_id?;
    let steps = step::list_steps_by_goal(&state.db, user.user_id, goal_id).await?;
    Ok(Json(views(&state.db, steps).await?))
}

/// `POST /step/`
pub async fn create_step(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<StepPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<StepView>)> {
    let Json(payload) = payload?;
    let step = step::create_step(&state.db, payload.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(view(&state.db, step).await?)))
}

/// `GET /step/:id/`
pub async fn get_step(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<StepView>> {
    let Path(id) = id?;
    let step = step::get_step_for_user(&state.db, user.user_id, id).await?;
    Ok(Json(view(&state.db, step).await?))
}

/// `PUT /step/:id/`: full replace.
pub async fn update_step(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<StepPayload>, JsonRejection>,
) -> Result<Json<StepView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let step = step::update_step(&state.db, user.user_id, id, payload.into_input()?).await?;
    Ok(Json(view(&state.db, step).await?))
}

/// `DELETE /step/:id/`: removes the step and its deliveries.
pub async fn delete_step(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    step::delete_step(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
