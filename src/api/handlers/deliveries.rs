//! Delivery endpoints and their per-step, per-goal and per-iteration lists.

use crate::{
    api::{
        AppState,
        auth::AuthUser,
        models::{DeliveryPayload, DeliveryView},
    },
    core::delivery,
    entities::delivery::Model,
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

fn views(deliveries: Vec<Model>) -> Json<Vec<DeliveryView>> {
    Json(deliveries.into_iter().map(DeliveryView::from).collect())
}

/// `GET /delivery/`
pub async fn list_deliveries(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<DeliveryView>>> {
    Ok(views(delivery::list_deliveries(&state.db, user.user_id).await?))
}

/// `GET /delivery/step/:step/`
pub async fn list_deliveries_by_step(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    step_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<DeliveryView>>> {
    let Path(step_id) = step_id?;
    Ok(views(
        delivery::list_deliveries_by_step(&state.db, user.user_id, step_id).await?,
    ))
}

/// `GET /delivery/goal/:goal/`: deliveries across every step of the goal.
pub async fn list_deliveries_by_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    goal_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<DeliveryView>>> {
    let Path(goal_id) = goal_id?;
    Ok(views(
        delivery::list_deliveries_by_goal(&state.db, user.user_id, goal_id).await?,
    ))
}

/// `GET /delivery/iteration/:iteration/`
pub async fn list_deliveries_by_iteration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    iteration_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<DeliveryView>>> {
    let Path(iteration_id) = iteration_id?;
    Ok(views(
        delivery::list_deliveries_by_iteration(&state.db, user.user_id, iteration_id).await?,
    ))
}

/// `POST /delivery/`
pub async fn create_delivery(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DeliveryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<DeliveryView>)> {
    let Json(payload) = payload?;
    let delivery = delivery::create_delivery(&state.db, payload.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(delivery.into())))
}

/// `GET /delivery/:id/`
pub async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<DeliveryView>> {
    let Path(id) = id?;
    let delivery = delivery::get_delivery_for_user(&state.db, user.user_id, id).await?;
    Ok(Json(delivery.into()))
}

/// `PUT /delivery/:id/`: full replace.
pub async fn update_delivery(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<DeliveryPayload>, JsonRejection>,
) -> Result<Json<DeliveryView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let delivery =
        delivery::update_delivery(&state.db, user.user_id, id, payload.into_input()?).await?;
    Ok(Json(delivery.into()))
}

/// `DELETE /delivery/:id/`
pub async fn delete_delivery(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    delivery::delete_delivery(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
