//! Delivery business logic - units of work binding a step to an iteration.
//!
//! A delivery's owner is the owner of its step's goal's need. The iteration
//! is only a schedule and plays no part in ownership.

use crate::{
    core::{
        ownership::authorize,
        validation::{DELIVERY_DESCRIPTION_MAX, DELIVERY_NAME_MAX, Validator},
    },
    entities::{Delivery, Iteration, Step, delivery, goal, need, step},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use tracing::{debug, instrument};

/// Writable fields of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryInput {
    /// Name, at most 60 characters
    pub name: String,
    /// Description, at most 100 characters
    pub description: String,
    /// Whether the work was delivered
    pub completed: bool,
    /// Step this delivery contributes to; must exist
    pub step_id: i64,
    /// Iteration it is scheduled in; must exist when given
    pub iteration_id: Option<i64>,
}

impl DeliveryInput {
    async fn validate<C: ConnectionTrait>(&self, db: &C) -> Result<()> {
        let mut v = Validator::new();
        v.not_blank("name", &self.name)
            .max_chars("name", &self.name, DELIVERY_NAME_MAX)
            .max_chars("description", &self.description, DELIVERY_DESCRIPTION_MAX);
        if Step::find_by_id(self.step_id).one(db).await?.is_none() {
            v.missing_reference("step", self.step_id);
        }
        if let Some(iteration_id) = self.iteration_id {
            if Iteration::find_by_id(iteration_id).one(db).await?.is_none() {
                v.missing_reference("iteration", iteration_id);
            }
        }
        v.finish()
    }
}

/// Creates a delivery under an existing step.
pub async fn create_delivery<C>(db: &C, input: DeliveryInput) -> Result<delivery::Model>
where
    C: ConnectionTrait,
{
    input.validate(db).await?;

    let delivery = delivery::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        completed: Set(input.completed),
        step_id: Set(input.step_id),
        iteration_id: Set(input.iteration_id),
        ..Default::default()
    };

    let result = delivery.insert(db).await?;
    debug!(delivery_id = result.id, step_id = result.step_id, "Created delivery");
    Ok(result)
}

/// Deliveries whose step chain ends at `user_id`.
fn owned_by(user_id: i64) -> Select<Delivery> {
    Delivery::find()
        .join(JoinType::InnerJoin, delivery::Relation::Step.def())
        .join(JoinType::InnerJoin, step::Relation::Goal.def())
        .join(JoinType::InnerJoin, goal::Relation::Need.def())
        .filter(need::Column::UserId.eq(user_id))
        .order_by_asc(delivery::Column::Id)
}

/// Lists all of the requester's deliveries.
pub async fn list_deliveries(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<delivery::Model>> {
    owned_by(user_id).all(db).await.map_err(Into::into)
}

/// Lists the requester's deliveries for one step.
pub async fn list_deliveries_by_step(
    db: &DatabaseConnection,
    user_id: i64,
    step_id: i64,
) -> Result<Vec<delivery::Model>> {
    owned_by(user_id)
        .filter(delivery::Column::StepId.eq(step_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the requester's deliveries across every step of one goal.
pub async fn list_deliveries_by_goal(
    db: &DatabaseConnection,
    user_id: i64,
    goal_id: i64,
) -> Result<Vec<delivery::Model>> {
    owned_by(user_id)
        .filter(step::Column::GoalId.eq(goal_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the requester's deliveries scheduled in one iteration.
pub async fn list_deliveries_by_iteration(
    db: &DatabaseConnection,
    user_id: i64,
    iteration_id: i64,
) -> Result<Vec<delivery::Model>> {
    owned_by(user_id)
        .filter(delivery::Column::IterationId.eq(iteration_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a delivery and checks that `user_id` owns it.
///
/// # Errors
/// - [`Error::NotFound`] if no delivery has this id
/// - [`Error::AuthorizationDenied`] if it resolves to another user
pub async fn get_delivery_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    delivery_id: i64,
) -> Result<delivery::Model> {
    let delivery = Delivery::find_by_id(delivery_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "delivery",
            id: delivery_id,
        })?;
    authorize(db, user_id, &delivery).await?;
    Ok(delivery)
}

/// Replaces every writable field of a delivery.
pub async fn update_delivery(
    db: &DatabaseConnection,
    user_id: i64,
    delivery_id: i64,
    input: DeliveryInput,
) -> Result<delivery::Model> {
    let existing = get_delivery_for_user(db, user_id, delivery_id).await?;
    input.validate(db).await?;

    let mut delivery: delivery::ActiveModel = existing.into();
    delivery.name = Set(input.name);
    delivery.description = Set(input.description);
    delivery.completed = Set(input.completed);
    delivery.step_id = Set(input.step_id);
    delivery.iteration_id = Set(input.iteration_id);
    delivery.update(db).await.map_err(Into::into)
}

/// Deletes a single delivery.
#[instrument(skip(db))]
pub async fn delete_delivery(
    db: &DatabaseConnection,
    user_id: i64,
    delivery_id: i64,
) -> Result<()> {
    let delivery = get_delivery_for_user(db, user_id, delivery_id).await?;
    Delivery::delete_by_id(delivery.id).exec(db).await?;
    Ok(())
}
