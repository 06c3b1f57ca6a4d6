//! Step business logic - sub-tasks of a goal.

use crate::{
    core::{
        ownership::authorize,
        validation::{DESCRIPTION_MAX, STEP_NAME_MAX, Validator},
    },
    entities::{Delivery, Goal, Step, delivery, goal, need, step},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

/// Writable fields of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInput {
    /// Name, at most 30 characters
    pub name: String,
    /// Description, at most 80 characters
    pub description: String,
    /// User-set completion flag
    pub completed: bool,
    /// Parent goal; must exist
    pub goal_id: i64,
}

impl StepInput {
    async fn validate<C: ConnectionTrait>(&self, db: &C) -> Result<()> {
        let mut v = Validator::new();
        v.not_blank("name", &self.name)
            .max_chars("name", &self.name, STEP_NAME_MAX)
            .max_chars("description", &self.description, DESCRIPTION_MAX);
        if Goal::find_by_id(self.goal_id).one(db).await?.is_none() {
            v.missing_reference("goal", self.goal_id);
        }
        v.finish()
    }
}

/// Creates a step under an existing goal.
pub async fn create_step<C>(db: &C, input: StepInput) -> Result<step::Model>
where
    C: ConnectionTrait,
{
    input.validate(db).await?;

    let step = step::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        completed: Set(input.completed),
        goal_id: Set(input.goal_id),
        ..Default::default()
    };

    let result = step.insert(db).await?;
    debug!(step_id = result.id, goal_id = result.goal_id, "Created step");
    Ok(result)
}

async fn list_where(
    db: &DatabaseConnection,
    user_id: i64,
    goal_id: Option<i64>,
) -> Result<Vec<step::Model>> {
    let mut query = Step::find()
        .join(JoinType::InnerJoin, step::Relation::Goal.def())
        .join(JoinType::InnerJoin, goal::Relation::Need.def())
        .filter(need::Column::UserId.eq(user_id));
    if let Some(goal_id) = goal_id {
        query = query.filter(step::Column::GoalId.eq(goal_id));
    }
    query
        .order_by_asc(step::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every step whose goal belongs to one of the requester's needs.
pub async fn list_steps(db: &DatabaseConnection, user_id: i64) -> Result<Vec<step::Model>> {
    list_where(db, user_id, None).await
}

/// Lists the requester's steps under one goal.
pub async fn list_steps_by_goal(
    db: &DatabaseConnection,
    user_id: i64,
    goal_id: i64,
) -> Result<Vec<step::Model>> {
    list_where(db, user_id, Some(goal_id)).await
}

/// Loads a step and checks that `user_id` owns it.
///
/// # Errors
/// - [`Error::NotFound`] if no step has this id
/// - [`Error::AuthorizationDenied`] if it resolves to another user
pub async fn get_step_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    step_id: i64,
) -> Result<step::Model> {
    let step = Step::find_by_id(step_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "step",
            id: step_id,
        })?;
    authorize(db, user_id, &step).await?;
    Ok(step)
}

/// Replaces every writable field of a step.
pub async fn update_step(
    db: &DatabaseConnection,
    user_id: i64,
    step_id: i64,
    input: StepInput,
) -> Result<step::Model> {
    let existing = get_step_for_user(db, user_id, step_id).await?;
    input.validate(db).await?;

    let mut step: step::ActiveModel = existing.into();
    step.name = Set(input.name);
    step.description = Set(input.description);
    step.completed = Set(input.completed);
    step.goal_id = Set(input.goal_id);
    step.update(db).await.map_err(Into::into)
}

/// Deletes a step with its deliveries.
#[instrument(skip(db))]
pub async fn delete_step(db: &DatabaseConnection, user_id: i64, step_id: i64) -> Result<()> {
    let step = get_step_for_user(db, user_id, step_id).await?;

    let txn = db.begin().await?;
    Delivery::delete_many()
        .filter(delivery::Column::StepId.eq(step.id))
        .exec(&txn)
        .await?;
    Step::delete_by_id(step.id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted step and its deliveries");
    Ok(())
}
