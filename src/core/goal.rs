//! Goal business logic - dated objectives under a need.
//!
//! Goals do not name their owner; it is resolved through the parent need.
//! Listing joins on the need to keep only the requester's rows.

use crate::{
    core::{
        ownership::authorize,
        validation::{DESCRIPTION_MAX, GOAL_NAME_MAX, Validator},
    },
    entities::{Delivery, Goal, Need, Step, delivery, goal, need, step},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

/// Writable fields of a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalInput {
    /// Name, at most 50 characters
    pub name: String,
    /// Description, at most 80 characters
    pub description: String,
    /// Due date
    pub end_date: NaiveDate,
    /// Parent need; must exist
    pub need_id: i64,
}

impl GoalInput {
    async fn validate<C: ConnectionTrait>(&self, db: &C) -> Result<()> {
        let mut v = Validator::new();
        v.not_blank("name", &self.name)
            .max_chars("name", &self.name, GOAL_NAME_MAX)
            .max_chars("description", &self.description, DESCRIPTION_MAX);
        if Need::find_by_id(self.need_id).one(db).await?.is_none() {
            v.missing_reference("need", self.need_id);
        }
        v.finish()
    }
}

/// Creates a goal under an existing need.
///
/// # Errors
/// Returns a validation error if a field is invalid or the need does not exist.
pub async fn create_goal<C>(db: &C, input: GoalInput) -> Result<goal::Model>
where
    C: ConnectionTrait,
{
    input.validate(db).await?;

    let goal = goal::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        end_date: Set(input.end_date),
        need_id: Set(input.need_id),
        ..Default::default()
    };

    let result = goal.insert(db).await?;
    debug!(goal_id = result.id, need_id = result.need_id, "Created goal");
    Ok(result)
}

async fn list_where(
    db: &DatabaseConnection,
    user_id: i64,
    need_id: Option<i64>,
) -> Result<Vec<(goal::Model, need::Model)>> {
    let mut query = Goal::find()
        .find_also_related(Need)
        .filter(need::Column::UserId.eq(user_id));
    if let Some(need_id) = need_id {
        query = query.filter(goal::Column::NeedId.eq(need_id));
    }

    let rows = query.order_by_asc(goal::Column::Id).all(db).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(goal, need)| need.map(|need| (goal, need)))
        .collect())
}

/// Lists the requester's goals, each with its need.
pub async fn list_goals(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<(goal::Model, need::Model)>> {
    list_where(db, user_id, None).await
}

/// Lists the requester's goals under one need. A need owned by someone else
/// yields an empty list.
pub async fn list_goals_by_need(
    db: &DatabaseConnection,
    user_id: i64,
    need_id: i64,
) -> Result<Vec<(goal::Model, need::Model)>> {
    list_where(db, user_id, Some(need_id)).await
}

/// Loads a goal and checks that `user_id` owns it.
///
/// # Errors
/// - [`Error::NotFound`] if no goal has this id
/// - [`Error::AuthorizationDenied`] if it resolves to another user
pub async fn get_goal_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    goal_id: i64,
) -> Result<goal::Model> {
    let goal = Goal::find_by_id(goal_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "goal",
            id: goal_id,
        })?;
    authorize(db, user_id, &goal).await?;
    Ok(goal)
}

/// Like [`get_goal_for_user`], also returning the parent need.
pub async fn get_goal_with_need(
    db: &DatabaseConnection,
    user_id: i64,
    goal_id: i64,
) -> Result<(goal::Model, need::Model)> {
    let goal = get_goal_for_user(db, user_id, goal_id).await?;
    let need = Need::find_by_id(goal.need_id)
        .one(db)
        .await?
        .ok_or(Error::BrokenOwnership {
            entity: "goal",
            id: goal.id,
            parent: "need",
        })?;
    Ok((goal, need))
}

/// Replaces every writable field of a goal, possibly moving it to another need.
pub async fn update_goal(
    db: &DatabaseConnection,
    user_id: i64,
    goal_id: i64,
    input: GoalInput,
) -> Result<goal::Model> {
    let existing = get_goal_for_user(db, user_id, goal_id).await?;
    input.validate(db).await?;

    let mut goal: goal::ActiveModel = existing.into();
    goal.name = Set(input.name);
    goal.description = Set(input.description);
    goal.end_date = Set(input.end_date);
    goal.need_id = Set(input.need_id);
    goal.update(db).await.map_err(Into::into)
}

/// Deletes a goal with its steps and their deliveries.
#[instrument(skip(db))]
pub async fn delete_goal(db: &DatabaseConnection, user_id: i64, goal_id: i64) -> Result<()> {
    let goal = get_goal_for_user(db, user_id, goal_id).await?;

    let txn = db.begin().await?;
    let step_ids: Vec<i64> = Step::find()
        .select_only()
        .column(step::Column::Id)
        .filter(step::Column::GoalId.eq(goal.id))
        .into_tuple()
        .all(&txn)
        .await?;
    Delivery::delete_many()
        .filter(delivery::Column::StepId.is_in(step_ids))
        .exec(&txn)
        .await?;
    Step::delete_many()
        .filter(step::Column::GoalId.eq(goal.id))
        .exec(&txn)
        .await?;
    Goal::delete_by_id(goal.id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted goal and its descendants");
    Ok(())
}
