//! Iteration business logic - user-owned time-boxes.

use crate::{
    core::ownership::authorize,
    entities::{Delivery, Iteration, delivery, iteration},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

/// Writable fields of an iteration. The owner is always the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationInput {
    /// Sequence number
    pub number: i32,
    /// Whether the iteration is closed
    pub completed: bool,
    /// Start date
    pub date: NaiveDate,
}

/// Creates an iteration owned by `user_id`.
pub async fn create_iteration<C>(
    db: &C,
    user_id: i64,
    input: IterationInput,
) -> Result<iteration::Model>
where
    C: ConnectionTrait,
{
    let iteration = iteration::ActiveModel {
        number: Set(input.number),
        completed: Set(input.completed),
        date: Set(input.date),
        owner_id: Set(user_id),
        ..Default::default()
    };

    let result = iteration.insert(db).await?;
    debug!(iteration_id = result.id, user_id, "Created iteration");
    Ok(result)
}

/// Lists the requester's iterations, oldest first.
pub async fn list_iterations(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<iteration::Model>> {
    Iteration::find()
        .filter(iteration::Column::OwnerId.eq(user_id))
        .order_by_asc(iteration::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the requester's current iteration: the incomplete one with the
/// highest number, the most recently created winning ties.
///
/// # Errors
/// Returns [`Error::NoActiveIteration`] if every iteration is completed.
pub async fn get_active_iteration<C>(db: &C, user_id: i64) -> Result<iteration::Model>
where
    C: ConnectionTrait,
{
    Iteration::find()
        .filter(iteration::Column::OwnerId.eq(user_id))
        .filter(iteration::Column::Completed.eq(false))
        .order_by_desc(iteration::Column::Number)
        .order_by_desc(iteration::Column::Id)
        .one(db)
        .await?
        .ok_or(Error::NoActiveIteration)
}

/// Loads an iteration and checks that `user_id` owns it.
pub async fn get_iteration_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    iteration_id: i64,
) -> Result<iteration::Model> {
    let iteration = Iteration::find_by_id(iteration_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "iteration",
            id: iteration_id,
        })?;
    authorize(db, user_id, &iteration).await?;
    Ok(iteration)
}

/// Replaces number, completion flag and date. Ownership never changes.
pub async fn update_iteration(
    db: &DatabaseConnection,
    user_id: i64,
    iteration_id: i64,
    input: IterationInput,
) -> Result<iteration::Model> {
    let existing = get_iteration_for_user(db, user_id, iteration_id).await?;

    let mut iteration: iteration::ActiveModel = existing.into();
    iteration.number = Set(input.number);
    iteration.completed = Set(input.completed);
    iteration.date = Set(input.date);
    iteration.update(db).await.map_err(Into::into)
}

/// Deletes an iteration and every delivery scheduled in it.
#[instrument(skip(db))]
pub async fn delete_iteration(
    db: &DatabaseConnection,
    user_id: i64,
    iteration_id: i64,
) -> Result<()> {
    let iteration = get_iteration_for_user(db, user_id, iteration_id).await?;

    let txn = db.begin().await?;
    Delivery::delete_many()
        .filter(delivery::Column::IterationId.eq(iteration.id))
        .exec(&txn)
        .await?;
    Iteration::delete_by_id(iteration.id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted iteration and its deliveries");
    Ok(())
}
