//! Owner resolution and the authorization gate.
//!
//! Needs and iterations name their owner directly. Goals, steps and deliveries
//! resolve it by walking their parent chain up to a need:
//! Delivery -> Step -> Goal -> Need -> User. Nothing is cached; every call
//! reads the current parent rows.

use crate::{
    entities::{Goal, Need, Step, delivery, goal, iteration, need, step},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::future::Future;

/// An entity whose owning user can be resolved.
pub trait Owned {
    /// Returns the id of the user this entity ultimately belongs to.
    ///
    /// # Errors
    /// Returns [`Error::BrokenOwnership`] if a parent row is missing.
    fn owner_id(&self, db: &DatabaseConnection) -> impl Future<Output = Result<i64>> + Send;
}

impl Owned for need::Model {
    async fn owner_id(&self, _db: &DatabaseConnection) -> Result<i64> {
        Ok(self.user_id)
    }
}

impl Owned for iteration::Model {
    async fn owner_id(&self, _db: &DatabaseConnection) -> Result<i64> {
        Ok(self.owner_id)
    }
}

impl Owned for goal::Model {
    async fn owner_id(&self, db: &DatabaseConnection) -> Result<i64> {
        let need = Need::find_by_id(self.need_id)
            .one(db)
            .await?
            .ok_or(Error::BrokenOwnership {
                entity: "goal",
                id: self.id,
                parent: "need",
            })?;
        need.owner_id(db).await
    }
}

impl Owned for step::Model {
    async fn owner_id(&self, db: &DatabaseConnection) -> Result<i64> {
        let goal = Goal::find_by_id(self.goal_id)
            .one(db)
            .await?
            .ok_or(Error::BrokenOwnership {
                entity: "step",
                id: self.id,
                parent: "goal",
            })?;
        goal.owner_id(db).await
    }
}

impl Owned for delivery::Model {
    async fn owner_id(&self, db: &DatabaseConnection) -> Result<i64> {
        let step = Step::find_by_id(self.step_id)
            .one(db)
            .await?
            .ok_or(Error::BrokenOwnership {
                entity: "delivery",
                id: self.id,
                parent: "step",
            })?;
        step.owner_id(db).await
    }
}

/// Checks that `requester` owns `entity`.
///
/// # Errors
/// Returns [`Error::AuthorizationDenied`] when the resolved owner differs.
/// The error carries nothing about who the real owner is.
pub async fn authorize<T>(db: &DatabaseConnection, requester: i64, entity: &T) -> Result<()>
where
    T: Owned + Sync,
{
    if entity.owner_id(db).await? == requester {
        Ok(())
    } else {
        Err(Error::AuthorizationDenied)
    }
}
