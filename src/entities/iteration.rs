//! Iteration entity - A user-scoped time-box (sprint).
//!
//! Iterations are owned directly by a user and sit outside the
//! need/goal/step chain.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Iteration database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "iterations")]
pub struct Model {
    /// Unique identifier for the iteration
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sequence number chosen by the user; not unique
    pub number: i32,
    /// Whether the iteration is closed
    pub completed: bool,
    /// Start date; defaults to the day the iteration was created
    pub date: Date,
    /// Owning user
    pub owner_id: i64,
}

/// Defines relationships between Iteration and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each iteration belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    /// One iteration groups many deliveries
    #[sea_orm(has_many = "super::delivery::Entity")]
    Deliveries,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::delivery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliveries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
