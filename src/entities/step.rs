//! Step entity - A sub-task of a goal.
//!
//! The `completed` flag is set by the user and is independent of the
//! percentage derived from the step's deliveries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Step database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "steps")]
pub struct Model {
    /// Unique identifier for the step
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short label
    pub name: String,
    /// Free-form description, empty by default
    pub description: String,
    /// Whether the user marked this step as done
    pub completed: bool,
    /// Goal this step belongs to
    pub goal_id: i64,
}

/// Defines relationships between Step and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each step belongs to one goal
    #[sea_orm(
        belongs_to = "super::goal::Entity",
        from = "Column::GoalId",
        to = "super::goal::Column::Id",
        on_delete = "Cascade"
    )]
    Goal,
    /// One step has many deliveries
    #[sea_orm(has_many = "super::delivery::Entity")]
    Deliveries,
}

impl Related<super::goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl Related<super::delivery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliveries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
