//! Goal entity - A dated objective under a need.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Goal database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    /// Unique identifier for the goal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short label
    pub name: String,
    /// Free-form description, empty by default
    pub description: String,
    /// Due date; defaults to the day the goal was created
    pub end_date: Date,
    /// Need this goal serves
    pub need_id: i64,
}

/// Defines relationships between Goal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each goal belongs to one need
    #[sea_orm(
        belongs_to = "super::need::Entity",
        from = "Column::NeedId",
        to = "super::need::Column::Id",
        on_delete = "Cascade"
    )]
    Need,
    /// One goal has many steps
    #[sea_orm(has_many = "super::step::Entity")]
    Steps,
}

impl Related<super::need::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Need.def()
    }
}

impl Related<super::step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
