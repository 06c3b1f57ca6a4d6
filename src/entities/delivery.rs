//! Delivery entity - A concrete unit of work binding a step to an iteration.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    /// Unique identifier for the delivery
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short label
    pub name: String,
    /// Free-form description, empty by default
    pub description: String,
    /// Whether the work was delivered
    pub completed: bool,
    /// Step this delivery contributes to
    pub step_id: i64,
    /// Iteration the work is scheduled in, if any
    pub iteration_id: Option<i64>,
}

/// Defines relationships between Delivery and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each delivery belongs to one step
    #[sea_orm(
        belongs_to = "super::step::Entity",
        from = "Column::StepId",
        to = "super::step::Column::Id",
        on_delete = "Cascade"
    )]
    Step,
    /// A delivery is optionally scheduled in one iteration
    #[sea_orm(
        belongs_to = "super::iteration::Entity",
        from = "Column::IterationId",
        to = "super::iteration::Column::Id",
        on_delete = "Cascade"
    )]
    Iteration,
}

impl Related<super::step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Step.def()
    }
}

impl Related<super::iteration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Iteration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
