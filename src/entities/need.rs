//! Need entity - A top-level motivation owned directly by a user.
//!
//! Needs are the root of the ownership chain: goals, steps and deliveries all
//! resolve their owner by walking back up to a need.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Need database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "needs")]
pub struct Model {
    /// Unique identifier for the need
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short label (e.g., "Health", "Career")
    pub name: String,
    /// Free-form description, empty by default
    pub description: String,
    /// Icon class shown next to the need (e.g., `"far fa-heart"`)
    pub icon_name: String,
    /// Background color class for the icon (e.g., `"bg-red-500"`)
    pub icon_color: String,
    /// Owning user
    pub user_id: i64,
}

/// Defines relationships between Need and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each need belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One need has many goals
    #[sea_orm(has_many = "super::goal::Entity")]
    Goals,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
