//! Auth token entity - Opaque API key presented as `Authorization: Token <key>`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Auth token database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_tokens")]
pub struct Model {
    /// The token itself, 40 lowercase hex characters
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Owner of the token; a user holds a single token
    #[sea_orm(unique)]
    pub user_id: i64,
    /// When the token was issued
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Token belongs to a user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
