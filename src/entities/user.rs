//! User entity - An account that owns needs and iterations.
//!
//! Users sign up through the registration endpoint and authenticate with an
//! opaque token stored in [`super::auth_token`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the system
    #[sea_orm(unique)]
    pub username: String,
    /// Contact email, may be empty
    pub email: String,
    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many needs
    #[sea_orm(has_many = "super::need::Entity")]
    Needs,
    /// One user owns many iterations
    #[sea_orm(has_many = "super::iteration::Entity")]
    Iterations,
    /// One user has at most one auth token
    #[sea_orm(has_one = "super::auth_token::Entity")]
    AuthToken,
}

impl Related<super::need::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Needs.def()
    }
}

impl Related<super::iteration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Iterations.def()
    }
}

impl Related<super::auth_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
