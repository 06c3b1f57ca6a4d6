//! Need business logic - Handles all need-related operations.
//!
//! Needs are owned directly by a user. Listing filters on that owner; every
//! single-row operation goes through [`get_need_for_user`], which applies the
//! authorization gate.

use crate::{
    core::{
        ownership::authorize,
        validation::{DESCRIPTION_MAX, ICON_MAX, NEED_NAME_MAX, Validator},
    },
    entities::{Delivery, Goal, Need, Step, delivery, goal, need, step},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

/// Writable fields of a need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeedInput {
    /// Name, at most 30 characters
    pub name: String,
    /// Description, at most 80 characters
    pub description: String,
    /// Icon class, at most 50 characters
    pub icon_name: String,
    /// Icon color class, at most 50 characters
    pub icon_color: String,
}

impl NeedInput {
    fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.not_blank("name", &self.name)
            .max_chars("name", &self.name, NEED_NAME_MAX)
            .max_chars("description", &self.description, DESCRIPTION_MAX)
            .max_chars("iconName", &self.icon_name, ICON_MAX)
            .max_chars("iconColor", &self.icon_color, ICON_MAX);
        v.finish()
    }
}

/// Creates a need owned by `user_id`.
///
/// # Errors
/// Returns a validation error if a field is blank or too long.
pub async fn create_need<C>(db: &C, user_id: i64, input: NeedInput) -> Result<need::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;

    let need = need::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        icon_name: Set(input.icon_name),
        icon_color: Set(input.icon_color),
        user_id: Set(user_id),
        ..Default::default()
    };

    let result = need.insert(db).await?;
    debug!(need_id = result.id, user_id, "Created need");
    Ok(result)
}

/// Lists the needs owned by `user_id`, oldest first.
pub async fn list_needs(db: &DatabaseConnection, user_id: i64) -> Result<Vec<need::Model>> {
    Need::find()
        .filter(need::Column::UserId.eq(user_id))
        .order_by_asc(need::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a need and checks that `user_id` owns it.
///
/// # Errors
/// - [`Error::NotFound`] if no need has this id
/// - [`Error::AuthorizationDenied`] if it belongs to someone else
pub async fn get_need_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    need_id: i64,
) -> Result<need::Model> {
    let need = Need::find_by_id(need_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "need",
            id: need_id,
        })?;
    authorize(db, user_id, &need).await?;
    Ok(need)
}

/// Replaces every writable field of a need.
pub async fn update_need(
    db: &DatabaseConnection,
    user_id: i64,
    need_id: i64,
    input: NeedInput,
) -> Result<need::Model> {
    let existing = get_need_for_user(db, user_id, need_id).await?;
    input.validate()?;

    let mut need: need::ActiveModel = existing.into();
    need.name = Set(input.name);
    need.description = Set(input.description);
    need.icon_name = Set(input.icon_name);
    need.icon_color = Set(input.icon_color);
    need.update(db).await.map_err(Into::into)
}

/// Deletes a need together with its goals, their steps and their deliveries.
#[instrument(skip(db))]
pub async fn delete_need(db: &DatabaseConnection, user_id: i64, need_id: i64) -> Result<()> {
    let need = get_need_for_user(db, user_id, need_id).await?;

    let txn = db.begin().await?;
    let goal_ids: Vec<i64> = Goal::find()
        .select_only()
        .column(goal::Column::Id)
        .filter(goal::Column::NeedId.eq(need.id))
        .into_tuple()
        .all(&txn)
        .await?;
    let step_ids: Vec<i64> = Step::find()
        .select_only()
        .column(step::Column::Id)
        .filter(step::Column::GoalId.is_in(goal_ids.clone()))
        .into_tuple()
        .all(&txn)
        .await?;

    Delivery::delete_many()
        .filter(delivery::Column::StepId.is_in(step_ids))
        .exec(&txn)
        .await?;
    Step::delete_many()
        .filter(step::Column::GoalId.is_in(goal_ids))
        .exec(&txn)
        .await?;
    Goal::delete_many()
        .filter(goal::Column::NeedId.eq(need.id))
        .exec(&txn)
        .await?;
    Need::delete_by_id(need.id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted need and its descendants");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    fn input(name: &str) -> NeedInput {
        NeedInput {
            name: name.to_string(),
            description: "a need we have".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_need_without_icon_uses_empty_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;

        let need = create_need(&db, user.id, input("mind")).await?;

        assert_eq!(need.user_id, user.id);
        assert_eq!(need.description, "a need we have");
        assert_eq!(need.icon_name, "");
        assert_eq!(need.icon_color, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_need_with_icon_persists_verbatim() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;

        let need = create_need(
            &db,
            user.id,
            NeedInput {
                icon_name: "far fa-heart".to_string(),
                icon_color: "bg-red-500".to_string(),
                ..input("mind")
            },
        )
        .await?;

        let stored = Need::find_by_id(need.id).one(&db).await?.unwrap();
        assert_eq!(stored.icon_name, "far fa-heart");
        assert_eq!(stored.icon_color, "bg-red-500");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_need_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;

        let result = create_need(&db, user.id, input("")).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_need(&db, user.id, input(&"n".repeat(31))).await;
        let Err(Error::Validation { errors }) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("name"));

        assert_eq!(Need::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_needs_only_returns_own() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        create_test_need(&db, alice.id, "need1").await?;
        create_test_need(&db, alice.id, "need2").await?;
        create_test_need(&db, bob.id, "need3").await?;

        let needs = list_needs(&db, alice.id).await?;
        assert_eq!(needs.len(), 2);
        assert!(needs.iter().all(|n| n.user_id == alice.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_need_for_user() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let need = create_test_need(&db, bob.id, "bob's").await?;

        let result = get_need_for_user(&db, alice.id, need.id).await;
        assert!(matches!(result, Err(Error::AuthorizationDenied)));

        let result = get_need_for_user(&db, alice.id, 999).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "need",
                id: 999
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_need_by_other_user_leaves_it_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let need = create_test_need(&db, bob.id, "bob's").await?;

        let result = update_need(&db, alice.id, need.id, input("stolen")).await;
        assert!(matches!(result, Err(Error::AuthorizationDenied)));

        let stored = Need::find_by_id(need.id).one(&db).await?.unwrap();
        assert_eq!(stored, need);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_need_replaces_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let need = create_need(
            &db,
            alice.id,
            NeedInput {
                icon_name: "far fa-heart".to_string(),
                ..input("need1")
            },
        )
        .await?;

        let updated = update_need(&db, alice.id, need.id, input("need1Updated")).await?;
        assert_eq!(updated.id, need.id);
        assert_eq!(updated.name, "need1Updated");
        // Full replace: the icon was not sent again
        assert_eq!(updated.icon_name, "");
        assert_eq!(updated.user_id, alice.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_need_cascades() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let tree = create_test_tree(&db, alice.id).await?;
        let other = create_test_tree(&db, alice.id).await?;

        delete_need(&db, alice.id, tree.need.id).await?;

        assert!(Need::find_by_id(tree.need.id).one(&db).await?.is_none());
        assert!(Goal::find_by_id(tree.goal.id).one(&db).await?.is_none());
        assert!(Step::find_by_id(tree.step.id).one(&db).await?.is_none());
        assert!(Delivery::find_by_id(tree.delivery.id).one(&db).await?.is_none());

        // The sibling tree is untouched
        assert!(Delivery::find_by_id(other.delivery.id).one(&db).await?.is_some());
        assert_eq!(Goal::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_need_of_other_user_is_denied() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let need = create_test_need(&db, bob.id, "bob's").await?;

        let result = delete_need(&db, alice.id, need.id).await;
        assert!(matches!(result, Err(Error::AuthorizationDenied)));
        assert_eq!(Need::find().count(&db).await?, 1);
        Ok(())
    }
}
