//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        delivery::{self, DeliveryInput},
        goal::{self, GoalInput},
        iteration::{self, IterationInput},
        need::{self, NeedInput},
        step::{self, StepInput},
    },
    entities,
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a user directly, skipping password hashing.
///
/// The stored hash is not a valid PHC string, so this user cannot log in;
/// use [`create_test_token`] to authenticate as them.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    entities::user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("!".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Issues a token for `user_id` and returns its key.
pub async fn create_test_token(db: &DatabaseConnection, user_id: i64) -> Result<String> {
    let key = format!("{user_id:0>40}");
    entities::auth_token::ActiveModel {
        key: Set(key.clone()),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(key)
}

/// Creates a need with an empty description and no icon.
pub async fn create_test_need(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<entities::need::Model> {
    need::create_need(
        db,
        user_id,
        NeedInput {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates a goal due on 2024-05-01.
pub async fn create_test_goal(
    db: &DatabaseConnection,
    need_id: i64,
    name: &str,
) -> Result<entities::goal::Model> {
    goal::create_goal(
        db,
        GoalInput {
            name: name.to_string(),
            description: String::new(),
            end_date: test_date(),
            need_id,
        },
    )
    .await
}

/// Creates an incomplete step.
pub async fn create_test_step(
    db: &DatabaseConnection,
    goal_id: i64,
    name: &str,
) -> Result<entities::step::Model> {
    step::create_step(
        db,
        StepInput {
            name: name.to_string(),
            description: String::new(),
            completed: false,
            goal_id,
        },
    )
    .await
}

/// Creates an incomplete iteration number 1.
pub async fn create_test_iteration(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<entities::iteration::Model> {
    iteration::create_iteration(
        db,
        user_id,
        IterationInput {
            number: 1,
            completed: false,
            date: test_date(),
        },
    )
    .await
}

/// Creates a delivery named "delivery".
pub async fn create_test_delivery(
    db: &DatabaseConnection,
    step_id: i64,
    iteration_id: Option<i64>,
    completed: bool,
) -> Result<entities::delivery::Model> {
    delivery::create_delivery(
        db,
        DeliveryInput {
            name: "delivery".to_string(),
            description: String::new(),
            completed,
            step_id,
            iteration_id,
        },
    )
    .await
}

/// One of every entity, chained to a single user.
#[derive(Debug, Clone)]
pub struct TestTree {
    pub need: entities::need::Model,
    pub goal: entities::goal::Model,
    pub step: entities::step::Model,
    pub iteration: entities::iteration::Model,
    /// Incomplete, on `step`, scheduled in `iteration`
    pub delivery: entities::delivery::Model,
}

/// Creates need → goal → step → delivery plus an iteration for `user_id`.
pub async fn create_test_tree(db: &DatabaseConnection, user_id: i64) -> Result<TestTree> {
    let need = create_test_need(db, user_id, "need").await?;
    let goal = create_test_goal(db, need.id, "goal").await?;
    let step = create_test_step(db, goal.id, "step").await?;
    let iteration = create_test_iteration(db, user_id).await?;
    let delivery = create_test_delivery(db, step.id, Some(iteration.id), false).await?;
    Ok(TestTree {
        need,
        goal,
        step,
        iteration,
        delivery,
    })
}

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default()
}
