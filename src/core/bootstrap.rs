//! Account seeders: the first-run wizard and the tutorial tree.
//!
//! Both write everything in one transaction, so a failure leaves the account
//! as it was. Neither deduplicates; running one twice seeds twice.

use crate::{
    config::StarterConfig,
    core::{
        delivery::{DeliveryInput, create_delivery},
        goal::{GoalInput, create_goal},
        iteration::{IterationInput, create_iteration, get_active_iteration},
        need::{NeedInput, create_need},
        step::{StepInput, create_step},
    },
    entities::{Need, need},
    errors::{Error, Result},
};
use chrono::{Days, Local};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

/// Number of days the tutorial goal is given.
const TUTORIAL_GOAL_DAYS: u64 = 30;

const TUTORIAL_STEPS: [(&str, &str); 4] = [
    ("Pick a need", "Every goal serves one of your needs"),
    ("Set a goal", "Give it a name and a due date"),
    ("Break it into steps", "Small steps are easier to finish"),
    ("Plan a delivery", "Schedule work in the current iteration"),
];

/// Seeds the starter needs and opens the first iteration.
#[instrument(skip(db, starter), fields(needs = starter.needs.len()))]
pub async fn run_wizard(
    db: &DatabaseConnection,
    user_id: i64,
    starter: &StarterConfig,
) -> Result<()> {
    let txn = db.begin().await?;

    for seed in &starter.needs {
        create_need(
            &txn,
            user_id,
            NeedInput {
                name: seed.name.clone(),
                description: seed.description.clone(),
                icon_name: seed.icon_name.clone(),
                icon_color: seed.icon_color.clone(),
            },
        )
        .await?;
    }

    create_iteration(
        &txn,
        user_id,
        IterationInput {
            number: starter.iteration.number,
            completed: false,
            date: Local::now().date_naive(),
        },
    )
    .await?;

    txn.commit().await?;
    info!("Wizard seeded account");
    Ok(())
}

/// Seeds a demo goal with four steps and one delivery.
///
/// The goal goes under the user's oldest need, or a new "Tutorial" need if
/// they have none. The delivery lands on the first step and is scheduled in
/// the active iteration when there is one.
#[instrument(skip(db))]
pub async fn run_tutorial_setup(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Need::find()
        .filter(need::Column::UserId.eq(user_id))
        .order_by_asc(need::Column::Id)
        .one(&txn)
        .await?;
    let need = match existing {
        Some(need) => need,
        None => {
            create_need(
                &txn,
                user_id,
                NeedInput {
                    name: "Tutorial".to_string(),
                    description: "Where your first goal lives".to_string(),
                    icon_name: "fas fa-graduation-cap".to_string(),
                    icon_color: "bg-purple-500".to_string(),
                },
            )
            .await?
        }
    };

    let today = Local::now().date_naive();
    let goal = create_goal(
        &txn,
        GoalInput {
            name: "Finish the tutorial".to_string(),
            description: "Learn how needs, goals and steps fit together".to_string(),
            end_date: today
                .checked_add_days(Days::new(TUTORIAL_GOAL_DAYS))
                .unwrap_or(today),
            need_id: need.id,
        },
    )
    .await?;

    let mut first_step = None;
    for (name, description) in TUTORIAL_STEPS {
        let step = create_step(
            &txn,
            StepInput {
                name: name.to_string(),
                description: description.to_string(),
                completed: false,
                goal_id: goal.id,
            },
        )
        .await?;
        first_step.get_or_insert(step);
    }
    let first_step = first_step.ok_or(Error::BrokenOwnership {
        entity: "goal",
        id: goal.id,
        parent: "step",
    })?;

    let iteration_id = match get_active_iteration(&txn, user_id).await {
        Ok(iteration) => Some(iteration.id),
        Err(Error::NoActiveIteration) => None,
        Err(e) => return Err(e),
    };

    create_delivery(
        &txn,
        DeliveryInput {
            name: "Read the tutorial".to_string(),
            description: "Mark this delivery completed to see the step progress".to_string(),
            completed: false,
            step_id: first_step.id,
            iteration_id,
        },
    )
    .await?;

    txn.commit().await?;
    info!(goal_id = goal.id, "Tutorial seeded");
    Ok(())
}
