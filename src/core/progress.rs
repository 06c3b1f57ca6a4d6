//! Completion percentage of a step, derived from its deliveries.
//!
//! The value is never stored; it is recomputed every time a step is
//! serialized.

use crate::{
    entities::{Delivery, delivery},
    errors::Result,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Formats `completed` out of `total` as a percentage string.
///
/// With no deliveries the result is the literal `"0%"`. Otherwise the ratio
/// is rendered as a float with at least one decimal (`"50.0%"`, `"100.0%"`,
/// `"33.333333333333336%"`). A step with deliveries but none completed gives
/// `"0.0%"`, never `"0%"`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Delivery counts are far below 2^52
pub fn format_percentage(completed: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let value = 100.0 * completed as f64 / total as f64;
    format!("{value:?}%")
}

/// Computes the completion percentage of the step with id `step_id`.
pub async fn percentage_completed(db: &DatabaseConnection, step_id: i64) -> Result<String> {
    let total = Delivery::find()
        .filter(delivery::Column::StepId.eq(step_id))
        .count(db)
        .await?;
    if total == 0 {
        return Ok(format_percentage(0, 0));
    }
    let completed = Delivery::find()
        .filter(delivery::Column::StepId.eq(step_id))
        .filter(delivery::Column::Completed.eq(true))
        .count(db)
        .await?;
    Ok(format_percentage(completed, total))
}
