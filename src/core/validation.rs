//! Field validation shared by the entity services.
//!
//! Limits count characters, not bytes. Messages are collected per field so a
//! single response can report every problem at once.

use crate::errors::{Error, FieldErrors, Result};

/// Maximum length of a need name
pub const NEED_NAME_MAX: usize = 30;
/// Maximum length of an icon name or icon color
pub const ICON_MAX: usize = 50;
/// Maximum length of a goal name
pub const GOAL_NAME_MAX: usize = 50;
/// Maximum length of a step name
pub const STEP_NAME_MAX: usize = 30;
/// Maximum length of a delivery name
pub const DELIVERY_NAME_MAX: usize = 60;
/// Maximum length of need, goal and step descriptions
pub const DESCRIPTION_MAX: usize = 80;
/// Maximum length of a delivery description
pub const DELIVERY_DESCRIPTION_MAX: usize = 100;
/// Maximum length of a username
pub const USERNAME_MAX: usize = 150;
/// Minimum length of a password
pub const PASSWORD_MIN: usize = 8;

/// Accumulates field errors and turns them into [`Error::Validation`].
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }

    /// Records a missing required field.
    pub fn required(&mut self, field: &str) -> &mut Self {
        self.add(field, "This field is required.")
    }

    /// Rejects empty or whitespace-only values.
    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        }
        self
    }

    /// Rejects values longer than `max` characters.
    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
        self
    }

    /// Rejects values shorter than `min` characters.
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.add(
                field,
                format!("Ensure this field has at least {min} characters."),
            );
        }
        self
    }

    /// Records a foreign key that points at nothing.
    pub fn missing_reference(&mut self, field: &str, id: i64) -> &mut Self {
        self.add(field, format!("Invalid pk \"{id}\" - object does not exist."))
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `Ok(())` if no errors were recorded.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] carrying every recorded message.
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation {
                errors: self.errors,
            })
        }
    }
}
