//! Request and response bodies.
//!
//! Payloads deserialize every field as optional so that a missing required
//! field is reported as a field error instead of a parse failure. Views are
//! the JSON shapes returned to clients; field names are camelCase.

use crate::{
    core::{
        account::Registration, delivery::DeliveryInput, goal::GoalInput,
        iteration::IterationInput, need::NeedInput, step::StepInput, validation::Validator,
    },
    entities::{delivery, goal, iteration, need, step},
    errors::Result,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `POST /auth/registration/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    /// Required login name
    pub username: Option<String>,
    /// Optional, stored as given
    pub email: Option<String>,
    /// Required password
    pub password1: Option<String>,
    /// Required confirmation of `password1`
    pub password2: Option<String>,
}

impl RegistrationRequest {
    /// Reports every missing required field at once.
    pub fn into_registration(self) -> Result<Registration> {
        let mut v = Validator::new();
        if self.username.is_none() {
            v.required("username");
        }
        if self.password1.is_none() {
            v.required("password1");
        }
        if self.password2.is_none() {
            v.required("password2");
        }
        v.finish()?;

        Ok(Registration {
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password1: self.password1.unwrap_or_default(),
            password2: self.password2.unwrap_or_default(),
        })
    }
}

/// `POST /auth/login/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Required
    pub username: Option<String>,
    /// Required
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(username, password)`.
    pub fn into_credentials(self) -> Result<(String, String)> {
        let mut v = Validator::new();
        if self.username.is_none() {
            v.required("username");
        }
        if self.password.is_none() {
            v.required("password");
        }
        v.finish()?;
        Ok((
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        ))
    }
}

/// Token issued on registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    /// 40 hex characters, sent back as `Authorization: Token <key>`
    pub key: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    /// Message for the client
    pub detail: String,
}

/// `GET /health/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Body of need create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedPayload {
    /// Required
    pub name: Option<String>,
    /// Defaults to empty
    pub description: Option<String>,
    /// Defaults to empty
    pub icon_name: Option<String>,
    /// Defaults to empty
    pub icon_color: Option<String>,
}

impl NeedPayload {
    /// Fails if `name` is missing.
    pub fn into_input(self) -> Result<NeedInput> {
        let mut v = Validator::new();
        if self.name.is_none() {
            v.required("name");
        }
        v.finish()?;
        Ok(NeedInput {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            icon_name: self.icon_name.unwrap_or_default(),
            icon_color: self.icon_color.unwrap_or_default(),
        })
    }
}

/// A need as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedView {
    /// Need id
    pub id: i64,
    /// Short name
    pub name: String,
    /// Free text, possibly empty
    pub description: String,
    /// Icon class for the client
    pub icon_name: String,
    /// Icon color class for the client
    pub icon_color: String,
    /// Owner's user id
    pub user: i64,
}

impl From<need::Model> for NeedView {
    fn from(need: need::Model) -> Self {
        Self {
            id: need.id,
            name: need.name,
            description: need.description,
            icon_name: need.icon_name,
            icon_color: need.icon_color,
            user: need.user_id,
        }
    }
}

/// Body of goal create and update. `need` is the parent's id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    /// Required
    pub name: Option<String>,
    /// Defaults to empty
    pub description: Option<String>,
    /// `YYYY-MM-DD`, defaults to today
    pub end_date: Option<NaiveDate>,
    /// Required parent need id
    pub need: Option<i64>,
}

impl GoalPayload {
    /// A missing end date defaults to today.
    pub fn into_input(self) -> Result<GoalInput> {
        let mut v = Validator::new();
        if self.name.is_none() {
            v.required("name");
        }
        if self.need.is_none() {
            v.required("need");
        }
        v.finish()?;
        Ok(GoalInput {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            end_date: self.end_date.unwrap_or_else(today),
            need_id: self.need.unwrap_or_default(),
        })
    }
}

/// A goal with its need embedded, used by reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalReadView {
    /// Goal id
    pub id: i64,
    /// Short name
    pub name: String,
    /// Free text, possibly empty
    pub description: String,
    /// Target date
    pub end_date: NaiveDate,
    /// Parent need, in full
    pub need: NeedView,
}

impl From<(goal::Model, need::Model)> for GoalReadView {
    fn from((goal, need): (goal::Model, need::Model)) -> Self {
        Self {
            id: goal.id,
            name: goal.name,
            description: goal.description,
            end_date: goal.end_date,
            need: need.into(),
        }
    }
}

/// A goal referencing its need by id, used by writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWriteView {
    /// Goal id
    pub id: i64,
    /// Short name
    pub name: String,
    /// Free text, possibly empty
    pub description: String,
    /// Target date
    pub end_date: NaiveDate,
    /// Parent need id
    pub need: i64,
}

impl From<goal::Model> for GoalWriteView {
    fn from(goal: goal::Model) -> Self {
        Self {
            id: goal.id,
            name: goal.name,
            description: goal.description,
            end_date: goal.end_date,
            need: goal.need_id,
        }
    }
}

/// Body of step create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    /// Required
    pub name: Option<String>,
    /// Defaults to empty
    pub description: Option<String>,
    /// Defaults to `false`
    pub completed: Option<bool>,
    /// Required parent goal id
    pub goal: Option<i64>,
}

impl StepPayload {
    /// Fails if `name` or `goal` is missing.
    pub fn into_input(self) -> Result<StepInput> {
        let mut v = Validator::new();
        if self.name.is_none() {
            v.required("name");
        }
        if self.goal.is_none() {
            v.required("goal");
        }
        v.finish()?;
        Ok(StepInput {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            completed: self.completed.unwrap_or_default(),
            goal_id: self.goal.unwrap_or_default(),
        })
    }
}

/// A step with its derived completion percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    /// Step id
    pub id: i64,
    /// Short name
    pub name: String,
    /// Free text, possibly empty
    pub description: String,
    /// Set by the client, independent of the percentage
    pub completed: bool,
    /// Parent goal id
    pub goal: i64,
    /// Share of completed deliveries, e.g. `"0%"` or `"50.0%"`
    pub percentage_completed: String,
}

impl StepView {
    /// Pairs a stored step with its computed percentage.
    pub fn new(step: step::Model, percentage_completed: String) -> Self {
        Self {
            id: step.id,
            name: step.name,
            description: step.description,
            completed: step.completed,
            goal: step.goal_id,
            percentage_completed,
        }
    }
}

/// Body of iteration create and update. The owner is never taken from the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationPayload {
    /// Defaults to 0
    pub number: Option<i32>,
    /// Defaults to `false`
    pub completed: Option<bool>,
    /// `YYYY-MM-DD`, defaults to today
    pub date: Option<NaiveDate>,
}

impl IterationPayload {
    /// Every field is optional: number 0, incomplete, dated today.
    pub fn into_input(self) -> IterationInput {
        IterationInput {
            number: self.number.unwrap_or_default(),
            completed: self.completed.unwrap_or_default(),
            date: self.date.unwrap_or_else(today),
        }
    }
}

/// An iteration as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationView {
    /// Iteration id
    pub id: i64,
    /// Sequence number chosen by the client
    pub number: i32,
    /// Closed iterations are never active
    pub completed: bool,
    /// Start date
    pub date: NaiveDate,
    /// Owner's user id
    pub owner: i64,
}

impl From<iteration::Model> for IterationView {
    fn from(iteration: iteration::Model) -> Self {
        Self {
            id: iteration.id,
            number: iteration.number,
            completed: iteration.completed,
            date: iteration.date,
            owner: iteration.owner_id,
        }
    }
}

/// Body of delivery create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    /// Required
    pub name: Option<String>,
    /// Defaults to empty
    pub description: Option<String>,
    /// Defaults to `false`
    pub completed: Option<bool>,
    /// Required parent step id
    pub step: Option<i64>,
    /// Iteration id, or absent/`null` for none
    pub iteration: Option<i64>,
}

impl DeliveryPayload {
    /// Fails if `name` or `step` is missing.
    pub fn into_input(self) -> Result<DeliveryInput> {
        let mut v = Validator::new();
        if self.name.is_none() {
            v.required("name");
        }
        if self.step.is_none() {
            v.required("step");
        }
        v.finish()?;
        Ok(DeliveryInput {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            completed: self.completed.unwrap_or_default(),
            step_id: self.step.unwrap_or_default(),
            iteration_id: self.iteration,
        })
    }
}

/// A delivery as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryView {
    /// Delivery id
    pub id: i64,
    /// Short name
    pub name: String,
    /// Free text, possibly empty
    pub description: String,
    /// Counts toward its step's percentage when set
    pub completed: bool,
    /// Parent step id
    pub step: i64,
    /// Iteration id, `null` when unscheduled
    pub iteration: Option<i64>,
}

impl From<delivery::Model> for DeliveryView {
    fn from(delivery: delivery::Model) -> Self {
        Self {
            id: delivery.id,
            name: delivery.name,
            description: delivery.description,
            completed: delivery.completed,
            step: delivery.step_id,
            iteration: delivery.iteration_id,
        }
    }
}
