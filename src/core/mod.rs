//! Framework-agnostic business logic.
//!
//! Every function takes a database connection and the requester's user id;
//! nothing here knows about HTTP.

pub mod account;
pub mod bootstrap;
pub mod delivery;
pub mod goal;
pub mod iteration;
pub mod need;
pub mod ownership;
pub mod progress;
pub mod step;
pub mod validation;
