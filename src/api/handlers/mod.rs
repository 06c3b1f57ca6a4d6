//! Route handlers, one module per resource.
//!
//! Handlers extract the requester, call into [`crate::core`] and shape the
//! result. Bodies are taken as `Result<Json<_>, JsonRejection>` so that
//! malformed JSON surfaces as a 400 with the usual error body.

pub mod accounts;
pub mod bootstrap;
pub mod deliveries;
pub mod goals;
pub mod iterations;
pub mod needs;
pub mod steps;
