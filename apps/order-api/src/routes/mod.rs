//! HTTP route handlers.
//!
//! - [`orders`] - the order submission endpoint (the only stateful flow)
//! - [`health`] - liveness probe

pub mod health;
pub mod orders;
