//! HTTP handlers for the shopping service.

pub mod health;
pub mod items;
pub mod search;

pub use health::{health_check, metrics_endpoint, readiness_check};
