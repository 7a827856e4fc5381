//! Derived per-pose analytics and interaction alignment.

pub mod interactions;
pub mod metrics;
