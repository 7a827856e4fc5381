//! # Workflows Module
//!
//! Top-level entry points that tie parsing, geometry and configuration together.
//!
//! - **Analysis Workflow** ([`analyze`]) - Parse a docking result and derive a
//!   serializable report, for one file or a batch.

pub mod analyze;
