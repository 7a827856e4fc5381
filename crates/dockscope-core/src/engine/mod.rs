//! # Engine Module
//!
//! Stateful pieces that sit on top of the pure parsing and geometry code.
//!
//! - **Configuration** ([`config`]) - Analysis options and their builder
//! - **Pose Sequencing** ([`sequencer`]) - Active pose tracking with a cancellable auto-advance timer
//! - **Progress Monitoring** ([`progress`]) - Callback-based reporting for batch analysis

pub mod config;
pub mod progress;
pub mod sequencer;
