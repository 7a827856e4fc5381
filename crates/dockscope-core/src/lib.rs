//! # DockScope Core Library
//!
//! Parsing and pose analytics for multi-model molecular docking results
//! written by AutoDock Vina and AutoDock4 (PDBQT) or as plain PDB.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Data models (`PoseModel`, `AtomRecord`,
//!   `InteractionRecord`), format detection, model extraction, the docking
//!   record parser, and pure geometry (centroid, torsion angle, RMSD, docking
//!   box). Everything here is stateless and reentrant.
//!
//! - **[`engine`]: The Stateful Layer.** Analysis configuration, batch
//!   progress reporting, and the pose sequencer that tracks the active pose and
//!   auto-advances it on a tokio timer.
//!
//! - **[`workflows`]: The Public API.** One call from raw text to a
//!   JSON-serializable `DockingReport`, for a single file or a batch.

pub mod core;
pub mod engine;
pub mod workflows;
