//! # Core Module
//!
//! Stateless building blocks for reading docking output and measuring poses.
//!
//! - **Data Models** ([`models`]) - Atoms, poses, torsions, summaries and interactions
//! - **File I/O** ([`io`]) - Layout detection, model extraction and the PDBQT record parser
//! - **Geometry** ([`utils::geometry`]) - Centroid, torsion angle, RMSD and docking box
//! - **Analytics** ([`analysis`]) - Per-pose metrics and interaction alignment

pub mod analysis;
pub mod io;
pub mod models;
pub mod utils;
