//! Reading docking output files.
//!
//! Covers model layout detection, model extraction and splitting, the
//! fixed-column atom line parser, and the record parser that turns a PDBQT or
//! PDB docking result into poses with their scores and torsion metadata.

pub mod atom_line;
pub mod extract;
pub mod layout;
pub mod pdbqt;
pub(crate) mod records;
pub mod traits;
