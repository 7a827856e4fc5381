//! Plain data records produced by parsing docking output.
//!
//! All types are immutable once a parse call returns and serialize to JSON
//! for rendering collaborators.

pub mod atom;
pub mod coords;
pub mod interaction;
pub mod pose;
