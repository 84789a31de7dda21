//! # Workflows Module
//!
//! High-level procedures that read structures, transform them and write the
//! results to disk. These are the entry points used by the command-line front end.
//!
//! - **Transition Setup** ([`transition`]) - Locates end-point files and writes the
//!   `initial/`, `final/` and (for migrations) `host/` geometries
//! - **Path Assembly** ([`path`]) - Merges the images of a finished NEB run into a
//!   single structure for visualization
//! - **Supercells** ([`supercell`]) - Diagonal supercell expansion of a structure file

pub mod error;
pub mod path;
pub mod supercell;
pub mod transition;
