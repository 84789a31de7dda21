//! Provides input/output functionality for crystal structure file formats.
//!
//! Formats implement the [`traits::StructureFile`] trait, which supplies
//! path-based convenience methods on top of reader/writer based parsing.

pub mod poscar;
pub mod traits;
