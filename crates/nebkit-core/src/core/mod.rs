//! # Core Module
//!
//! The fundamental building blocks shared by every other part of nebkit.
//!
//! - **Structure Representation** ([`models`]) - Lattices, sites and ordered structures
//! - **File I/O** ([`io`]) - Reading and writing structure file formats
//! - **Utilities** ([`utils`]) - Element symbol tables and label normalization
//!
//! All types here are plain data: nothing in this module touches the file
//! system except through the explicit I/O entry points in [`io`].

pub mod io;
pub mod models;
pub mod utils;
