//! # Analysis Module
//!
//! Comparisons between structure snapshots.
//!
//! - **Migration** ([`migration`]) - Locates the site that moved furthest between
//!   the initial and final structures of a single-ion hop
//! - **Error Handling** ([`error`]) - Validation failures for snapshot comparisons

pub mod error;
pub mod migration;
