//! # nebkit Core Library
//!
//! Structure handling and input preparation for nudged-elastic-band (NEB)
//! studies of ion migration in crystalline materials.
//!
//! ## Architectural Philosophy
//!
//! The library is organized in three layers, each depending only on the ones
//! listed before it.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Lattice`,
//!   `Site`), element tables and structure file I/O (POSCAR/CONTCAR).
//!
//! - **[`analysis`]: Structure Comparison.** Pure functions over pairs of
//!   snapshots, most importantly locating the migrating ion between the
//!   initial and final structures of a hop.
//!
//! - **[`workflows`]: The Public API.** File-producing procedures built on the
//!   two layers below: setting up the end-point and host geometries of a
//!   transition, assembling the images of a finished NEB run into one path
//!   structure, and expanding structures into supercells.
//!
//! Symmetry reduction, NEB interpolation and input-set generation for the
//! electronic-structure code are left to dedicated external tools.

pub mod analysis;
pub mod core;
pub mod workflows;
