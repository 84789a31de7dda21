//! # Core Models Module
//!
//! Data structures describing a periodic atomic structure.
//!
//! - [`structure`] - [`Lattice`](structure::Lattice), [`Site`](structure::Site)
//!   and [`Structure`](structure::Structure)
//!
//! ## Usage
//!
//! ```
//! use nalgebra::Vector3;
//! use nebkit::core::models::structure::{Lattice, Structure};
//!
//! let lattice = Lattice::cubic(4.0).unwrap();
//! let structure = Structure::from_fractional(
//!     lattice,
//!     vec![("Li", Vector3::new(0.0, 0.0, 0.0)), ("O", Vector3::new(0.5, 0.5, 0.5))],
//! );
//! assert_eq!(structure.len(), 2);
//! ```

pub mod structure;
