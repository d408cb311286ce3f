//! # Coiled-Coil Geometry
//!
//! Parametric construction of coiled-coil backbones and the inverse analysis of
//! helical geometry from coordinates.
//!
//! - [`backbone`] - Generates N/CA/C/O coordinates for every chain of a bundle
//!   from its [`BundleSpecification`](crate::core::parameters::helix::BundleSpecification)
//! - [`analysis`] - Residues-per-turn and local pitch derived from backbone frames

pub mod analysis;
pub mod backbone;
