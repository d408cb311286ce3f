//! # Core Module
//!
//! Pure building blocks of the coiled-coil builder. Nothing in this module performs
//! I/O on its own behalf (file readers only run when explicitly called) and nothing
//! holds shared mutable state.
//!
//! - **Request Parameters** ([`parameters`]) - Validated per-chain helix parameters and registers
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and the molecular system
//! - **Bundle Geometry** ([`coiled_coil`]) - Backbone generation and residues-per-turn analysis
//! - **Side Chains** ([`packing`]) - Deterministic side-chain placement from residue templates
//! - **Energy Calculations** ([`forcefield`]) - Pairwise potentials, parameters and scoring
//! - **File I/O** ([`io`]) - PDB encoding of packed bundles

pub mod coiled_coil;
pub mod forcefield;
pub mod io;
pub mod models;
pub mod packing;
pub mod parameters;
pub(crate) mod utils;
