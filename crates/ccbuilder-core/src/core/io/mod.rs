//! Provides input/output functionality for molecular file formats.
//!
//! Packed bundles are encoded as PDB text. The [`traits::MolecularFile`] trait
//! gives every format the same read/write interface over buffered readers,
//! writers and paths.

pub mod pdb;
pub mod traits;
