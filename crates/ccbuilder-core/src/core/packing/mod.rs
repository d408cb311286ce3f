//! # Packing Module
//!
//! Threads an amino-acid sequence onto a generated backbone.
//!
//! Placement is a single deterministic conformation per residue: every side
//! chain is grown from fixed internal coordinates in its residue template, with
//! chi angles set to the most common rotamer. There is no search and no
//! randomness, so identical backbones and sequences always give identical
//! atoms.
//!
//! - [`templates`] - Internal-coordinate side-chain templates for the twenty residues
//! - [`packer`] - Builds the atomistic [`MolecularSystem`](crate::core::models::system::MolecularSystem)

pub mod packer;
pub mod templates;
