//! # Core Models Module
//!
//! Data structures describing a packed coiled-coil bundle at atomic resolution.
//!
//! - [`atom`] - Atoms with element, role, coordinates and cached forcefield parameters
//! - [`residue`] - Amino-acid residue types and residue records
//! - [`chain`] - One chain per helix of the bundle
//! - [`system`] - The complete molecular system with ordered traversal
//! - [`ids`] - Stable slotmap keys for atoms, residues and chains
//!
//! ```ignore
//! use ccbuilder::core::models::{atom::Atom, residue::ResidueType, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A');
//! let residue_id = system.add_residue(chain_id, 1, ResidueType::Leucine)?;
//! system.add_atom_to_residue(residue_id, Atom::new("CA", residue_id, Point3::origin()));
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
