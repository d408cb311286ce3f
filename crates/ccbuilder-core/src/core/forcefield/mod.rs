//! # Force Field Module
//!
//! Scores a packed bundle with a pairwise non-bonded potential.
//!
//! ## Overview
//!
//! Every atom is first parameterized (forcefield type, van der Waals
//! parameters, partial charge) from a [`params::Forcefield`]. The
//! [`scoring::Scorer`] then sums a [`scoring::PairPotential`] over every atom
//! pair within a cutoff, skipping pairs in the same residue and pairs of
//! adjacent residues along a chain.
//!
//! - **Van der Waals interactions** using Lennard-Jones 12-6 or Buckingham exp-6 potentials
//! - **Electrostatic interactions** with Coulomb's law and a constant dielectric
//!
//! ## Key Components
//!
//! - [`params`] - Non-bonded parameters and partial charges, built in or loaded from files
//! - [`parameterization`] - Assignment of forcefield parameters to atoms
//! - [`scoring`] - The pluggable pair potential and the total-energy scorer
//! - [`term`] - Energy term aggregation
//!
//! ```ignore
//! use ccbuilder::core::forcefield::scoring::{NonBondedPotential, Scorer, ScoringConfig};
//!
//! let potential = NonBondedPotential::from_forcefield(&forcefield);
//! let energy = Scorer::new(&system, &potential, ScoringConfig::default()).total_energy()?;
//! ```

pub(crate) mod energy;
pub mod parameterization;
pub mod params;
pub(crate) mod potentials;
pub mod scoring;
pub mod term;
