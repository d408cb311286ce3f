//! # Parameters Module
//!
//! Validated request parameters for a coiled-coil bundle.
//!
//! A bundle request is an ordered list of [`helix::HelixParameters`], one per
//! chain. Each value object is validated on construction (builder or serde), so
//! the generator never sees a non-positive radius, a zero pitch or an unknown
//! residue code.
//!
//! - [`helix`] - Per-chain parameter value object and its builder
//! - [`register`] - Heptad register labels and their fixed angular offsets

pub mod helix;
pub mod register;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),

    #[error("Radius must be a positive, finite number of Angstroms (got {0})")]
    NonPositiveRadius(f64),

    #[error("Pitch must be a finite, non-zero number of Angstroms (got {0})")]
    ZeroPitch(f64),

    #[error("Parameter '{field}' must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Unknown register label '{0}' (expected one of a-g)")]
    UnknownRegister(String),

    #[error("Unknown residue code '{code}' at position {position} of the sequence")]
    UnknownResidue { code: char, position: usize },

    #[error("A bundle needs at least one chain")]
    EmptyBundle,

    #[error("Bundle has {count} chains but at most {max} can be labelled")]
    TooManyChains { count: usize, max: usize },

    #[error("Chain count mismatch: expected {expected} per-chain values, got {found}")]
    ChainCountMismatch { expected: usize, found: usize },

    #[error("Sequence length {sequence} does not match the {residues} residues of chain {chain}")]
    SequenceLengthMismatch {
        chain: usize,
        sequence: usize,
        residues: usize,
    },
}
