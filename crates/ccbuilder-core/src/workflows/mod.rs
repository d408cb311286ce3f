//! # Workflows Module
//!
//! Top-level entry points. [`build::build_model`] runs the full pipeline
//! (backbone generation, sequence packing, scoring, residues-per-turn analysis
//! and PDB encoding) for one request. [`build::BuildService`] wraps it with the
//! request-counting build cache: promoted requests are answered from the store,
//! everything else runs the pipeline.
//!
//! Storage failures never fail a build. They are logged and the freshly built
//! model is returned uncached.

pub mod build;
