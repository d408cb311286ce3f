//! # CCBuilder Core Library
//!
//! Builds idealised coiled-coil protein models from a handful of geometric
//! parameters per helix, threads a sequence onto the generated backbone,
//! scores the packed structure and memoizes repeated requests.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Validated parameter objects, stateless data models
//!   (`MolecularSystem`), the pure backbone generator, sequence packer, forcefield
//!   scoring, geometric analysis and structure I/O.
//!
//! - **[`engine`]: The Logic Core.** Build configuration, the error taxonomy reported
//!   to callers, progress reporting, the build store abstraction and the request
//!   counting / promotion state machine of the build cache.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the
//!   single `build` entry point used by request-handling front ends.

pub mod core;
pub mod engine;
pub mod workflows;
