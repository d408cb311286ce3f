//! # Engine Module
//!
//! Request-level machinery around the pure `core` pipeline.
//!
//! - **Configuration** ([`config`]) - Promotion threshold, scoring cutoffs and the forcefield source
//! - **Error Handling** ([`error`]) - The caller-facing [`error::BuildError`] taxonomy
//! - **Progress Monitoring** ([`progress`]) - Stage events and cooperative cancellation
//! - **Results** ([`state`]) - The realized model returned by a build
//! - **Persistence** ([`store`]) - The build store abstraction and an in-memory implementation
//! - **Memoization** ([`cache`]) - Request fingerprints, counting and promotion
//!
//! The only shared mutable state in the crate lives behind [`store::BuildStore`];
//! every counter update goes through a single atomic `upsert`.

pub mod cache;
pub mod config;
pub mod error;
pub mod progress;
pub mod state;
pub mod store;
