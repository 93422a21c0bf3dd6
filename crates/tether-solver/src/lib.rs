//! Shared solver abstractions for tether backends.
//!
//! This crate provides the solver-agnostic vocabulary that native backends
//! (like `tether-highs`) translate into and out of.
//!
//! # Overview
//!
//! - [`SolverConfig`]: Options record handed to every configurator
//! - [`State`]: Canonical outcome of a solve
//! - [`SolveResult`]: Immutable state, objective value and dense solution
//! - [`SolverError`]: Error types for build and solve operations
//! - [`Solve`]: Trait for solver implementations
//! - [`SolutionView`]: Trait for accessing solution data

mod config;
mod error;
mod result;
mod status;
mod traits;

pub use config::SolverConfig;
pub use error::SolverError;
pub use result::SolveResult;
pub use status::State;
pub use traits::{SolutionView, Solve};
