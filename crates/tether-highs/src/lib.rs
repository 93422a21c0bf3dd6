//! HiGHS backend for tether models.
//!
//! [`Integration::build`] partitions the model's variables, compensates every
//! row for fixed values and registers the result with a native HiGHS
//! instance. [`HighsSolver::solve`] runs it and translates the outcome into a
//! [`tether_solver::SolveResult`].

pub mod builder;
pub mod constraint;
pub mod environment;
pub mod expression;
pub mod ffi;
pub mod solver;
pub mod status;

pub use builder::Integration;
pub use constraint::register_constraint;
pub use environment::{Configurator, DefaultConfigurator, Environment};
pub use expression::{Hessian, LinearPart, NativeExpr, QuadraticPart};
pub use ffi::{HighsError, HighsHandle, HighsOption, ObjectiveSense, highs_version};
pub use solver::HighsSolver;
pub use status::{MODEL_STATUS_TABLE, translate};
