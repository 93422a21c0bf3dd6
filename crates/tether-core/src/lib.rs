//! Solver-agnostic model data and the fixed-variable reduction that every
//! native backend runs before building its problem.
//!
//! - [`Model`]: variables, pinned values, constraint rows, objective, sense
//! - [`VariablePartition`]: free/fixed split and the dense free index space
//! - [`compensate`]: rewrite a row so it references free variables only

pub mod compensate;
pub mod model;
pub mod partition;
pub mod types;

pub use compensate::compensate;
pub use model::{Model, ModelError};
pub use partition::VariablePartition;
pub use types::{Bounds, Sense, Variable, VariableKind};
