//! Expression types for optimization rows.
//!
//! - `bounds` — BoundSpec: equality, one-sided, two-sided or unconstrained
//! - `core`   — SparseExpr: sparse linear/quadratic maps + constant + bounds
//! - `error`  — Expression construction errors

pub mod bounds;
pub mod core;
pub mod error;

pub use bounds::BoundSpec;
pub use core::{QuadKey, SparseExpr};
pub use error::ExprError;
