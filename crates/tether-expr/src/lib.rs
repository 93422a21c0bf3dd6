//! Sparse expression types shared by the tether crates.
//!
//! An expression is one row of an optimization model: the objective or a
//! constraint. It holds sparse linear and quadratic coefficient maps, a
//! constant term and a [`BoundSpec`] describing the row's constraint shape.

pub mod expr;
pub mod ids;

pub use expr::{BoundSpec, ExprError, QuadKey, SparseExpr};
pub use ids::{FreeIndex, VariableId};
