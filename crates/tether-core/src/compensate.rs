//! Removal of fixed variables from an expression row.
//!
//! Every term touching a fixed variable is folded away:
//!
//! | term                        | result                                         |
//! |-----------------------------|------------------------------------------------|
//! | `c·x`, `x` fixed            | `c·v_x` added to the constant contribution     |
//! | `c·x·y`, both fixed         | `c·v_x·v_y` added to the constant contribution |
//! | `c·x·y`, only `x` fixed     | `c·v_x` merged into the linear term of `y`     |
//! | `c·x·y`, neither fixed      | copied                                         |
//!
//! For a bounded row the constant contribution, together with the row's own
//! constant, is moved to the threshold side, so the result has a zero
//! constant. The objective row (unconstrained) keeps it as its constant,
//! which backends register as an objective offset.

use crate::model::ModelError;
use crate::partition::VariablePartition;
use tether_expr::{ExprError, SparseExpr};

/// Compensate `expr` for the fixed variables of `partition`.
///
/// The result references free variables only. Compensating an expression
/// that holds no fixed key leaves its terms and bounds unchanged, so applying
/// this twice is the same as applying it once.
///
/// # Errors
///
/// Returns [`ModelError::Expr`] when a folded coefficient or the shifted
/// constant is not finite.
pub fn compensate(expr: &SparseExpr, partition: &VariablePartition) -> Result<SparseExpr, ModelError> {
    let mut result = SparseExpr::new(expr.name());
    let mut offset = 0.0;
    let mut folded_terms = 0usize;

    for (&var_id, &coeff) in expr.linear() {
        match partition.fixed_value(var_id) {
            Some(value) => {
                offset += coeff * value;
                folded_terms += 1;
            }
            None => result.add_linear(var_id, coeff)?,
        }
    }

    for (&key, &coeff) in expr.quadratic() {
        let row = key.row();
        let col = key.col();
        match (partition.fixed_value(row), partition.fixed_value(col)) {
            (Some(row_value), Some(col_value)) => {
                offset += coeff * row_value * col_value;
                folded_terms += 1;
            }
            (Some(row_value), None) => {
                result.add_linear(col, coeff * row_value)?;
                folded_terms += 1;
            }
            (None, Some(col_value)) => {
                result.add_linear(row, coeff * col_value)?;
                folded_terms += 1;
            }
            (None, None) => result.add_quadratic(row, col, coeff)?,
        }
    }

    if folded_terms == 0 && partition.num_fixed() > 0 {
        tracing::debug!(
            component = "compensate",
            operation = "compensate",
            status = "unchanged",
            expr = expr.name(),
            num_fixed = partition.num_fixed(),
            "Expression holds no fixed variable"
        );
    }

    let bounds = expr.bounds();
    if bounds.is_constraint() {
        let shift = expr.constant() + offset;
        if !shift.is_finite() {
            return Err(ExprError::NonFiniteCoefficient { coefficient: shift }.into());
        }
        result.set_bounds(bounds.shifted(shift));
    } else {
        result.set_constant(expr.constant() + offset)?;
    }

    tracing::trace!(
        component = "compensate",
        operation = "compensate",
        status = "success",
        expr = expr.name(),
        folded_terms,
        offset,
        bounds = result.bounds().as_str(),
        "Compensated expression"
    );

    Ok(result)
}
