//! Registration of native expressions as HiGHS rows.

use crate::expression::NativeExpr;
use crate::ffi::{HighsError, HighsHandle};
use tether_expr::BoundSpec;
use tether_solver::SolverError;

fn add_row(
    handle: &mut HighsHandle,
    native: &NativeExpr,
    lower: f64,
    upper: f64,
    name: &str,
) -> Result<usize, SolverError> {
    let result = match native {
        NativeExpr::Linear(linear) => {
            handle.add_row(lower, upper, linear.columns(), linear.coefficients(), name)
        }
        NativeExpr::Quadratic { .. } => Err(HighsError::QuadraticConstraint {
            name: name.to_string(),
        }),
    };
    result.map_err(|err| SolverError::construction("add_row", err))
}

/// Register `native` under `bounds`. Returns the native rows added.
///
/// | bounds              | rows                                  |
/// |---------------------|---------------------------------------|
/// | `Equality(v)`       | `[v, v]`                              |
/// | `Lower(v)`          | `[v, +inf)`                           |
/// | `Upper(v)`          | `(-inf, v]`                           |
/// | `Both { lo, hi }`   | `[lo, +inf)` as `name:lo`, `(-inf, hi]` as `name:hi` |
/// | `Unconstrained`     | none                                  |
///
/// # Errors
///
/// Returns [`SolverError::Construction`] when HiGHS rejects a row,
/// including every quadratic row.
pub fn register_constraint(
    native: &NativeExpr,
    bounds: &BoundSpec,
    name: &str,
    handle: &mut HighsHandle,
) -> Result<Vec<usize>, SolverError> {
    let rows = match *bounds {
        BoundSpec::Unconstrained => Vec::new(),
        BoundSpec::Equality(value) => vec![add_row(handle, native, value, value, name)?],
        BoundSpec::Lower(value) => vec![add_row(handle, native, value, f64::INFINITY, name)?],
        BoundSpec::Upper(value) => {
            vec![add_row(handle, native, f64::NEG_INFINITY, value, name)?]
        }
        BoundSpec::Both { lower, upper } => vec![
            add_row(handle, native, lower, f64::INFINITY, &format!("{name}:lo"))?,
            add_row(handle, native, f64::NEG_INFINITY, upper, &format!("{name}:hi"))?,
        ],
    };

    tracing::trace!(
        component = "constraint",
        operation = "register",
        status = "success",
        name,
        bounds = bounds.as_str(),
        rows = rows.len(),
        "Registered constraint"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tether_core::VariablePartition;
    use tether_expr::{SparseExpr, VariableId};

    fn native(expr: &SparseExpr, num_variables: usize) -> NativeExpr {
        let partition = VariablePartition::new(num_variables, &BTreeMap::new()).unwrap();
        NativeExpr::build(expr, &partition).unwrap()
    }

    fn handle_with_cols(n: usize) -> HighsHandle {
        let mut handle = HighsHandle::new().unwrap();
        for _ in 0..n {
            handle.add_col(0.0, 0.0, f64::INFINITY, "x").unwrap();
        }
        handle
    }

    #[test]
    fn one_row_per_single_sided_bound() {
        let expr = SparseExpr::from_linear("c", [(VariableId::new(0), 1.0)]).unwrap();
        let row = native(&expr, 1);
        let mut handle = handle_with_cols(1);
        for bounds in [
            BoundSpec::Equality(1.0),
            BoundSpec::Lower(1.0),
            BoundSpec::Upper(1.0),
        ] {
            assert_eq!(
                register_constraint(&row, &bounds, "c", &mut handle)
                    .unwrap()
                    .len(),
                1
            );
        }
        assert_eq!(handle.num_rows().unwrap(), 3);
    }

    #[test]
    fn both_registers_two_named_rows() {
        let expr = SparseExpr::from_linear("range", [(VariableId::new(0), 1.0)]).unwrap();
        let row = native(&expr, 1);
        let mut handle = handle_with_cols(1);
        let rows = register_constraint(
            &row,
            &BoundSpec::Both {
                lower: 1.0,
                upper: 2.0,
            },
            "range",
            &mut handle,
        )
        .unwrap();
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(handle.row_name(0), Some("range:lo"));
        assert_eq!(handle.row_name(1), Some("range:hi"));
    }

    #[test]
    fn unconstrained_registers_nothing() {
        let expr = SparseExpr::from_linear("obj", [(VariableId::new(0), 1.0)]).unwrap();
        let row = native(&expr, 1);
        let mut handle = handle_with_cols(1);
        let rows = register_constraint(&row, &BoundSpec::Unconstrained, "obj", &mut handle).unwrap();
        assert!(rows.is_empty());
        assert_eq!(handle.num_rows().unwrap(), 0);
    }

    #[test]
    fn quadratic_row_is_a_construction_failure() {
        let x = VariableId::new(0);
        let expr = SparseExpr::new("q").with_quadratic(x, x, 1.0).unwrap();
        let row = native(&expr, 1);
        let mut handle = handle_with_cols(1);
        let err = register_constraint(&row, &BoundSpec::Upper(1.0), "q", &mut handle).unwrap_err();
        assert!(matches!(err, SolverError::Construction { .. }));
        assert_eq!(handle.num_rows().unwrap(), 0);
    }
}
