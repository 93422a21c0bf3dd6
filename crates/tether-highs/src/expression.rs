//! Native expressions: compensated rows rewritten against column indices.

use std::collections::BTreeMap;
use tether_core::VariablePartition;
use tether_expr::{FreeIndex, SparseExpr, VariableId};
use tether_solver::SolverError;

/// Linear terms in native column indices, sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearPart {
    columns: Vec<usize>,
    coefficients: Vec<f64>,
}

impl LinearPart {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `(column, coefficient)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.columns
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
    }
}

/// Quadratic terms in native column indices, each pair stored once with
/// `row <= col`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadraticPart {
    terms: Vec<(usize, usize, f64)>,
}

impl QuadraticPart {
    pub fn terms(&self) -> &[(usize, usize, f64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Lower-triangular Hessian `Q` of `1/2 x'Qx` equal to these terms.
    ///
    /// A term `c·xi·xj` contributes `c` at `(max(i,j), min(i,j))`; a square
    /// `c·xi²` contributes `2c` on the diagonal.
    pub fn hessian(&self, dim: usize) -> Hessian {
        let mut entries: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(a, b, coeff) in &self.terms {
            let (col, row) = (a.min(b), a.max(b));
            let value = if a == b { 2.0 * coeff } else { coeff };
            *entries.entry((col, row)).or_insert(0.0) += value;
        }

        let mut start = Vec::with_capacity(dim);
        let mut index = Vec::with_capacity(entries.len());
        let mut value = Vec::with_capacity(entries.len());
        let mut iter = entries.into_iter().peekable();
        for col in 0..dim {
            start.push(index.len());
            while let Some(&((entry_col, row), coeff)) = iter.peek() {
                if entry_col != col {
                    break;
                }
                index.push(row);
                value.push(coeff);
                iter.next();
            }
        }

        Hessian {
            dim,
            start,
            index,
            value,
        }
    }
}

/// Lower triangle of a Hessian in compressed column form. Within a column,
/// rows are ascending, so the diagonal comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Hessian {
    pub dim: usize,
    pub start: Vec<usize>,
    pub index: Vec<usize>,
    pub value: Vec<f64>,
}

impl Hessian {
    pub fn nnz(&self) -> usize {
        self.value.len()
    }
}

/// A compensated row in native column indices.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeExpr {
    Linear(LinearPart),
    Quadratic {
        linear: LinearPart,
        quadratic: QuadraticPart,
    },
}

fn column(
    partition: &VariablePartition,
    var_id: VariableId,
    expr: &SparseExpr,
) -> Result<usize, SolverError> {
    partition
        .lookup(var_id)
        .map(FreeIndex::index)
        .ok_or_else(|| {
            SolverError::InvariantViolation(format!(
                "variable {} in '{}' has no native column",
                var_id,
                expr.name()
            ))
        })
}

impl NativeExpr {
    /// Rewrite a compensated expression against native columns.
    ///
    /// Produces [`NativeExpr::Quadratic`] iff `expr` has a quadratic term.
    /// Nothing is registered with the native model.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] when a key has no free
    /// position, i.e. the expression was not compensated.
    pub fn build(expr: &SparseExpr, partition: &VariablePartition) -> Result<Self, SolverError> {
        let mut terms: Vec<(usize, f64)> = Vec::with_capacity(expr.linear().len());
        for (&var_id, &coeff) in expr.linear() {
            terms.push((column(partition, var_id, expr)?, coeff));
        }
        // Free positions keep original order, so this is already sorted.
        let (columns, coefficients) = terms.into_iter().unzip();
        let linear = LinearPart {
            columns,
            coefficients,
        };

        if !expr.has_quadratic() {
            return Ok(NativeExpr::Linear(linear));
        }

        let mut quadratic = Vec::with_capacity(expr.quadratic().len());
        for (&key, &coeff) in expr.quadratic() {
            let row = column(partition, key.row(), expr)?;
            let col = column(partition, key.col(), expr)?;
            quadratic.push((row.min(col), row.max(col), coeff));
        }

        Ok(NativeExpr::Quadratic {
            linear,
            quadratic: QuadraticPart { terms: quadratic },
        })
    }

    pub fn linear(&self) -> &LinearPart {
        match self {
            NativeExpr::Linear(linear) | NativeExpr::Quadratic { linear, .. } => linear,
        }
    }

    pub fn quadratic(&self) -> Option<&QuadraticPart> {
        match self {
            NativeExpr::Linear(_) => None,
            NativeExpr::Quadratic { quadratic, .. } => Some(quadratic),
        }
    }

    pub fn is_quadratic(&self) -> bool {
        matches!(self, NativeExpr::Quadratic { .. })
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn v(index: u32) -> VariableId {
        VariableId::new(index)
    }

    fn partition(num_variables: usize, pairs: &[(u32, f64)]) -> VariablePartition {
        let fixed: BTreeMap<VariableId, f64> =
            pairs.iter().map(|&(id, value)| (v(id), value)).collect();
        VariablePartition::new(num_variables, &fixed).unwrap()
    }

    #[test]
    fn linear_expression_maps_to_columns() {
        let p = partition(4, &[(1, 0.0)]);
        let expr = SparseExpr::from_linear("row", [(v(0), 1.0), (v(2), 2.0), (v(3), 3.0)]).unwrap();
        let native = NativeExpr::build(&expr, &p).unwrap();
        assert!(!native.is_quadratic());
        assert_eq!(native.linear().columns(), &[0, 1, 2]);
        assert_eq!(native.linear().coefficients(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn quadratic_expression_keeps_linear_part() {
        let p = partition(3, &[(0, 1.0)]);
        let expr = SparseExpr::from_linear("q", [(v(1), 4.0)])
            .unwrap()
            .with_quadratic(v(2), v(1), 0.5)
            .unwrap();
        let native = NativeExpr::build(&expr, &p).unwrap();
        assert!(native.is_quadratic());
        assert_eq!(native.linear().iter().collect::<Vec<_>>(), vec![(0, 4.0)]);
        assert_eq!(native.quadratic().unwrap().terms(), &[(0, 1, 0.5)]);
    }

    #[test]
    fn fixed_key_is_an_invariant_violation() {
        let p = partition(2, &[(0, 1.0)]);
        let expr = SparseExpr::from_linear("raw", [(v(0), 1.0)]).unwrap();
        assert!(matches!(
            NativeExpr::build(&expr, &p),
            Err(SolverError::InvariantViolation(_))
        ));
    }

    #[test]
    fn out_of_range_key_is_an_invariant_violation() {
        let p = partition(1, &[]);
        let expr = SparseExpr::from_linear("raw", [(v(5), 1.0)]).unwrap();
        assert!(NativeExpr::build(&expr, &p).is_err());
    }

    #[test]
    fn hessian_doubles_squares_and_keeps_cross_terms() {
        // 3 x0^2 + 2 x0 x1 + x1^2
        let part = QuadraticPart {
            terms: vec![(0, 0, 3.0), (0, 1, 2.0), (1, 1, 1.0)],
        };
        let hessian = part.hessian(3);
        assert_eq!(hessian.start, vec![0, 2, 3]);
        assert_eq!(hessian.index, vec![0, 1, 1]);
        assert_eq!(hessian.value, vec![6.0, 2.0, 2.0]);
        assert_eq!(hessian.nnz(), 3);
    }

    #[test]
    fn empty_hessian_has_one_start_per_column() {
        let hessian = QuadraticPart::default().hessian(2);
        assert_eq!(hessian.start, vec![0, 0]);
        assert!(hessian.index.is_empty());
    }
}
