//! Core expression type: sparse linear and quadratic maps, constant, bounds.
//!
//! Coefficient maps never hold an explicit zero. Absence of a key means the
//! coefficient is zero, and every mutation that would produce a zero removes
//! the key instead.

use crate::expr::bounds::BoundSpec;
use crate::expr::error::ExprError;
use crate::ids::VariableId;
use std::collections::{BTreeMap, BTreeSet};

/// Unordered pair of variables addressing a quadratic coefficient.
///
/// The pair is normalised so that `row <= col`; `(x, y)` and `(y, x)` are the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadKey {
    row: VariableId,
    col: VariableId,
}

impl QuadKey {
    pub fn new(a: VariableId, b: VariableId) -> Self {
        if a <= b {
            Self { row: a, col: b }
        } else {
            Self { row: b, col: a }
        }
    }

    pub fn row(self) -> VariableId {
        self.row
    }

    pub fn col(self) -> VariableId {
        self.col
    }

    /// Whether both sides are the same variable (`x * x`).
    pub fn is_square(self) -> bool {
        self.row == self.col
    }
}

/// One row of a model: the objective or a constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseExpr {
    name: String,
    linear: BTreeMap<VariableId, f64>,
    quadratic: BTreeMap<QuadKey, f64>,
    constant: f64,
    bounds: BoundSpec,
}

fn ensure_finite(coefficient: f64) -> Result<(), ExprError> {
    if coefficient.is_finite() {
        Ok(())
    } else {
        Err(ExprError::NonFiniteCoefficient { coefficient })
    }
}

impl SparseExpr {
    // ── Constructors ────────────────────────────────────────

    /// Empty, unconstrained expression.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Expression from linear terms. Duplicate keys are summed.
    pub fn from_linear(
        name: impl Into<String>,
        terms: impl IntoIterator<Item = (VariableId, f64)>,
    ) -> Result<Self, ExprError> {
        let mut expr = Self::new(name);
        for (var_id, coeff) in terms {
            expr.add_linear(var_id, coeff)?;
        }
        Ok(expr)
    }

    /// Replace the bound specification.
    pub fn with_bounds(mut self, bounds: BoundSpec) -> Self {
        self.bounds = bounds;
        self
    }

    /// Builder form of [`SparseExpr::add_quadratic`].
    pub fn with_quadratic(
        mut self,
        a: VariableId,
        b: VariableId,
        coeff: f64,
    ) -> Result<Self, ExprError> {
        self.add_quadratic(a, b, coeff)?;
        Ok(self)
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> BoundSpec {
        self.bounds
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear(&self) -> &BTreeMap<VariableId, f64> {
        &self.linear
    }

    pub fn quadratic(&self) -> &BTreeMap<QuadKey, f64> {
        &self.quadratic
    }

    /// Linear coefficient of `var_id`, zero when absent.
    pub fn linear_coefficient(&self, var_id: VariableId) -> f64 {
        self.linear.get(&var_id).copied().unwrap_or(0.0)
    }

    /// Quadratic coefficient of the unordered pair, zero when absent.
    pub fn quadratic_coefficient(&self, a: VariableId, b: VariableId) -> f64 {
        self.quadratic
            .get(&QuadKey::new(a, b))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn has_quadratic(&self) -> bool {
        !self.quadratic.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.linear.is_empty() && self.quadratic.is_empty()
    }

    /// Max degree of any term (0 = constant only).
    pub fn degree(&self) -> usize {
        if !self.quadratic.is_empty() {
            2
        } else {
            usize::from(!self.linear.is_empty())
        }
    }

    /// Every variable referenced by a linear or quadratic term.
    pub fn variables(&self) -> BTreeSet<VariableId> {
        let mut vars: BTreeSet<VariableId> = self.linear.keys().copied().collect();
        for key in self.quadratic.keys() {
            vars.insert(key.row());
            vars.insert(key.col());
        }
        vars
    }

    /// Evaluate the expression value (constant included) at a point.
    pub fn evaluate(&self, value_of: impl Fn(VariableId) -> f64) -> f64 {
        let linear: f64 = self
            .linear
            .iter()
            .map(|(var_id, coeff)| coeff * value_of(*var_id))
            .sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .map(|(key, coeff)| coeff * value_of(key.row()) * value_of(key.col()))
            .sum();
        self.constant + linear + quadratic
    }

    // ── Mutation ────────────────────────────────────────────

    pub fn set_bounds(&mut self, bounds: BoundSpec) {
        self.bounds = bounds;
    }

    pub fn set_constant(&mut self, constant: f64) -> Result<(), ExprError> {
        ensure_finite(constant)?;
        self.constant = constant;
        Ok(())
    }

    pub fn add_constant(&mut self, value: f64) -> Result<(), ExprError> {
        self.set_constant(self.constant + value)
    }

    /// Overwrite the linear coefficient of `var_id`; zero removes the term.
    pub fn set_linear(&mut self, var_id: VariableId, coeff: f64) -> Result<(), ExprError> {
        ensure_finite(coeff)?;
        if coeff == 0.0 {
            self.linear.remove(&var_id);
        } else {
            self.linear.insert(var_id, coeff);
        }
        Ok(())
    }

    /// Add to the linear coefficient of `var_id`, merging with any existing
    /// term. A sum of exactly zero removes the term.
    pub fn add_linear(&mut self, var_id: VariableId, coeff: f64) -> Result<(), ExprError> {
        let merged = self.linear_coefficient(var_id) + coeff;
        self.set_linear(var_id, merged)
    }

    /// Overwrite the quadratic coefficient of the unordered pair.
    pub fn set_quadratic(
        &mut self,
        a: VariableId,
        b: VariableId,
        coeff: f64,
    ) -> Result<(), ExprError> {
        ensure_finite(coeff)?;
        let key = QuadKey::new(a, b);
        if coeff == 0.0 {
            self.quadratic.remove(&key);
        } else {
            self.quadratic.insert(key, coeff);
        }
        Ok(())
    }

    /// Add to the quadratic coefficient of the unordered pair.
    pub fn add_quadratic(
        &mut self,
        a: VariableId,
        b: VariableId,
        coeff: f64,
    ) -> Result<(), ExprError> {
        let merged = self.quadratic_coefficient(a, b) + coeff;
        self.set_quadratic(a, b, merged)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn v(index: u32) -> VariableId {
        VariableId::new(index)
    }

    #[test]
    fn quad_key_is_unordered() {
        assert_eq!(QuadKey::new(v(3), v(1)), QuadKey::new(v(1), v(3)));
        let key = QuadKey::new(v(5), v(2));
        assert_eq!(key.row(), v(2));
        assert_eq!(key.col(), v(5));
        assert!(QuadKey::new(v(4), v(4)).is_square());
    }

    #[test]
    fn zero_coefficients_are_never_stored() {
        let mut expr = SparseExpr::new("row");
        expr.set_linear(v(0), 0.0).unwrap();
        expr.set_quadratic(v(0), v(1), 0.0).unwrap();
        assert!(expr.is_empty());

        expr.add_linear(v(0), 2.0).unwrap();
        expr.add_linear(v(0), -2.0).unwrap();
        assert!(!expr.linear().contains_key(&v(0)));
    }

    #[test]
    fn add_linear_merges_existing_term() {
        let expr = SparseExpr::from_linear("row", [(v(1), 1.5), (v(1), 2.0), (v(2), 1.0)]).unwrap();
        assert_eq!(expr.linear().len(), 2);
        assert_eq!(expr.linear_coefficient(v(1)), 3.5);
        assert_eq!(expr.linear_coefficient(v(9)), 0.0);
    }

    #[test]
    fn add_quadratic_merges_symmetric_pairs() {
        let mut expr = SparseExpr::new("q");
        expr.add_quadratic(v(0), v(1), 1.0).unwrap();
        expr.add_quadratic(v(1), v(0), 2.0).unwrap();
        assert_eq!(expr.quadratic().len(), 1);
        assert_eq!(expr.quadratic_coefficient(v(0), v(1)), 3.0);
        assert_eq!(expr.degree(), 2);
    }

    #[test]
    fn non_finite_coefficients_are_rejected() {
        let mut expr = SparseExpr::new("row");
        assert!(matches!(
            expr.set_linear(v(0), f64::NAN),
            Err(ExprError::NonFiniteCoefficient { .. })
        ));
        assert!(expr.add_quadratic(v(0), v(0), f64::INFINITY).is_err());
        assert!(expr.set_constant(f64::NEG_INFINITY).is_err());
        assert!(expr.is_empty());
    }

    #[test]
    fn evaluate_includes_every_term() {
        let expr = SparseExpr::from_linear("row", [(v(0), 2.0), (v(1), -1.0)])
            .unwrap()
            .with_quadratic(v(0), v(1), 3.0)
            .unwrap();
        let values = [2.0, 5.0];
        // 2*2 - 5 + 3*2*5
        assert_eq!(expr.evaluate(|id| values[id.index()]), 29.0);
    }

    #[test]
    fn variables_collects_linear_and_quadratic_keys() {
        let expr = SparseExpr::from_linear("row", [(v(4), 1.0)])
            .unwrap()
            .with_quadratic(v(2), v(7), 1.0)
            .unwrap();
        let vars: Vec<_> = expr.variables().into_iter().collect();
        assert_eq!(vars, vec![v(2), v(4), v(7)]);
    }

    #[test]
    fn with_bounds_sets_shape() {
        let expr = SparseExpr::new("cap").with_bounds(BoundSpec::Upper(10.0));
        assert_eq!(expr.bounds(), BoundSpec::Upper(10.0));
        assert_eq!(expr.name(), "cap");
        assert_eq!(expr.degree(), 0);
    }
}
