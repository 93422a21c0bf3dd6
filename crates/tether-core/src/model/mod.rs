//! Model module holding the data a native backend consumes.
//!
//! The model is deliberately thin: it stores variables, pinned values,
//! constraint rows and the objective, and validates what it is given. It
//! performs no reduction itself; see [`crate::partition`] and
//! [`crate::compensate`].
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives

mod builder;
mod error;

use crate::types::{Sense, Variable};
use std::collections::BTreeMap;
use tether_expr::{SparseExpr, VariableId};

pub use error::ModelError;

/// An optimization model: variables, fixed values, constraint rows and an
/// objective row.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) fixed: BTreeMap<VariableId, f64>,
    pub(crate) constraints: Vec<SparseExpr>,
    pub(crate) objective: SparseExpr,
    pub(crate) sense: Sense,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Pinned values of fixed variables.
    pub fn fixed_values(&self) -> &BTreeMap<VariableId, f64> {
        &self.fixed
    }

    pub fn is_fixed(&self, id: VariableId) -> bool {
        self.fixed.contains_key(&id)
    }

    pub fn constraints(&self) -> &[SparseExpr] {
        &self.constraints
    }

    /// The objective row as set, without variable weights.
    pub fn objective(&self) -> &SparseExpr {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn is_maximization(&self) -> bool {
        self.sense == Sense::Maximize
    }

    /// The objective row with every variable weight merged in as a linear
    /// term. This is the complete objective a backend has to register.
    pub fn effective_objective(&self) -> Result<SparseExpr, ModelError> {
        let mut objective = self.objective.clone();
        for (index, variable) in self.variables.iter().enumerate() {
            if let Some(weight) = variable.weight {
                objective.add_linear(variable_id(index), weight)?;
            }
        }
        Ok(objective)
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_expr_variables_exist(&self, expr: &SparseExpr) -> Result<(), ModelError> {
        for var_id in expr.variables() {
            self.ensure_variable_exists(var_id)?;
        }
        Ok(())
    }
}

pub(crate) fn variable_id(index: usize) -> VariableId {
    VariableId::new(index as u32)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::Bounds;
    use tether_expr::BoundSpec;

    #[test]
    fn test_new_model_is_empty() {
        let model = Model::new();
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(model.sense(), Sense::Minimize);
    }

    #[test]
    fn test_effective_objective_merges_weights() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()).with_weight(2.0))
            .unwrap();
        let y = model
            .add_variable(Variable::continuous("y", Bounds::non_negative()))
            .unwrap();
        model
            .maximize(SparseExpr::from_linear("obj", [(x, 1.0), (y, 3.0)]).unwrap())
            .unwrap();

        let objective = model.effective_objective().unwrap();
        assert_eq!(objective.linear_coefficient(x), 3.0);
        assert_eq!(objective.linear_coefficient(y), 3.0);
        assert_eq!(objective.bounds(), BoundSpec::Unconstrained);
        // Stored objective stays untouched.
        assert_eq!(model.objective().linear_coefficient(x), 1.0);
    }

    #[test]
    fn test_weight_cancelling_objective_term_is_removed() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()).with_weight(-1.0))
            .unwrap();
        model
            .minimize(SparseExpr::from_linear("obj", [(x, 1.0)]).unwrap())
            .unwrap();
        assert!(model.effective_objective().unwrap().is_empty());
    }
}
