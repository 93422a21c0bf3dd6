//! Model builder methods for adding variables, fixed values, constraints, and objectives.

use crate::model::error::ModelError;
use crate::model::{Model, variable_id};
use crate::types::{Sense, Variable};
use tether_expr::{BoundSpec, SparseExpr, VariableId};

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        let bounds = variable.bounds;
        if bounds.lower.is_nan() || bounds.upper.is_nan() || bounds.lower > bounds.upper {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        // Binary clamping can still invert bounds that lie outside [0, 1].
        let effective = variable.effective_bounds();
        if effective.lower > effective.upper {
            return Err(ModelError::InvalidVariableBounds {
                lower: effective.lower,
                upper: effective.upper,
            });
        }
        if let Some(weight) = variable.weight
            && !weight.is_finite()
        {
            return Err(ModelError::InvalidWeight { weight });
        }

        let id = variable_id(self.variables.len());
        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            var_id = id.inner(),
            name = %variable.name,
            lower = bounds.lower,
            upper = bounds.upper,
            kind = ?variable.kind,
            "Added variable"
        );
        self.variables.push(variable);
        Ok(id)
    }

    /// Pin a variable to a value. The variable leaves the solved set.
    pub fn fix_variable(&mut self, id: VariableId, value: f64) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        if !value.is_finite() {
            return Err(ModelError::InvalidFixedValue { var_id: id, value });
        }
        self.fixed.insert(id, value);
        tracing::debug!(
            component = "model",
            operation = "fix_variable",
            status = "success",
            var_id = id.inner(),
            value,
            "Fixed variable"
        );
        Ok(())
    }

    /// Return a fixed variable to the solved set. Returns the value it was
    /// pinned to, if any.
    pub fn unfix_variable(&mut self, id: VariableId) -> Result<Option<f64>, ModelError> {
        self.ensure_variable_exists(id)?;
        Ok(self.fixed.remove(&id))
    }

    /// Add a constraint row. Returns its position among the constraints.
    pub fn add_constraint(&mut self, expr: SparseExpr) -> Result<usize, ModelError> {
        if !expr.bounds().is_constraint() {
            return Err(ModelError::UnconstrainedRow {
                name: expr.name().to_string(),
            });
        }
        expr.bounds().validate()?;
        self.ensure_expr_variables_exist(&expr)?;

        let index = self.constraints.len();
        tracing::trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint = index,
            name = expr.name(),
            bounds = expr.bounds().as_str(),
            linear_terms = expr.linear().len(),
            quadratic_terms = expr.quadratic().len(),
            "Added constraint"
        );
        self.constraints.push(expr);
        Ok(index)
    }

    /// Set the objective row and sense. Any bound on `expr` is dropped.
    pub fn set_objective(&mut self, expr: SparseExpr, sense: Sense) -> Result<(), ModelError> {
        self.ensure_expr_variables_exist(&expr)?;
        self.objective = expr.with_bounds(BoundSpec::Unconstrained);
        self.sense = sense;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            linear_terms = self.objective.linear().len(),
            quadratic_terms = self.objective.quadratic().len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize an expression.
    pub fn minimize(&mut self, expr: SparseExpr) -> Result<(), ModelError> {
        self.set_objective(expr, Sense::Minimize)
    }

    /// Maximize an expression.
    pub fn maximize(&mut self, expr: SparseExpr) -> Result<(), ModelError> {
        self.set_objective(expr, Sense::Maximize)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::model::{Model, ModelError};
    use crate::types::{Bounds, Sense, Variable};
    use tether_expr::{BoundSpec, SparseExpr, VariableId};

    #[test]
    fn add_variable_rejects_inverted_bounds() {
        let mut model = Model::new();
        let result = model.add_variable(Variable::continuous("x", Bounds::new(2.0, 1.0)));
        assert_eq!(
            result,
            Err(ModelError::InvalidVariableBounds {
                lower: 2.0,
                upper: 1.0
            })
        );
    }

    #[test]
    fn add_variable_rejects_binary_bounds_outside_unit_interval() {
        let mut model = Model::new();
        let shifted = Variable {
            bounds: Bounds::new(2.0, 5.0),
            ..Variable::binary("b")
        };
        assert_eq!(
            model.add_variable(shifted),
            Err(ModelError::InvalidVariableBounds {
                lower: 2.0,
                upper: 1.0
            })
        );
        assert_eq!(model.num_variables(), 0);

        let wide = Variable {
            bounds: Bounds::new(-1.0, 3.0),
            ..Variable::binary("w")
        };
        assert!(model.add_variable(wide).is_ok());
    }

    #[test]
    fn add_variable_rejects_non_finite_weight() {
        let mut model = Model::new();
        let var = Variable::continuous("x", Bounds::free()).with_weight(f64::NAN);
        assert!(matches!(
            model.add_variable(var),
            Err(ModelError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn fix_variable_validates_id_and_value() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()))
            .unwrap();

        assert_eq!(
            model.fix_variable(VariableId::new(5), 1.0),
            Err(ModelError::InvalidVariableId(VariableId::new(5)))
        );
        assert!(matches!(
            model.fix_variable(x, f64::INFINITY),
            Err(ModelError::InvalidFixedValue { .. })
        ));

        model.fix_variable(x, 3.0).unwrap();
        assert!(model.is_fixed(x));
        assert_eq!(model.unfix_variable(x).unwrap(), Some(3.0));
        assert!(!model.is_fixed(x));
    }

    #[test]
    fn add_constraint_requires_bounds_and_known_variables() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()))
            .unwrap();

        let free_row = SparseExpr::from_linear("free", [(x, 1.0)]).unwrap();
        assert!(matches!(
            model.add_constraint(free_row),
            Err(ModelError::UnconstrainedRow { .. })
        ));

        let unknown = SparseExpr::from_linear("unknown", [(VariableId::new(3), 1.0)])
            .unwrap()
            .with_bounds(BoundSpec::Upper(1.0));
        assert_eq!(
            model.add_constraint(unknown),
            Err(ModelError::InvalidVariableId(VariableId::new(3)))
        );

        let nan_bound = SparseExpr::from_linear("nan", [(x, 1.0)])
            .unwrap()
            .with_bounds(BoundSpec::Lower(f64::NAN));
        assert!(matches!(
            model.add_constraint(nan_bound),
            Err(ModelError::Expr(_))
        ));

        let cap = SparseExpr::from_linear("cap", [(x, 1.0)])
            .unwrap()
            .with_bounds(BoundSpec::Upper(10.0));
        assert_eq!(model.add_constraint(cap).unwrap(), 0);
        assert_eq!(model.num_constraints(), 1);
    }

    #[test]
    fn set_objective_drops_bounds() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()))
            .unwrap();
        let expr = SparseExpr::from_linear("obj", [(x, 1.0)])
            .unwrap()
            .with_bounds(BoundSpec::Lower(0.0));
        model.set_objective(expr, Sense::Maximize).unwrap();
        assert_eq!(model.objective().bounds(), BoundSpec::Unconstrained);
        assert!(model.is_maximization());
    }
}
