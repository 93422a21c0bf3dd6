//! Model builder: turns a `tether_core::Model` into a native HiGHS problem.

use crate::constraint::register_constraint;
use crate::environment::Environment;
use crate::expression::NativeExpr;
use crate::ffi::{HighsHandle, ObjectiveSense};
use crate::solver::HighsSolver;
use std::sync::Arc;
use std::time::Instant;
use tether_core::{Model, Sense, VariablePartition, compensate};
use tether_expr::{SparseExpr, VariableId};
use tether_solver::{SolverConfig, SolverError};
use tracing::{debug, trace};

fn invalid_model(err: tether_core::ModelError) -> SolverError {
    SolverError::InvalidModel(err.to_string())
}

/// Entry point of the HiGHS backend. Owns the shared [`Environment`] and
/// builds one [`HighsSolver`] per model.
#[derive(Debug, Clone, Default)]
pub struct Integration {
    environment: Arc<Environment>,
    config: SolverConfig,
}

impl Integration {
    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment: Arc::new(environment),
            config: SolverConfig::default(),
        }
    }

    /// Options record handed to every solver built from now on.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Whether HiGHS can represent `model`: every constraint must be linear
    /// once fixed variables are compensated, and a quadratic objective is
    /// only accepted when every free column is continuous.
    pub fn is_capable(&self, model: &Model) -> Result<bool, SolverError> {
        let partition = VariablePartition::from_model(model).map_err(invalid_model)?;
        for constraint in model.constraints() {
            if compensate(constraint, &partition)
                .map_err(invalid_model)?
                .has_quadratic()
            {
                return Ok(false);
            }
        }
        let objective = model.effective_objective().map_err(invalid_model)?;
        if compensate(&objective, &partition)
            .map_err(invalid_model)?
            .has_quadratic()
            && first_integral_free(model, &partition)?.is_some()
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// Build a native problem for `model`.
    ///
    /// Columns are the free variables in partition order; each constraint
    /// is compensated and registered; the compensated objective replaces
    /// the column costs, its quadratic part becomes the Hessian and its
    /// constant the objective offset.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidModel`] for invalid fixed values,
    /// [`SolverError::Construction`] when HiGHS rejects a column, row, or
    /// objective, and [`SolverError::InvariantViolation`] for rows that
    /// still reference fixed variables after compensation. A failed build
    /// releases the partially built native model.
    pub fn build(&self, model: &Model) -> Result<HighsSolver, SolverError> {
        let build_started = Instant::now();
        let partition = VariablePartition::from_model(model).map_err(invalid_model)?;
        let mut handle =
            HighsHandle::new().map_err(|err| SolverError::construction("create", err))?;

        add_columns(model, &partition, &mut handle)?;
        let num_rows = add_constraints(model, &partition, &mut handle)?;
        let objective_offset = set_objective(model, &partition, &mut handle)?;

        debug!(
            component = "builder",
            operation = "build",
            status = "success",
            num_cols = partition.num_free(),
            num_fixed = partition.num_fixed(),
            num_constraints = model.num_constraints(),
            num_rows,
            objective_offset,
            duration_ms = build_started.elapsed().as_secs_f64() * 1000.0,
            "Built HiGHS model"
        );

        Ok(HighsSolver::new(
            Arc::clone(&self.environment),
            handle,
            partition,
            self.config.clone(),
            objective_offset,
        ))
    }
}

fn add_columns(
    model: &Model,
    partition: &VariablePartition,
    handle: &mut HighsHandle,
) -> Result<(), SolverError> {
    for &var_id in partition.free_variables() {
        let var = model.get_variable(var_id).map_err(invalid_model)?;
        let bounds = var.effective_bounds();
        let col = handle
            .add_col(var.weight_or_zero(), bounds.lower, bounds.upper, &var.name)
            .map_err(|err| SolverError::construction("add_col", err))?;
        if var.kind.is_integral() {
            handle
                .set_integrality(col, true)
                .map_err(|err| SolverError::construction("change_col_integrality", err))?;
        }
        trace!(
            component = "builder",
            operation = "add_variable",
            status = "success",
            var_id = var_id.inner(),
            col,
            name = %var.name,
            lower = bounds.lower,
            upper = bounds.upper,
            kind = ?var.kind,
            "Added variable to HiGHS"
        );
    }
    debug!(
        component = "builder",
        operation = "add_variables",
        status = "success",
        num_cols = partition.num_free(),
        "Added all variables to HiGHS"
    );
    Ok(())
}

fn add_constraints(
    model: &Model,
    partition: &VariablePartition,
    handle: &mut HighsHandle,
) -> Result<usize, SolverError> {
    let mut num_rows = 0;
    for constraint in model.constraints() {
        let compensated = compensate(constraint, partition).map_err(invalid_model)?;
        let native = NativeExpr::build(&compensated, partition)?;
        num_rows += register_constraint(&native, &compensated.bounds(), compensated.name(), handle)?.len();
    }
    debug!(
        component = "builder",
        operation = "add_constraints",
        status = "success",
        num_constraints = model.num_constraints(),
        num_rows,
        "Added all constraints to HiGHS"
    );
    Ok(num_rows)
}

/// First free variable registered as an integer or binary column.
fn first_integral_free(
    model: &Model,
    partition: &VariablePartition,
) -> Result<Option<VariableId>, SolverError> {
    for &var_id in partition.free_variables() {
        if model.get_variable(var_id).map_err(invalid_model)?.kind.is_integral() {
            return Ok(Some(var_id));
        }
    }
    Ok(None)
}

/// Register the compensated objective. Returns its constant, which is the
/// objective offset.
fn set_objective(
    model: &Model,
    partition: &VariablePartition,
    handle: &mut HighsHandle,
) -> Result<f64, SolverError> {
    let objective: SparseExpr = model.effective_objective().map_err(invalid_model)?;
    let compensated = compensate(&objective, partition).map_err(invalid_model)?;
    let native = NativeExpr::build(&compensated, partition)?;

    // The objective row is authoritative; weights were merged into it.
    for col in 0..partition.num_free() {
        handle
            .set_col_cost(col, 0.0)
            .map_err(|err| SolverError::construction("change_col_cost", err))?;
    }
    for (col, coeff) in native.linear().iter() {
        handle
            .set_col_cost(col, coeff)
            .map_err(|err| SolverError::construction("change_col_cost", err))?;
    }

    if let Some(quadratic) = native.quadratic() {
        // HiGHS has no MIQP solver.
        if let Some(var_id) = first_integral_free(model, partition)? {
            return Err(SolverError::construction(
                "pass_hessian",
                format!("quadratic objective over integral variable {var_id} is not supported"),
            ));
        }
        let hessian = quadratic.hessian(partition.num_free());
        handle
            .pass_hessian(hessian.dim, &hessian.start, &hessian.index, &hessian.value)
            .map_err(|err| SolverError::construction("pass_hessian", err))?;
    }

    let offset = compensated.constant();
    handle
        .set_objective_offset(offset)
        .map_err(|err| SolverError::construction("change_objective_offset", err))?;

    let sense = match model.sense() {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    };
    handle
        .set_objective_sense(sense)
        .map_err(|err| SolverError::construction("change_objective_sense", err))?;

    debug!(
        component = "builder",
        operation = "set_objective",
        status = "success",
        sense = model.sense().as_str(),
        linear_terms = native.linear().len(),
        quadratic_terms = native.quadratic().map_or(0, |q| q.len()),
        offset,
        "Set objective function"
    );
    Ok(offset)
}
