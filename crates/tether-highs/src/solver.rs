//! HiGHS solver implementation.

use crate::environment::{Configurator, DefaultConfigurator, Environment};
use crate::ffi::{HighsHandle, HighsOption, highs_version};
use crate::status::{MODEL_STATUS_MODEL_EMPTY, status_name, translate};
use std::sync::Arc;
use std::time::Instant;
use tether_core::VariablePartition;
use tether_solver::{Solve, SolveResult, SolverConfig, SolverError, State};
use tracing::{debug, warn};

/// A built native problem ready to solve.
///
/// Owns its HiGHS instance exclusively; use it from one thread at a time.
/// The instance is released by [`HighsSolver::dispose`] or on drop.
pub struct HighsSolver {
    environment: Arc<Environment>,
    handle: HighsHandle,
    partition: VariablePartition,
    config: SolverConfig,
    configurators: Vec<Box<dyn Configurator>>,
    objective_offset: f64,
}

impl HighsSolver {
    pub(crate) fn new(
        environment: Arc<Environment>,
        handle: HighsHandle,
        partition: VariablePartition,
        config: SolverConfig,
        objective_offset: f64,
    ) -> Self {
        Self {
            environment,
            handle,
            partition,
            config,
            configurators: Vec::new(),
            objective_offset,
        }
    }

    /// Register a hook run before each solve, after the default
    /// configuration and any hook registered earlier.
    pub fn add_configurator(&mut self, configurator: impl Configurator + 'static) {
        self.configurators.push(Box::new(configurator));
    }

    /// Builder form of [`HighsSolver::add_configurator`].
    pub fn with_configurator(mut self, configurator: impl Configurator + 'static) -> Self {
        self.add_configurator(configurator);
        self
    }

    pub fn num_configurators(&self) -> usize {
        self.configurators.len()
    }

    /// Free/fixed split used at build time. `solution[i]` of a result is the
    /// value of `partition().free_variables()[i]`.
    pub fn partition(&self) -> &VariablePartition {
        &self.partition
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Set the solver configuration.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// Native handle, for diagnostics.
    pub fn handle(&self) -> &HighsHandle {
        &self.handle
    }

    /// Release the native model. Calling this more than once is a no-op.
    pub fn dispose(&mut self) {
        self.handle.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }

    fn configure(&mut self) -> Result<(), SolverError> {
        DefaultConfigurator.configure(&self.environment, &mut self.handle, &self.config)?;
        for configurator in &self.configurators {
            configurator.configure(&self.environment, &mut self.handle, &self.config)?;
        }

        let console = self.config.log_to_console == Some(true);
        self.handle
            .set_option("output_flag", &HighsOption::Bool(console))
            .map_err(|err| SolverError::solve("set_option", err))?;
        if console {
            self.handle
                .set_option("log_to_console", &HighsOption::Bool(true))
                .map_err(|err| SolverError::solve("set_option", err))?;
        }
        Ok(())
    }

    /// Run HiGHS and translate the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Solve`] when a configurator, the run, the
    /// status read, or the value extraction fails. Infeasible, unbounded and
    /// other non-feasible outcomes are reported through the result state.
    pub fn solve(&mut self) -> Result<SolveResult, SolverError> {
        let solver_version = self
            .environment
            .version()
            .map(str::to_string)
            .or_else(highs_version)
            .unwrap_or_else(|| "unknown".to_string());
        let solve_started = Instant::now();
        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            solver = "highs",
            solver_version = %solver_version,
            num_free = self.partition.num_free(),
            num_fixed = self.partition.num_fixed(),
            configurators = self.configurators.len(),
            "Starting solve process"
        );

        self.configure()?;

        self.handle
            .run()
            .map_err(|err| SolverError::solve("run", err))?;
        let code = self
            .handle
            .model_status()
            .map_err(|err| SolverError::solve("get_model_status", err))?;
        let state = translate(code);
        let duration_ms = solve_started.elapsed().as_secs_f64() * 1000.0;
        let simplex_iterations = self.handle.simplex_iteration_count();

        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            solver = "highs",
            solver_version = %solver_version,
            model_status = status_name(code),
            status_code = code,
            state = state.as_str(),
            simplex_iterations,
            duration_ms,
            "HiGHS solve completed"
        );

        if !state.is_feasible() {
            return Ok(SolveResult::without_solution(state, self.partition.num_free()));
        }
        if state == State::Approximate {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                model_status = status_name(code),
                duration_ms,
                "Solver hit limit but returning best solution found"
            );
        }

        // Without columns the objective is its constant.
        let value = if code == MODEL_STATUS_MODEL_EMPTY || self.partition.num_free() == 0 {
            self.objective_offset
        } else {
            self.handle
                .objective_value()
                .map_err(|err| SolverError::solve("get_objective_value", err))?
        };
        let col_values = self
            .handle
            .col_values()
            .map_err(|err| SolverError::solve("get_solution", err))?;

        let num_free = self.partition.num_free();
        if col_values.len() != num_free {
            return Err(SolverError::InvariantViolation(format!(
                "HiGHS returned {} column values for {} free variables",
                col_values.len(),
                num_free
            )));
        }
        // Column i was registered for free position i.
        let solution = col_values;

        debug!(
            component = "solver",
            operation = "extract_solution",
            status = "success",
            objective_value = value,
            num_primal_values = solution.len(),
            "Solution extracted"
        );

        Ok(SolveResult::new(state, value, solution))
    }
}

impl Solve for HighsSolver {
    type Solution = SolveResult;

    fn solve(&mut self) -> Result<Self::Solution, SolverError> {
        HighsSolver::solve(self)
    }
}

impl std::fmt::Debug for HighsSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighsSolver")
            .field("handle", &self.handle)
            .field("num_free", &self.partition.num_free())
            .field("num_fixed", &self.partition.num_fixed())
            .field("configurators", &self.configurators.len())
            .field("objective_offset", &self.objective_offset)
            .finish_non_exhaustive()
    }
}
