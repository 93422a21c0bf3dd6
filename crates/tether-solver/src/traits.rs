//! Solver traits for abstraction over different solver backends.

use crate::{SolverError, State};

/// Trait for accessing solution data from a solver.
pub trait SolutionView {
    /// Get the objective value of the solution.
    fn objective_value(&self) -> f64;

    /// Get the canonical state.
    fn state(&self) -> State;

    /// Get the primal value at the given free-variable position.
    fn get_primal(&self, index: usize) -> Option<f64>;

    /// Get all primal values as a slice.
    fn primal_values(&self) -> &[f64];

    /// Check if the solution is optimal.
    fn is_optimal(&self) -> bool {
        self.state().is_optimal()
    }

    /// Check if the solution is feasible.
    fn is_feasible(&self) -> bool {
        self.state().is_feasible()
    }

    /// Check if the solution is infeasible.
    fn is_infeasible(&self) -> bool {
        self.state().is_infeasible()
    }

    /// Check if the solution is unbounded.
    fn is_unbounded(&self) -> bool {
        self.state().is_unbounded()
    }
}

/// Trait for solver implementations.
///
/// A built solver owns its native problem; configuration is supplied when
/// the solver is built, so `solve` takes no arguments.
pub trait Solve {
    /// The solution type returned by this solver.
    type Solution: SolutionView;

    /// Run the native solver and translate its outcome.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` when the native library fails while running,
    /// reporting status, or returning values. Infeasible or unbounded
    /// outcomes are states, not errors.
    fn solve(&mut self) -> Result<Self::Solution, SolverError>;
}
