//! Immutable solve result.

use crate::State;
use crate::traits::SolutionView;
use serde::Serialize;

/// Outcome of one solve call.
///
/// `solution` is dense and indexed by free-variable position: `solution[i]`
/// is the value of the `i`-th free variable in the order used at build time.
/// When the state is not feasible the value is `NaN` and the solution is
/// zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    state: State,
    value: f64,
    solution: Vec<f64>,
}

impl SolveResult {
    pub fn new(state: State, value: f64, solution: Vec<f64>) -> Self {
        Self {
            state,
            value,
            solution,
        }
    }

    /// Result for a state without a readable solution.
    pub fn without_solution(state: State, num_free: usize) -> Self {
        Self::new(state, f64::NAN, vec![0.0; num_free])
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Objective value, `NaN` unless the state is feasible.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    pub fn into_solution(self) -> Vec<f64> {
        self.solution
    }
}

impl SolutionView for SolveResult {
    fn objective_value(&self) -> f64 {
        self.value
    }

    fn state(&self) -> State {
        self.state
    }

    fn get_primal(&self, index: usize) -> Option<f64> {
        self.solution.get(index).copied()
    }

    fn primal_values(&self) -> &[f64] {
        &self.solution
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_without_solution_is_nan_and_zero_filled() {
        let result = SolveResult::without_solution(State::Infeasible, 3);
        assert!(result.value().is_nan());
        assert_eq!(result.solution(), &[0.0, 0.0, 0.0]);
        assert!(!result.is_feasible());
    }

    #[test]
    fn test_solution_view_reads_positions() {
        let result = SolveResult::new(State::Optimal, 10.0, vec![4.0, 6.0]);
        assert_eq!(result.objective_value(), 10.0);
        assert_eq!(result.get_primal(1), Some(6.0));
        assert_eq!(result.get_primal(2), None);
        assert!(result.is_optimal());
    }

    #[test]
    fn test_serialize() {
        let result = SolveResult::new(State::Approximate, 1.5, vec![1.5]);
        let rendered = serde_json::to_string(&result).unwrap();
        assert_eq!(
            rendered,
            r#"{"state":"approximate","value":1.5,"solution":[1.5]}"#
        );
    }
}
