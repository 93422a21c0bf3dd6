//! Canonical solve states.

use serde::{Deserialize, Serialize};

/// Solver-agnostic classification of a solve outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Proven optimal solution.
    Optimal,
    /// Stopped early (time, iteration, solution limits, objective targets)
    /// with a usable solution.
    Approximate,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Infeasible or unbounded; the solver could not tell which.
    Invalid,
    /// Solve not started or interrupted.
    Unexplored,
    /// Anything else.
    Failed,
}

impl State {
    /// Check if the state indicates an optimal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, State::Optimal)
    }

    /// Check if the state carries a solution that can be read back.
    pub fn is_feasible(self) -> bool {
        matches!(self, State::Optimal | State::Approximate)
    }

    /// Check if the state indicates infeasibility.
    pub fn is_infeasible(self) -> bool {
        matches!(self, State::Infeasible)
    }

    /// Check if the state indicates unboundedness.
    pub fn is_unbounded(self) -> bool {
        matches!(self, State::Unbounded)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            State::Optimal => "optimal",
            State::Approximate => "approximate",
            State::Infeasible => "infeasible",
            State::Unbounded => "unbounded",
            State::Invalid => "invalid",
            State::Unexplored => "unexplored",
            State::Failed => "failed",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
