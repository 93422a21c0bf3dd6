//! Solver error types.

/// Error type for build and solve operations.
///
/// Optimization outcomes such as infeasibility are reported through
/// [`crate::State`], never through this type.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The native library rejected a column, row, or objective registration.
    Construction {
        /// Build stage that failed (e.g. `add_col`, `add_row`).
        stage: String,
        message: String,
    },
    /// The native library failed while running, reporting status, or
    /// returning values.
    Solve {
        /// Native operation that failed (e.g. `run`, `get_solution`).
        operation: String,
        message: String,
    },
    /// An internal invariant does not hold.
    InvariantViolation(String),
    /// The input model or its fixed values are invalid.
    InvalidModel(String),
}

impl SolverError {
    pub fn construction(stage: impl Into<String>, message: impl std::fmt::Display) -> Self {
        SolverError::Construction {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    pub fn solve(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        SolverError::Solve {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::Construction { .. } => "SOLVER_CONSTRUCTION",
            SolverError::Solve { .. } => "SOLVER_SOLVE",
            SolverError::InvariantViolation(_) => "SOLVER_INVARIANT",
            SolverError::InvalidModel(_) => "MODEL_INVALID",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::Construction { stage, message } => write!(
                f,
                "[{}] Native model construction failed at {}: {}",
                self.code(),
                stage,
                message
            ),
            SolverError::Solve { operation, message } => write!(
                f,
                "[{}] Native solve failed during {}: {}",
                self.code(),
                operation,
                message
            ),
            SolverError::InvariantViolation(msg) => {
                write!(f, "[{}] Internal invariant violated: {}", self.code(), msg)
            }
            SolverError::InvalidModel(msg) => {
                write!(f, "[{}] Invalid model: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_construction() {
        let err = SolverError::construction("add_row", "status -1");
        let msg = format!("{}", err);
        assert!(msg.contains("SOLVER_CONSTRUCTION"));
        assert!(msg.contains("add_row"));
        assert!(msg.contains("status -1"));
    }

    #[test]
    fn test_error_display_solve() {
        let err = SolverError::solve("run", "returned error");
        let msg = format!("{}", err);
        assert!(msg.contains("SOLVER_SOLVE"));
        assert!(msg.contains("run"));
    }

    #[test]
    fn test_error_display_invariant() {
        let err = SolverError::InvariantViolation("variable 3 has no column".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("SOLVER_INVARIANT"));
        assert!(msg.contains("variable 3"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            SolverError::construction("add_col", "").code(),
            "SOLVER_CONSTRUCTION"
        );
        assert_eq!(SolverError::solve("run", "").code(), "SOLVER_SOLVE");
        assert_eq!(
            SolverError::InvalidModel(String::new()).code(),
            "MODEL_INVALID"
        );
    }
}
