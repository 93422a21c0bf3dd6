//! Model error types.

use tether_expr::{ExprError, VariableId};

/// Errors that can occur while assembling or reducing a model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Invalid variable ID
    InvalidVariableId(VariableId),
    /// Invalid variable bounds
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Objective weight is not finite
    InvalidWeight { weight: f64 },
    /// Pinned value of a fixed variable is not finite
    InvalidFixedValue { var_id: VariableId, value: f64 },
    /// A constraint row without any bound
    UnconstrainedRow { name: String },
    /// Expression construction or compensation failed
    Expr(ExprError),
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidWeight { .. } => "VARIABLE_INVALID_WEIGHT",
            ModelError::InvalidFixedValue { .. } => "VARIABLE_INVALID_FIXED_VALUE",
            ModelError::UnconstrainedRow { .. } => "CONSTRAINT_UNCONSTRAINED",
            ModelError::Expr(err) => err.code(),
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidVariableId(id) => {
                write!(f, "[{}] Variable ID {} does not exist", self.code(), id)
            }
            ModelError::InvalidVariableBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidWeight { weight } => write!(
                f,
                "[{}] Objective weight must be finite (got {})",
                self.code(),
                weight
            ),
            ModelError::InvalidFixedValue { var_id, value } => write!(
                f,
                "[{}] Variable {} cannot be fixed at {}",
                self.code(),
                var_id,
                value
            ),
            ModelError::UnconstrainedRow { name } => write!(
                f,
                "[{}] Constraint '{}' has no bound",
                self.code(),
                name
            ),
            ModelError::Expr(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Expr(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExprError> for ModelError {
    fn from(err: ExprError) -> Self {
        ModelError::Expr(err)
    }
}
