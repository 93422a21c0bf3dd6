//! Expression construction errors.

#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// A coefficient or constant was NaN or infinite.
    NonFiniteCoefficient { coefficient: f64 },
    /// A bound threshold was NaN.
    NanBound,
    /// A two-sided bound whose sides are both infinite in the same direction.
    DegenerateBounds { lower: f64, upper: f64 },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::NonFiniteCoefficient { .. } => "EXPR_NON_FINITE_COEFFICIENT",
            ExprError::NanBound => "EXPR_NAN_BOUND",
            ExprError::DegenerateBounds { .. } => "EXPR_DEGENERATE_BOUNDS",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::NonFiniteCoefficient { coefficient } => write!(
                f,
                "[{}] Coefficients must be finite (got {})",
                self.code(),
                coefficient
            ),
            ExprError::NanBound => write!(f, "[{}] Bound thresholds must not be NaN", self.code()),
            ExprError::DegenerateBounds { lower, upper } => write!(
                f,
                "[{}] Bounds [{}, {}] cannot be satisfied by any finite value",
                self.code(),
                lower,
                upper
            ),
        }
    }
}

impl std::error::Error for ExprError {}

#[cfg(test)]
mod tests {
    use super::ExprError;

    #[test]
    fn error_code_is_stable() {
        assert_eq!(
            ExprError::NonFiniteCoefficient { coefficient: 1.0 }.code(),
            "EXPR_NON_FINITE_COEFFICIENT"
        );
        assert_eq!(ExprError::NanBound.code(), "EXPR_NAN_BOUND");
    }

    #[test]
    fn display_prefixes_error_code() {
        let rendered = ExprError::NonFiniteCoefficient {
            coefficient: f64::INFINITY,
        }
        .to_string();
        assert!(rendered.starts_with("[EXPR_NON_FINITE_COEFFICIENT]"));
        assert!(rendered.contains("inf"));
    }
}
