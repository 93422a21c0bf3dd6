//! Bound specification of an expression row.

use crate::expr::error::ExprError;
use serde::{Deserialize, Serialize};

/// The constraint shape of an expression.
///
/// `Unconstrained` is used for the objective row, which is never registered
/// as a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BoundSpec {
    #[default]
    Unconstrained,
    Equality(f64),
    Lower(f64),
    Upper(f64),
    Both { lower: f64, upper: f64 },
}

impl BoundSpec {
    /// Build a bound specification from optional limits.
    ///
    /// Infinite limits on their own side (`-inf` lower, `+inf` upper) count as
    /// absent. Equal limits produce [`BoundSpec::Equality`].
    pub fn from_limits(lower: Option<f64>, upper: Option<f64>) -> Self {
        let lower = lower.filter(|value| *value != f64::NEG_INFINITY);
        let upper = upper.filter(|value| *value != f64::INFINITY);
        match (lower, upper) {
            (None, None) => BoundSpec::Unconstrained,
            (Some(lower), None) => BoundSpec::Lower(lower),
            (None, Some(upper)) => BoundSpec::Upper(upper),
            (Some(lower), Some(upper)) if lower == upper => BoundSpec::Equality(lower),
            (Some(lower), Some(upper)) => BoundSpec::Both { lower, upper },
        }
    }

    /// Lower threshold, if the row has one. Equality rows report their value.
    pub fn lower(&self) -> Option<f64> {
        match *self {
            BoundSpec::Equality(value) | BoundSpec::Lower(value) => Some(value),
            BoundSpec::Both { lower, .. } => Some(lower),
            BoundSpec::Upper(_) | BoundSpec::Unconstrained => None,
        }
    }

    /// Upper threshold, if the row has one. Equality rows report their value.
    pub fn upper(&self) -> Option<f64> {
        match *self {
            BoundSpec::Equality(value) | BoundSpec::Upper(value) => Some(value),
            BoundSpec::Both { upper, .. } => Some(upper),
            BoundSpec::Lower(_) | BoundSpec::Unconstrained => None,
        }
    }

    /// Subtract `delta` from every active threshold.
    ///
    /// Moving a constant `delta` from the expression side to the threshold
    /// side of `expr + delta <= upper` gives `expr <= upper - delta`; the same
    /// sign applies to lower and equality thresholds.
    pub fn shifted(self, delta: f64) -> Self {
        match self {
            BoundSpec::Unconstrained => BoundSpec::Unconstrained,
            BoundSpec::Equality(value) => BoundSpec::Equality(value - delta),
            BoundSpec::Lower(value) => BoundSpec::Lower(value - delta),
            BoundSpec::Upper(value) => BoundSpec::Upper(value - delta),
            BoundSpec::Both { lower, upper } => BoundSpec::Both {
                lower: lower - delta,
                upper: upper - delta,
            },
        }
    }

    /// Whether this row constrains anything.
    pub fn is_constraint(&self) -> bool {
        !matches!(self, BoundSpec::Unconstrained)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BoundSpec::Equality(_))
    }

    /// Check that thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::NanBound`] for NaN thresholds and
    /// [`ExprError::DegenerateBounds`] for thresholds no finite value can meet
    /// (`>= +inf`, `<= -inf`).
    pub fn validate(&self) -> Result<(), ExprError> {
        let lower = self.lower().unwrap_or(f64::NEG_INFINITY);
        let upper = self.upper().unwrap_or(f64::INFINITY);
        if lower.is_nan() || upper.is_nan() {
            return Err(ExprError::NanBound);
        }
        if lower == f64::INFINITY || upper == f64::NEG_INFINITY {
            return Err(ExprError::DegenerateBounds { lower, upper });
        }
        Ok(())
    }

    /// Short label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundSpec::Unconstrained => "free",
            BoundSpec::Equality(_) => "eq",
            BoundSpec::Lower(_) => "ge",
            BoundSpec::Upper(_) => "le",
            BoundSpec::Both { .. } => "range",
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn from_limits_picks_variant() {
        assert_eq!(BoundSpec::from_limits(None, None), BoundSpec::Unconstrained);
        assert_eq!(BoundSpec::from_limits(Some(1.0), None), BoundSpec::Lower(1.0));
        assert_eq!(BoundSpec::from_limits(None, Some(2.0)), BoundSpec::Upper(2.0));
        assert_eq!(
            BoundSpec::from_limits(Some(3.0), Some(3.0)),
            BoundSpec::Equality(3.0)
        );
        assert_eq!(
            BoundSpec::from_limits(Some(1.0), Some(4.0)),
            BoundSpec::Both {
                lower: 1.0,
                upper: 4.0
            }
        );
    }

    #[test]
    fn from_limits_ignores_open_infinities() {
        assert_eq!(
            BoundSpec::from_limits(Some(f64::NEG_INFINITY), Some(5.0)),
            BoundSpec::Upper(5.0)
        );
        assert_eq!(
            BoundSpec::from_limits(Some(0.0), Some(f64::INFINITY)),
            BoundSpec::Lower(0.0)
        );
    }

    #[test]
    fn shifted_moves_every_threshold() {
        assert_eq!(BoundSpec::Upper(10.0).shifted(3.0), BoundSpec::Upper(7.0));
        assert_eq!(BoundSpec::Lower(10.0).shifted(-2.0), BoundSpec::Lower(12.0));
        assert_eq!(BoundSpec::Equality(1.0).shifted(1.0), BoundSpec::Equality(0.0));
        assert_eq!(
            BoundSpec::Both {
                lower: 1.0,
                upper: 5.0
            }
            .shifted(2.0),
            BoundSpec::Both {
                lower: -1.0,
                upper: 3.0
            }
        );
        assert_eq!(
            BoundSpec::Unconstrained.shifted(4.0),
            BoundSpec::Unconstrained
        );
    }

    #[test]
    fn equality_reports_both_sides() {
        let spec = BoundSpec::Equality(2.5);
        assert_eq!(spec.lower(), Some(2.5));
        assert_eq!(spec.upper(), Some(2.5));
        assert!(spec.is_equality());
        assert!(spec.is_constraint());
        assert!(!BoundSpec::Unconstrained.is_constraint());
    }

    #[test]
    fn validate_rejects_unusable_thresholds() {
        assert_eq!(BoundSpec::Lower(f64::NAN).validate(), Err(ExprError::NanBound));
        assert!(matches!(
            BoundSpec::Lower(f64::INFINITY).validate(),
            Err(ExprError::DegenerateBounds { .. })
        ));
        assert!(BoundSpec::Upper(f64::INFINITY).validate().is_ok());
        assert!(BoundSpec::Unconstrained.validate().is_ok());
    }

    #[test]
    fn serde_uses_tagged_representation() {
        let rendered = serde_json::to_string(&BoundSpec::Upper(7.0)).unwrap();
        assert_eq!(rendered, r#"{"kind":"upper","value":7.0}"#);
        let parsed: BoundSpec = serde_json::from_str(r#"{"kind":"unconstrained"}"#).unwrap();
        assert_eq!(parsed, BoundSpec::Unconstrained);
    }
}
