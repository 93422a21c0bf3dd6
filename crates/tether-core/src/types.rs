use serde::{Deserialize, Serialize};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Integrality of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[default]
    Continuous,
    Integer,
    Binary,
}

impl VariableKind {
    pub fn is_integral(self) -> bool {
        matches!(self, VariableKind::Integer | VariableKind::Binary)
    }
}

/// Bounds for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `[0, +inf)`
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// `(-inf, +inf)`
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Bounds as registered for a variable of the given kind. Binary
    /// variables are clamped into `[0, 1]`.
    pub fn for_kind(self, kind: VariableKind) -> Self {
        match kind {
            VariableKind::Binary => Self::new(self.lower.max(0.0), self.upper.min(1.0)),
            VariableKind::Continuous | VariableKind::Integer => self,
        }
    }
}

/// A decision variable of the original model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub bounds: Bounds,
    /// Objective contribution weight; `None` means zero.
    pub weight: Option<f64>,
    pub kind: VariableKind,
}

impl Variable {
    /// Create a continuous variable with specified bounds.
    pub fn continuous(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            weight: None,
            kind: VariableKind::Continuous,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            kind: VariableKind::Integer,
            ..Self::continuous(name, bounds)
        }
    }

    /// Create a binary variable with bounds [0, 1].
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            kind: VariableKind::Binary,
            ..Self::continuous(name, Bounds::new(0.0, 1.0))
        }
    }

    /// Set the objective contribution weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Bounds as registered natively, see [`Bounds::for_kind`].
    pub fn effective_bounds(&self) -> Bounds {
        self.bounds.for_kind(self.kind)
    }

    /// The weight with `None` read as zero.
    pub fn weight_or_zero(&self) -> f64 {
        self.weight.unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn binary_bounds_are_clamped() {
        let clamped = Bounds::new(-3.0, 8.0).for_kind(VariableKind::Binary);
        assert_eq!(clamped, Bounds::new(0.0, 1.0));
        let kept = Bounds::new(-3.0, 8.0).for_kind(VariableKind::Integer);
        assert_eq!(kept, Bounds::new(-3.0, 8.0));
    }

    #[test]
    fn missing_weight_reads_as_zero() {
        let var = Variable::continuous("x", Bounds::non_negative());
        assert_eq!(var.weight_or_zero(), 0.0);
        assert_eq!(var.with_weight(2.5).weight_or_zero(), 2.5);
    }

    #[test]
    fn constructors_set_kind() {
        assert_eq!(Variable::binary("b").kind, VariableKind::Binary);
        assert!(Variable::integer("i", Bounds::free()).kind.is_integral());
        assert!(!Variable::continuous("c", Bounds::free()).kind.is_integral());
    }
}
