//! Split of the model's variables into the solved (free) set and the pinned
//! (fixed) set.
//!
//! Free variables are renumbered into a dense `0..num_free` index space in
//! their original relative order. That dense index is the native column
//! index and the position in a solution vector.

use crate::model::{Model, ModelError, variable_id};
use std::collections::BTreeMap;
use tether_expr::{FreeIndex, VariableId};

/// Immutable free/fixed split of a model's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct VariablePartition {
    free: Vec<VariableId>,
    fixed: BTreeMap<VariableId, f64>,
    lookup: Vec<Option<FreeIndex>>,
}

impl VariablePartition {
    /// Partition `num_variables` variables given the pinned values.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidVariableId`] when a fixed id is outside
    /// `0..num_variables` and [`ModelError::InvalidFixedValue`] when a pinned
    /// value is not finite.
    pub fn new(num_variables: usize, fixed: &BTreeMap<VariableId, f64>) -> Result<Self, ModelError> {
        for (&var_id, &value) in fixed {
            if var_id.index() >= num_variables {
                return Err(ModelError::InvalidVariableId(var_id));
            }
            if !value.is_finite() {
                return Err(ModelError::InvalidFixedValue { var_id, value });
            }
        }

        let mut free = Vec::with_capacity(num_variables.saturating_sub(fixed.len()));
        let mut lookup = Vec::with_capacity(num_variables);
        for index in 0..num_variables {
            let var_id = variable_id(index);
            if fixed.contains_key(&var_id) {
                lookup.push(None);
            } else {
                lookup.push(Some(FreeIndex::new(free.len() as u32)));
                free.push(var_id);
            }
        }

        tracing::debug!(
            component = "partition",
            operation = "new",
            status = "success",
            num_variables,
            num_free = free.len(),
            num_fixed = fixed.len(),
            "Partitioned variables"
        );

        Ok(Self {
            free,
            fixed: fixed.clone(),
            lookup,
        })
    }

    /// Partition the variables of `model` using its fixed values.
    pub fn from_model(model: &Model) -> Result<Self, ModelError> {
        Self::new(model.num_variables(), model.fixed_values())
    }

    /// Dense position of `var_id` among the free variables.
    ///
    /// Returns `None` for fixed variables and for ids outside the
    /// partitioned range.
    pub fn lookup(&self, var_id: VariableId) -> Option<FreeIndex> {
        self.lookup.get(var_id.index()).copied().flatten()
    }

    /// Free variables in original relative order.
    pub fn free_variables(&self) -> &[VariableId] {
        &self.free
    }

    /// Original id of the free variable at `index`.
    pub fn free_id(&self, index: FreeIndex) -> Option<VariableId> {
        self.free.get(index.index()).copied()
    }

    pub fn num_free(&self) -> usize {
        self.free.len()
    }

    pub fn num_fixed(&self) -> usize {
        self.fixed.len()
    }

    pub fn num_variables(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_fixed(&self, var_id: VariableId) -> bool {
        self.fixed.contains_key(&var_id)
    }

    pub fn fixed_value(&self, var_id: VariableId) -> Option<f64> {
        self.fixed.get(&var_id).copied()
    }

    pub fn fixed_values(&self) -> &BTreeMap<VariableId, f64> {
        &self.fixed
    }

    /// Scatter a dense free-variable solution back over the original index
    /// space, filling in pinned values for fixed variables.
    ///
    /// Returns `None` when `solution` does not have one entry per free
    /// variable.
    pub fn expand(&self, solution: &[f64]) -> Option<Vec<f64>> {
        if solution.len() != self.free.len() {
            return None;
        }
        let values = self
            .lookup
            .iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(free_index) => solution[free_index.index()],
                None => self
                    .fixed
                    .get(&variable_id(index))
                    .copied()
                    .unwrap_or(0.0),
            })
            .collect();
        Some(values)
    }
}
