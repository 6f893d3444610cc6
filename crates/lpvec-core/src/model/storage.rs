//! Read access to variables, rows and counts.

use super::Model;
use super::error::ModelError;
use crate::types::{Constraint, Variable};
use lpvec_expr::{ConstraintId, VariableId};

impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Nonzeros across all rows.
    pub fn num_coefficients(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// Merged `(variable, coefficient)` pairs of one row, ordered by variable.
    pub fn get_row(&self, id: ConstraintId) -> Result<&[(VariableId, f64)], ModelError> {
        match self.rows.get(id.index()) {
            Some(row) => Ok(row),
            None => Err(ModelError::InvalidConstraintId(id)),
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        (0u32..).map(VariableId::new).zip(&self.variables)
    }

    pub fn constraints(
        &self,
    ) -> impl Iterator<Item = (ConstraintId, &Constraint, &[(VariableId, f64)])> {
        (0u32..)
            .map(ConstraintId::new)
            .zip(self.constraints.iter().zip(&self.rows))
            .map(|(id, (constraint, row))| (id, constraint, row.as_slice()))
    }
}
