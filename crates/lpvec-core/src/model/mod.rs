//! Flat LP/MIP model: columns, rows and one objective.
//!
//! Edits live in `builder`, read access in `storage`, names in `metadata`
//! and the text listing in `pretty`.

mod builder;
mod error;
mod metadata;
mod pretty;
mod storage;

use crate::types::{Constraint, Objective, Variable};
use lpvec_expr::{ConstraintId, Expr, VariableId};
use metadata::NameTable;

pub use error::ModelError;
pub use pretty::{PrettyPrintOptions, format_ascii_number};

/// Columns and rows numbered in creation order, with row coefficients
/// stored per row.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) rows: Vec<Vec<(VariableId, f64)>>,
    pub(crate) objective: Objective,
    pub(crate) variable_names: NameTable<VariableId>,
    pub(crate) constraint_names: NameTable<ConstraintId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if id.index() < self.constraints.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    /// Every term must name an existing variable and carry a finite coefficient.
    pub(crate) fn validate_terms(&self, terms: &[(VariableId, f64)]) -> Result<(), ModelError> {
        terms.iter().try_for_each(|&(var, coefficient)| {
            self.ensure_variable_exists(var)?;
            if coefficient.is_finite() {
                Ok(())
            } else {
                Err(ModelError::InvalidCoefficient { coefficient })
            }
        })
    }

    /// Merge repeated variables and drop zeros, ordered by variable id.
    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let terms_in = terms.len();
        let merged = Expr::from_linear(terms).normalized_terms();
        tracing::trace!(
            component = "model",
            operation = "normalize_terms",
            status = "success",
            terms_in,
            terms_out = merged.len(),
            "Merged row terms"
        );
        merged
    }
}
