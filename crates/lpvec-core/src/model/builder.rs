//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Bounds, Constraint, Objective, Sense, Variable};
use lpvec_expr::{ConstraintExpr, Expr};
use lpvec_expr::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if !variable.bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            });
        }

        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);

        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            var_id = id.inner(),
            lower = variable.bounds.lower,
            upper = variable.bounds.upper,
            domain = variable.domain.as_str(),
            "Added variable"
        );
        Ok(id)
    }

    /// Add a variable and name it in one step.
    pub fn add_named_variable(
        &mut self,
        name: impl Into<String>,
        variable: Variable,
    ) -> Result<VariableId, ModelError> {
        let id = self.add_variable(variable)?;
        self.set_variable_name(id, name.into())?;
        Ok(id)
    }

    /// Check a constraint against the model without storing it.
    pub fn validate_constraint_expr(&self, constraint: &ConstraintExpr) -> Result<(), ModelError> {
        let (lower, upper) = constraint
            .sense()
            .row_bounds(constraint.rhs() - constraint.expr().constant());
        if !Bounds::new(lower, upper).is_valid() {
            return Err(ModelError::InvalidRhs {
                rhs: constraint.rhs(),
            });
        }
        self.validate_terms(constraint.expr().linear_terms())
    }

    /// Add a constraint from a comparison expression (e.g., `x + y <= 10`).
    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        self.validate_constraint_expr(&constraint)?;
        let (expr, sense, rhs) = constraint.into_parts();
        let (lower, upper) = sense.row_bounds(rhs - expr.constant());
        let row = self.normalize_terms(expr.into_linear_terms());

        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(Constraint {
            bounds: Bounds::new(lower, upper),
        });
        self.rows.push(row);

        tracing::trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint_id = id.inner(),
            sense = sense.symbol(),
            lower,
            upper,
            "Added constraint"
        );
        Ok(id)
    }

    /// Set the objective function, replacing any previous one.
    pub fn set_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        self.validate_terms(expr.linear_terms())?;
        if !expr.constant().is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: expr.constant(),
            });
        }

        let (terms, constant) = expr.into_parts();
        let normalized = self.normalize_terms(terms);
        self.objective = Objective {
            sense: Some(sense),
            terms: normalized,
            constant,
        };
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.terms.len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Change the optimization sense while keeping the objective terms.
    pub fn set_objective_sense(&mut self, sense: Sense) {
        self.objective.sense = Some(sense);
    }
}
