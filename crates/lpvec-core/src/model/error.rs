use lpvec_expr::{ConstraintId, VariableId};
use std::fmt;

/// Rejected model edits. A failed edit leaves the model unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidVariableId(VariableId),
    /// `lower > upper`, or a NaN bound.
    InvalidVariableBounds { lower: f64, upper: f64 },
    InvalidConstraintId(ConstraintId),
    /// NaN or infinite coefficient in a row or the objective.
    InvalidCoefficient { coefficient: f64 },
    InvalidRhs { rhs: f64 },
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::InvalidRhs { .. } => "CONSTRAINT_INVALID_RHS",
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code())?;
        match self {
            ModelError::InvalidVariableId(id) => write!(f, "no variable {id} in this model"),
            ModelError::InvalidVariableBounds { lower, upper } => {
                write!(f, "bounds [{lower}, {upper}] are empty")
            }
            ModelError::InvalidConstraintId(id) => write!(f, "no constraint {id} in this model"),
            ModelError::InvalidCoefficient { coefficient } => {
                write!(f, "coefficient {coefficient} is not finite")
            }
            ModelError::InvalidRhs { rhs } => write!(f, "right-hand side {rhs} admits no row activity"),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_code() {
        let err = ModelError::InvalidVariableId(VariableId::new(4));
        assert_eq!(err.to_string(), "[VARIABLE_INVALID_ID] no variable x4 in this model");

        let err = ModelError::InvalidVariableBounds {
            lower: 2.0,
            upper: 1.0,
        };
        assert_eq!(err.code(), "VARIABLE_INVALID_BOUNDS");
    }
}
