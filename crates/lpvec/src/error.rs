//! Error type for label-indexed containers and the problem facade.

use crate::label::Label;
use lpvec_core::{ModelError, SolverError};
use lpvec_expr::LinearExprError;
use std::fmt;

/// Errors raised while building, combining, or solving label-indexed containers.
///
/// Failed operations never leave partial results behind: a combination that
/// errors on one label produces nothing for any label.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Operands cannot be aligned (family against grid, two non-containers,
    /// relabelling with a different length, ...).
    ShapeMismatch { reason: String },
    /// A label occurs more than once in one index.
    DuplicateLabel { label: Label },
    /// A label cannot be shifted: it is not an integer, or the shift overflows.
    NotShiftable { label: Label },
    /// Product of two variable-bearing terms.
    NonLinear,
    /// Division by a constant zero.
    DivisionByZero,
    /// Values were requested before a solve produced any.
    NotSolved,
    /// The underlying model rejected a variable, constraint, or objective.
    Model(ModelError),
    /// The solver backend failed.
    SolverFailure(SolverError),
}

impl FrameError {
    pub(crate) fn shape_mismatch(reason: impl Into<String>) -> Self {
        FrameError::ShapeMismatch {
            reason: reason.into(),
        }
    }

    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            FrameError::ShapeMismatch { .. } => "FRAME_SHAPE_MISMATCH",
            FrameError::DuplicateLabel { .. } => "LABEL_DUPLICATE",
            FrameError::NotShiftable { .. } => "LABEL_NOT_SHIFTABLE",
            FrameError::NonLinear => "EXPR_NONLINEAR",
            FrameError::DivisionByZero => "EXPR_DIVISION_BY_ZERO",
            FrameError::NotSolved => "SOLUTION_NOT_AVAILABLE",
            FrameError::Model(err) => err.code(),
            FrameError::SolverFailure(err) => err.code(),
        }
    }

    /// True for errors caused by a label of the wrong kind.
    pub fn is_type_error(&self) -> bool {
        matches!(self, FrameError::NotShiftable { .. })
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::ShapeMismatch { reason } => {
                write!(f, "[{}] Shape mismatch: {}", self.code(), reason)
            }
            FrameError::DuplicateLabel { label } => {
                write!(f, "[{}] Duplicate label {}", self.code(), label)
            }
            FrameError::NotShiftable { label } => write!(
                f,
                "[{}] Label {} cannot be shifted by an integer offset",
                self.code(),
                label
            ),
            FrameError::NonLinear => write!(
                f,
                "[{}] Product of two variable expressions is not linear",
                self.code()
            ),
            FrameError::DivisionByZero => write!(f, "[{}] Division by zero", self.code()),
            FrameError::NotSolved => write!(
                f,
                "[{}] Problem has no solution values; call solve first",
                self.code()
            ),
            FrameError::Model(err) => write!(f, "{err}"),
            FrameError::SolverFailure(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Model(err) => Some(err),
            FrameError::SolverFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for FrameError {
    fn from(err: ModelError) -> Self {
        FrameError::Model(err)
    }
}

impl From<SolverError> for FrameError {
    fn from(err: SolverError) -> Self {
        FrameError::SolverFailure(err)
    }
}

impl From<LinearExprError> for FrameError {
    fn from(err: LinearExprError) -> Self {
        match err {
            LinearExprError::NonLinear => FrameError::NonLinear,
            LinearExprError::DivisionByZero => FrameError::DivisionByZero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_display() {
        let err = FrameError::DuplicateLabel {
            label: Label::from(0),
        };
        assert_eq!(err.code(), "LABEL_DUPLICATE");
        assert_eq!(err.to_string(), "[LABEL_DUPLICATE] Duplicate label 0");

        let err = FrameError::from(SolverError::NoObjective);
        assert_eq!(err.code(), SolverError::NoObjective.code());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_expression_errors_map_to_frame_errors() {
        assert_eq!(
            FrameError::from(LinearExprError::NonLinear),
            FrameError::NonLinear
        );
        assert_eq!(
            FrameError::from(LinearExprError::DivisionByZero),
            FrameError::DivisionByZero
        );
        assert!(
            FrameError::NotShiftable {
                label: Label::from("a")
            }
            .is_type_error()
        );
    }
}
