use std::fmt;

/// Arithmetic that would leave the space of affine expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearExprError {
    /// Both factors of a product, or the divisor, reference variables.
    NonLinear,
    DivisionByZero,
}

impl LinearExprError {
    pub fn code(&self) -> &'static str {
        match self {
            LinearExprError::NonLinear => "EXPR_NONLINEAR",
            LinearExprError::DivisionByZero => "EXPR_DIVISION_BY_ZERO",
        }
    }
}

impl fmt::Display for LinearExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            LinearExprError::NonLinear => "result would not be linear in the variables",
            LinearExprError::DivisionByZero => "division by zero",
        };
        write!(f, "[{}] {message}", self.code())
    }
}

impl std::error::Error for LinearExprError {}
