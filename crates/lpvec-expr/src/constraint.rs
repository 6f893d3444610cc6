use crate::linear::Expr;
use std::fmt;

/// Relation between the left side of a constraint and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "=",
        }
    }

    /// `(lower, upper)` row bounds enforcing this relation against `rhs`.
    pub fn row_bounds(self, rhs: f64) -> (f64, f64) {
        let (lower, upper) = match self {
            ComparisonSense::LessEqual => (None, Some(rhs)),
            ComparisonSense::GreaterEqual => (Some(rhs), None),
            ComparisonSense::Equal => (Some(rhs), Some(rhs)),
        };
        (
            lower.unwrap_or(f64::NEG_INFINITY),
            upper.unwrap_or(f64::INFINITY),
        )
    }
}

/// `expr <sense> rhs`, with the constant of the left side already moved
/// into `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    lhs: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(lhs: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { lhs, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.lhs
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        (self.lhs, self.sense, self.rhs)
    }
}

impl fmt::Display for ConstraintExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.sense.symbol(), self.rhs)
    }
}
