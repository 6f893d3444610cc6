use crate::constraint::{ComparisonSense, ConstraintExpr};
use crate::error::LinearExprError;
use crate::id::VariableId;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

/// `sum(coef * var) + constant`.
///
/// Terms keep insertion order and may mention a variable more than once;
/// [`Expr::normalized_terms`] merges them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    terms: Vec<(VariableId, f64)>,
    offset: f64,
}

impl Expr {
    pub fn new(terms: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self {
            terms,
            offset: constant,
        }
    }

    pub fn from_constant(constant: f64) -> Self {
        Self::new(Vec::new(), constant)
    }

    pub fn from_linear(terms: Vec<(VariableId, f64)>) -> Self {
        Self::new(terms, 0.0)
    }

    /// `coef * var`; a zero coefficient gives the empty expression.
    pub fn term(var: VariableId, coef: f64) -> Self {
        if coef == 0.0 {
            Self::default()
        } else {
            Self::from_linear(vec![(var, coef)])
        }
    }

    pub fn var(var: VariableId) -> Self {
        Self::from_linear(vec![(var, 1.0)])
    }

    pub fn constant(&self) -> f64 {
        self.offset
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn into_linear_terms(self) -> Vec<(VariableId, f64)> {
        self.terms
    }

    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms, self.offset)
    }

    /// No variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Multiply every coefficient and the constant by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        let terms = self
            .terms
            .iter()
            .filter_map(|&(var, coef)| {
                let scaled = coef * factor;
                (scaled != 0.0).then_some((var, scaled))
            })
            .collect();
        Self::new(terms, self.offset * factor)
    }

    pub fn add(&self, other: &Expr) -> Self {
        let terms = self.terms.iter().chain(&other.terms).copied().collect();
        Self::new(terms, self.offset + other.offset)
    }

    pub fn subtract(&self, other: &Expr) -> Self {
        Expr::add(self, &other.scale(-1.0))
    }

    pub fn without_constant(&self) -> Self {
        Self::from_linear(self.terms.clone())
    }

    /// Product of two expressions; one side must be a constant.
    pub fn mul_expr(&self, other: &Expr) -> Result<Self, LinearExprError> {
        match (self.is_constant(), other.is_constant()) {
            (_, true) => Ok(self.scale(other.offset)),
            (true, false) => Ok(other.scale(self.offset)),
            (false, false) => Err(LinearExprError::NonLinear),
        }
    }

    /// Quotient by a non-zero constant expression.
    pub fn div_expr(&self, divisor: &Expr) -> Result<Self, LinearExprError> {
        if !divisor.is_constant() {
            Err(LinearExprError::NonLinear)
        } else if divisor.offset == 0.0 {
            Err(LinearExprError::DivisionByZero)
        } else {
            Ok(self.scale(1.0 / divisor.offset))
        }
    }

    /// Terms merged per variable, zeros dropped, ordered by id.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged = BTreeMap::<VariableId, f64>::new();
        for &(var, coef) in &self.terms {
            *merged.entry(var).or_default() += coef;
        }
        merged.retain(|_, coef| *coef != 0.0);
        merged.into_iter().collect()
    }

    /// Value under `value_of`, or `None` when some variable has no value.
    pub fn evaluate(&self, value_of: impl Fn(VariableId) -> Option<f64>) -> Option<f64> {
        let mut total = self.offset;
        for &(var, coef) in &self.terms {
            total += coef * value_of(var)?;
        }
        Some(total)
    }

    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.offset)
    }

    /// `self - rhs <sense> 0`, with the constant moved to the right.
    pub fn compare_expr(&self, rhs: &Expr, sense: ComparisonSense) -> ConstraintExpr {
        let (terms, constant) = self.subtract(rhs).into_parts();
        ConstraintExpr::new(Self::from_linear(terms), sense, -constant)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

/// Concatenate terms and add up constants. Repeated variables stay separate.
pub fn linear_sum<I>(exprs: I) -> Expr
where
    I: IntoIterator<Item = Expr>,
{
    exprs.into_iter().sum()
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        iter.fold(Expr::default(), |mut acc, expr| {
            acc.terms.extend(expr.terms);
            acc.offset += expr.offset;
            acc
        })
    }
}

impl From<VariableId> for Expr {
    fn from(var: VariableId) -> Self {
        Expr::var(var)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::from_constant(value)
    }
}

/// `2 x0 - x1 + 3`, variables shown by id.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.offset);
        }
        for (position, &(var, coef)) in self.terms.iter().enumerate() {
            match (position, coef < 0.0) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            if coef.abs() != 1.0 {
                write!(f, "{} ", coef.abs())?;
            }
            write!(f, "{var}")?;
        }
        if self.offset != 0.0 {
            let sign = if self.offset < 0.0 { '-' } else { '+' };
            write!(f, " {sign} {}", self.offset.abs())?;
        }
        Ok(())
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add(&self, &rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self.subtract(&rhs)
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        self.scale(rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(-1.0)
    }
}
