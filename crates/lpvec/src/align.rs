//! Label alignment and termwise combination of containers.
//!
//! Every binary operation between containers goes through [`apply`]. Labels are
//! aligned first, then the operator runs once per aligned label:
//!
//! - two containers, or a container and a per-label mapping, align on the
//!   labels they share, in the left operand's order;
//! - a scalar broadcasts to every label of the other operand;
//! - a mapping against a grid aligns on the grid's row labels and is
//!   broadcast across its columns.
//!
//! Labels present on one side only are dropped. A disjoint pair yields an empty
//! container, not an error.

use crate::constraints::ConstraintSet;
use crate::error::FrameError;
use crate::family::{ExprFamily, VariableFamily};
use crate::grid::{ExprGrid, VariableGrid};
use crate::index::LabelIndex;
use crate::label::Label;
use indexmap::IndexMap;
use lpvec_expr::{ComparisonSense, ConstraintExpr, Expr, VariableId};
use std::time::Instant;
use tracing::trace;

/// Operators accepted by [`apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Le,
    Ge,
    Eq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
        }
    }

    /// Comparisons produce constraints instead of expressions.
    pub fn is_comparison(self) -> bool {
        self.comparison_sense().is_some()
    }

    fn comparison_sense(self) -> Option<ComparisonSense> {
        match self {
            BinaryOp::Le => Some(ComparisonSense::LessEqual),
            BinaryOp::Ge => Some(ComparisonSense::GreaterEqual),
            BinaryOp::Eq => Some(ComparisonSense::Equal),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Terms<'a> {
    Variables(&'a [VariableId]),
    Exprs(&'a [Expr]),
}

impl Terms<'_> {
    fn expr_at(self, pos: usize) -> Option<Expr> {
        match self {
            Terms::Variables(ids) => ids.get(pos).map(|id| Expr::var(*id)),
            Terms::Exprs(exprs) => exprs.get(pos).cloned(),
        }
    }
}

/// Borrowed view of a family-shaped container.
#[derive(Debug, Clone, Copy)]
pub struct FamilyView<'a> {
    index: &'a LabelIndex,
    terms: Terms<'a>,
}

impl FamilyView<'_> {
    fn term(&self, label: &Label) -> Option<Expr> {
        self.terms.expr_at(self.index.position(label)?)
    }
}

/// Borrowed view of a grid-shaped container.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    rows: &'a LabelIndex,
    columns: &'a LabelIndex,
    terms: Terms<'a>,
}

impl GridView<'_> {
    fn term(&self, row: &Label, column: &Label) -> Option<Expr> {
        let r = self.rows.position(row)?;
        let c = self.columns.position(column)?;
        self.terms.expr_at(r * self.columns.len() + c)
    }
}

/// One side of a binary operation.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Scalar(f64),
    /// Per-label constants.
    Mapping(&'a IndexMap<Label, f64>),
    Family(FamilyView<'a>),
    Grid(GridView<'a>),
}

impl Operand<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Scalar(_) => "scalar",
            Operand::Mapping(_) => "mapping",
            Operand::Family(_) => "family",
            Operand::Grid(_) => "grid",
        }
    }

    fn family_term(&self, label: &Label) -> Option<Expr> {
        match self {
            Operand::Scalar(value) => Some(Expr::from_constant(*value)),
            Operand::Mapping(values) => values.get(label).map(|v| Expr::from_constant(*v)),
            Operand::Family(view) => view.term(label),
            Operand::Grid(_) => None,
        }
    }

    fn grid_term(&self, row: &Label, column: &Label) -> Option<Expr> {
        match self {
            Operand::Scalar(value) => Some(Expr::from_constant(*value)),
            Operand::Mapping(values) => values.get(row).map(|v| Expr::from_constant(*v)),
            Operand::Grid(view) => view.term(row, column),
            Operand::Family(_) => None,
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a IndexMap<Label, f64>> for Operand<'a> {
    fn from(values: &'a IndexMap<Label, f64>) -> Self {
        Operand::Mapping(values)
    }
}

impl<'a> From<&'a VariableFamily> for Operand<'a> {
    fn from(family: &'a VariableFamily) -> Self {
        Operand::Family(FamilyView {
            index: family.labels(),
            terms: Terms::Variables(family.handles()),
        })
    }
}

impl<'a> From<&'a ExprFamily> for Operand<'a> {
    fn from(family: &'a ExprFamily) -> Self {
        Operand::Family(FamilyView {
            index: family.labels(),
            terms: Terms::Exprs(family.exprs()),
        })
    }
}

impl<'a> From<&'a VariableGrid> for Operand<'a> {
    fn from(grid: &'a VariableGrid) -> Self {
        Operand::Grid(GridView {
            rows: grid.rows(),
            columns: grid.columns(),
            terms: Terms::Variables(grid.handles()),
        })
    }
}

impl<'a> From<&'a ExprGrid> for Operand<'a> {
    fn from(grid: &'a ExprGrid) -> Self {
        Operand::Grid(GridView {
            rows: grid.rows(),
            columns: grid.columns(),
            terms: Terms::Exprs(grid.exprs()),
        })
    }
}

/// Result of [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Aligned {
    Family(ExprFamily),
    Grid(ExprGrid),
    Constraints(ConstraintSet),
}

impl Aligned {
    pub fn len(&self) -> usize {
        match self {
            Aligned::Family(family) => family.len(),
            Aligned::Grid(grid) => grid.len(),
            Aligned::Constraints(constraints) => constraints.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> &'static str {
        match self {
            Aligned::Family(_) => "family",
            Aligned::Grid(_) => "grid",
            Aligned::Constraints(_) => "constraint set",
        }
    }

    pub fn into_family(self) -> Result<ExprFamily, FrameError> {
        match self {
            Aligned::Family(family) => Ok(family),
            other => Err(FrameError::shape_mismatch(format!(
                "expected a family, got a {}",
                other.kind()
            ))),
        }
    }

    pub fn into_grid(self) -> Result<ExprGrid, FrameError> {
        match self {
            Aligned::Grid(grid) => Ok(grid),
            other => Err(FrameError::shape_mismatch(format!(
                "expected a grid, got a {}",
                other.kind()
            ))),
        }
    }

    pub fn into_constraints(self) -> Result<ConstraintSet, FrameError> {
        match self {
            Aligned::Constraints(constraints) => Ok(constraints),
            other => Err(FrameError::shape_mismatch(format!(
                "expected a constraint set, got a {}",
                other.kind()
            ))),
        }
    }
}

enum Combined {
    Expr(Expr),
    Constraint(ConstraintExpr),
}

fn combine(lhs: &Expr, op: BinaryOp, rhs: &Expr) -> Result<Combined, FrameError> {
    let expr = match op {
        BinaryOp::Add => Expr::add(lhs, rhs),
        BinaryOp::Sub => lhs.subtract(rhs),
        BinaryOp::Mul => lhs.mul_expr(rhs)?,
        BinaryOp::Div => lhs.div_expr(rhs)?,
        BinaryOp::Le => return Ok(Combined::Constraint(lhs.le_expr(rhs))),
        BinaryOp::Ge => return Ok(Combined::Constraint(lhs.ge_expr(rhs))),
        BinaryOp::Eq => return Ok(Combined::Constraint(lhs.eq_expr(rhs))),
    };
    Ok(Combined::Expr(expr))
}

/// Combine every aligned cell, or fail without a partial result.
fn combine_cells(
    cells: impl Iterator<Item = (Label, Option<Expr>, Option<Expr>)>,
    op: BinaryOp,
) -> Result<(Vec<Expr>, ConstraintSet), FrameError> {
    let mut exprs = Vec::new();
    let mut constraints = ConstraintSet::new();
    for (label, lhs, rhs) in cells {
        let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
            return Err(FrameError::shape_mismatch(format!(
                "label {label} is missing from an operand"
            )));
        };
        match combine(&lhs, op, &rhs)? {
            Combined::Expr(expr) => exprs.push(expr),
            Combined::Constraint(constraint) => constraints.push(label, constraint),
        }
    }
    Ok((exprs, constraints))
}

fn mapping_keys_in(values: &IndexMap<Label, f64>, index: &LabelIndex) -> LabelIndex {
    LabelIndex::from_unique(
        values
            .keys()
            .filter(|label| index.contains(label))
            .cloned()
            .collect(),
    )
}

fn family_labels(lhs: &Operand<'_>, rhs: &Operand<'_>) -> LabelIndex {
    match (lhs, rhs) {
        (Operand::Family(l), Operand::Family(r)) => l.index.intersection(r.index),
        (Operand::Family(f), Operand::Mapping(m)) => f.index.filter(|label| m.contains_key(label)),
        (Operand::Mapping(m), Operand::Family(f)) => mapping_keys_in(m, f.index),
        (Operand::Family(f), _) | (_, Operand::Family(f)) => f.index.clone(),
        _ => LabelIndex::default(),
    }
}

fn grid_labels(lhs: &Operand<'_>, rhs: &Operand<'_>) -> (LabelIndex, LabelIndex) {
    match (lhs, rhs) {
        (Operand::Grid(l), Operand::Grid(r)) => (
            l.rows.intersection(r.rows),
            l.columns.intersection(r.columns),
        ),
        (Operand::Grid(g), Operand::Mapping(m)) => (
            g.rows.filter(|label| m.contains_key(label)),
            g.columns.clone(),
        ),
        (Operand::Mapping(m), Operand::Grid(g)) => (mapping_keys_in(m, g.rows), g.columns.clone()),
        (Operand::Grid(g), _) | (_, Operand::Grid(g)) => (g.rows.clone(), g.columns.clone()),
        _ => (LabelIndex::default(), LabelIndex::default()),
    }
}

fn apply_family(lhs: &Operand<'_>, op: BinaryOp, rhs: &Operand<'_>) -> Result<Aligned, FrameError> {
    let labels = family_labels(lhs, rhs);
    let cells = labels
        .iter()
        .map(|label| (label.clone(), lhs.family_term(label), rhs.family_term(label)));
    let (exprs, constraints) = combine_cells(cells, op)?;
    if op.is_comparison() {
        Ok(Aligned::Constraints(constraints))
    } else {
        Ok(Aligned::Family(ExprFamily::from_parts(labels, exprs)))
    }
}

fn apply_grid(lhs: &Operand<'_>, op: BinaryOp, rhs: &Operand<'_>) -> Result<Aligned, FrameError> {
    let (rows, columns) = grid_labels(lhs, rhs);
    let cells = rows.iter().flat_map(|row| {
        columns.iter().map(move |col| {
            (
                Label::Tuple(vec![row.clone(), col.clone()]),
                lhs.grid_term(row, col),
                rhs.grid_term(row, col),
            )
        })
    });
    let (exprs, constraints) = combine_cells(cells, op)?;
    if op.is_comparison() {
        Ok(Aligned::Constraints(constraints))
    } else {
        Ok(Aligned::Grid(ExprGrid::from_parts(rows, columns, exprs)))
    }
}

/// Align `lhs` and `rhs` on their labels and apply `op` once per label.
///
/// Reflected forms are the same call with operands swapped:
/// `apply(1.0, BinaryOp::Sub, &a)` is `1 - a`.
///
/// # Errors
///
/// - [`FrameError::ShapeMismatch`] for a family against a grid, or when
///   neither operand is a family or grid.
/// - [`FrameError::NonLinear`] when `Mul` meets two variable-bearing terms or
///   `Div` a variable-bearing divisor.
/// - [`FrameError::DivisionByZero`] for a zero divisor.
pub fn apply<'a>(
    lhs: impl Into<Operand<'a>>,
    op: BinaryOp,
    rhs: impl Into<Operand<'a>>,
) -> Result<Aligned, FrameError> {
    let lhs = lhs.into();
    let rhs = rhs.into();
    let started = Instant::now();

    let result = match (&lhs, &rhs) {
        (Operand::Family(_), Operand::Grid(_)) | (Operand::Grid(_), Operand::Family(_)) => {
            Err(FrameError::shape_mismatch("cannot align a family with a grid"))
        }
        (Operand::Grid(_), _) | (_, Operand::Grid(_)) => apply_grid(&lhs, op, &rhs),
        (Operand::Family(_), _) | (_, Operand::Family(_)) => apply_family(&lhs, op, &rhs),
        _ => Err(FrameError::shape_mismatch(format!(
            "cannot apply '{}' to a {} and a {}; one side must be a family or grid",
            op.symbol(),
            lhs.kind(),
            rhs.kind()
        ))),
    }?;

    trace!(
        component = "align",
        operation = "apply",
        status = "success",
        op = op.symbol(),
        lhs = lhs.kind(),
        rhs = rhs.kind(),
        labels = result.len(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Applied aligned operation"
    );
    Ok(result)
}

macro_rules! impl_aligned_ops {
    ($container:ty, $output:ty, $into:ident) => {
        #[allow(clippy::should_implement_trait)]
        impl $container {
            /// Termwise `self + rhs` over the aligned labels.
            pub fn add<'a>(&'a self, rhs: impl Into<Operand<'a>>) -> Result<$output, FrameError> {
                apply(self, BinaryOp::Add, rhs)?.$into()
            }

            /// Termwise `self - rhs` over the aligned labels.
            pub fn sub<'a>(&'a self, rhs: impl Into<Operand<'a>>) -> Result<$output, FrameError> {
                apply(self, BinaryOp::Sub, rhs)?.$into()
            }

            /// Termwise `self * rhs`; one side of every pair must be constant.
            pub fn mul<'a>(&'a self, rhs: impl Into<Operand<'a>>) -> Result<$output, FrameError> {
                apply(self, BinaryOp::Mul, rhs)?.$into()
            }

            /// Termwise `self / rhs`; every divisor must be a non-zero constant.
            pub fn div<'a>(&'a self, rhs: impl Into<Operand<'a>>) -> Result<$output, FrameError> {
                apply(self, BinaryOp::Div, rhs)?.$into()
            }

            /// Termwise `lhs - self`.
            pub fn rsub<'a>(&'a self, lhs: impl Into<Operand<'a>>) -> Result<$output, FrameError> {
                apply(lhs, BinaryOp::Sub, self)?.$into()
            }

            /// Termwise `lhs / self`.
            pub fn rdiv<'a>(&'a self, lhs: impl Into<Operand<'a>>) -> Result<$output, FrameError> {
                apply(lhs, BinaryOp::Div, self)?.$into()
            }

            /// One `self <= rhs` constraint per aligned label.
            pub fn le<'a>(
                &'a self,
                rhs: impl Into<Operand<'a>>,
            ) -> Result<ConstraintSet, FrameError> {
                apply(self, BinaryOp::Le, rhs)?.into_constraints()
            }

            /// One `self >= rhs` constraint per aligned label.
            pub fn ge<'a>(
                &'a self,
                rhs: impl Into<Operand<'a>>,
            ) -> Result<ConstraintSet, FrameError> {
                apply(self, BinaryOp::Ge, rhs)?.into_constraints()
            }

            /// One `self == rhs` constraint per aligned label.
            pub fn eq<'a>(
                &'a self,
                rhs: impl Into<Operand<'a>>,
            ) -> Result<ConstraintSet, FrameError> {
                apply(self, BinaryOp::Eq, rhs)?.into_constraints()
            }

            pub fn neg(&self) -> $output {
                self.to_exprs().map(|expr| expr.scale(-1.0))
            }
        }
    };
}

impl_aligned_ops!(VariableFamily, ExprFamily, into_family);
impl_aligned_ops!(ExprFamily, ExprFamily, into_family);
impl_aligned_ops!(VariableGrid, ExprGrid, into_grid);
impl_aligned_ops!(ExprGrid, ExprGrid, into_grid);

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::family::VariableSpec;
    use crate::problem::LpProblem;
    use lpvec_core::Sense;

    fn setup() -> (LpProblem, VariableFamily, VariableFamily) {
        let mut problem = LpProblem::new("align", Sense::Maximize);
        let a = VariableFamily::from_labels("a", 0..5, &mut problem, VariableSpec::default())
            .unwrap();
        let mut b = VariableFamily::from_labels("b", 0..6, &mut problem, VariableSpec::default())
            .unwrap();
        b.shift_labels(3).unwrap();
        (problem, a, b)
    }

    #[test]
    fn test_comparison_aligns_on_intersection() {
        let (_, a, b) = setup();
        let constraints = a.le(&b).unwrap();

        assert_eq!(
            constraints.labels().cloned().collect::<Vec<_>>(),
            vec![Label::Int(3), Label::Int(4)]
        );
        let c3 = constraints.get(&Label::Int(3)).unwrap();
        assert_eq!(c3.sense(), ComparisonSense::LessEqual);
        assert_eq!(c3.rhs(), 0.0);
        assert_eq!(
            c3.expr().linear_terms(),
            &[(a.get(3).unwrap(), 1.0), (b.get(3).unwrap(), -1.0)]
        );
    }

    #[test]
    fn test_reflected_scalar_subtraction() {
        let (_, a, _) = setup();
        let c = a.rsub(1.0).unwrap();
        assert_eq!(c.len(), 5);
        let c2 = c.get(2).unwrap();
        assert_eq!(c2.constant(), 1.0);
        assert_eq!(c2.linear_terms(), &[(a.get(2).unwrap(), -1.0)]);

        let same = apply(1.0, BinaryOp::Sub, &a).unwrap().into_family().unwrap();
        assert_eq!(same, c);
    }

    #[test]
    fn test_mapping_aligns_in_left_order() {
        let (_, a, _) = setup();
        let mut costs = IndexMap::new();
        costs.insert(Label::from(4), 2.0);
        costs.insert(Label::from(9), 5.0);
        costs.insert(Label::from(1), 3.0);

        let scaled = a.mul(&costs).unwrap();
        assert_eq!(scaled.labels(), &LabelIndex::new([1, 4]).unwrap());

        let reflected = apply(&costs, BinaryOp::Mul, &a).unwrap().into_family().unwrap();
        assert_eq!(reflected.labels(), &LabelIndex::new([4, 1]).unwrap());
        assert_eq!(
            reflected.get(4).unwrap().linear_terms(),
            &[(a.get(4).unwrap(), 2.0)]
        );
    }

    #[test]
    fn test_disjoint_operands_give_empty_results() {
        let (mut problem, a, _) = setup();
        let far = VariableFamily::from_labels("far", 10..12, &mut problem, VariableSpec::default())
            .unwrap();
        assert!(a.ge(&far).unwrap().is_empty());
        assert!(a.add(&far).unwrap().is_empty());
    }

    #[test]
    fn test_nonlinear_product_fails_whole_operation() {
        let (_, a, b) = setup();
        assert_eq!(a.mul(&b).unwrap_err(), FrameError::NonLinear);
        assert_eq!(a.rdiv(2.0).unwrap_err(), FrameError::NonLinear);
    }

    #[test]
    fn test_division() {
        let (_, a, _) = setup();
        assert_eq!(a.div(0.0).unwrap_err(), FrameError::DivisionByZero);
        let halved = a.div(2.0).unwrap();
        assert_eq!(halved.get(0).unwrap().linear_terms(), &[(a.get(0).unwrap(), 0.5)]);

        let mut divisors = IndexMap::new();
        divisors.insert(Label::from(0), 4.0);
        divisors.insert(Label::from(1), 0.0);
        assert_eq!(a.div(&divisors).unwrap_err(), FrameError::DivisionByZero);
    }

    #[test]
    fn test_shape_errors() {
        let (mut problem, a, _) = setup();
        let grid = VariableGrid::from_labels("g", 0..2, 0..2, &mut problem, VariableSpec::default())
            .unwrap();
        assert_eq!(a.add(&grid).unwrap_err().code(), "FRAME_SHAPE_MISMATCH");
        assert_eq!(grid.le(&a).unwrap_err().code(), "FRAME_SHAPE_MISMATCH");

        let mapping: IndexMap<Label, f64> = IndexMap::new();
        let err = apply(1.0, BinaryOp::Add, &mapping).unwrap_err();
        assert_eq!(err.code(), "FRAME_SHAPE_MISMATCH");
    }

    #[test]
    fn test_grid_operations() {
        let mut problem = LpProblem::new("grid", Sense::Minimize);
        let x = VariableGrid::from_labels("x", ["a", "b"], 0..3, &mut problem, VariableSpec::default())
            .unwrap();
        let mut y = VariableGrid::from_labels("y", ["b", "c"], 0..3, &mut problem, VariableSpec::default())
            .unwrap();
        y.shift_columns(1).unwrap();

        let diff = x.sub(&y).unwrap();
        assert_eq!(diff.shape(), (1, 2));
        assert_eq!(diff.rows(), &LabelIndex::new(["b"]).unwrap());
        assert_eq!(diff.columns(), &LabelIndex::new([1, 2]).unwrap());

        let caps = x.le(5.0).unwrap();
        assert_eq!(caps.len(), 6);
        assert!(caps.get(&Label::from(("b", 2))).is_some());

        let mut row_weights = IndexMap::new();
        row_weights.insert(Label::from("b"), 3.0);
        let weighted = x.mul(&row_weights).unwrap();
        assert_eq!(weighted.shape(), (1, 3));
        assert_eq!(
            weighted.get("b", 0).unwrap().linear_terms(),
            &[(x.get("b", 0).unwrap(), 3.0)]
        );
    }

    #[test]
    fn test_neg_and_chained_arithmetic() {
        let (_, a, b) = setup();
        let negated = a.neg();
        assert_eq!(negated.get(0).unwrap().linear_terms(), &[(a.get(0).unwrap(), -1.0)]);

        let combined = a.mul(2.0).unwrap().add(&b).unwrap().add(1.0).unwrap();
        assert_eq!(combined.labels(), &LabelIndex::new([3, 4]).unwrap());
        let c4 = combined.get(4).unwrap();
        assert_eq!(c4.constant(), 1.0);
        assert_eq!(
            c4.linear_terms(),
            &[(a.get(4).unwrap(), 2.0), (b.get(4).unwrap(), 1.0)]
        );
    }
}
