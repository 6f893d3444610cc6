//! Affine expressions over model variables.
//!
//! An [`Expr`] is a list of `(VariableId, coefficient)` terms plus a constant.
//! Comparing two expressions yields a [`ConstraintExpr`], which a model turns
//! into a row.

mod constraint;
mod error;
mod id;
mod linear;

pub use constraint::{ComparisonSense, ConstraintExpr};
pub use error::LinearExprError;
pub use id::{ConstraintId, VariableId};
pub use linear::{Expr, linear_sum};
