//! Label-indexed decision variables for linear programs.
//!
//! Families and grids of variables are keyed by arbitrary [`Label`]s. Binary
//! operations between them align on shared labels before acting termwise, so
//! whole constraint sets are built with one call:
//!
//! ```no_run
//! use lpvec::{LpProblem, Sense, VariableFamily, VariableSpec};
//!
//! # fn main() -> Result<(), lpvec::FrameError> {
//! let mut problem = LpProblem::new("example", Sense::Maximize);
//! let spec = VariableSpec::continuous().with_bounds(0.0, 1.0);
//! let a = VariableFamily::from_labels("a", 0..5, &mut problem, spec)?;
//! let mut b = VariableFamily::from_labels("b", 0..6, &mut problem, spec)?;
//! b.shift_labels(3)?;
//!
//! problem += a.le(&b)?; // constraints for labels 3 and 4 only
//! problem += a.sum();
//! let status = problem.solve()?;
//! println!("{status}: {:?}", a.get_value(&problem)?);
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod constraints;
pub mod error;
pub mod family;
pub mod grid;
pub mod index;
pub mod label;
pub mod logging;
pub mod problem;

pub use align::{Aligned, BinaryOp, Operand, apply};
pub use constraints::ConstraintSet;
pub use error::FrameError;
pub use family::{ExprFamily, VariableFamily, VariableSpec};
pub use grid::{Axis, ExprGrid, VariableGrid};
pub use index::LabelIndex;
pub use label::Label;
pub use logging::{LogFormat, LoggingError, init_logging};
pub use problem::{LpProblem, LpStatus};

pub use lpvec_core::{Domain, Sense, SolverConfig};
pub use lpvec_expr::{ComparisonSense, ConstraintExpr, Expr, VariableId};
