//! HiGHS backend for lpvec models.
//!
//! Translates a flat `lpvec_core::Model` into a HiGHS row problem, solves it
//! synchronously and maps the outcome back onto `lpvec_core::Solution`.

pub mod ffi;
pub mod solver;
mod status;

pub use ffi::{
    HighsModel, HighsModelError, HighsOption, HighsOutcome, HighsStatus, SolutionSnapshot,
    highs_version,
};
pub use solver::HighsSolver;
