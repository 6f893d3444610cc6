//! Status conversions between HiGHS and the solver-agnostic layer.

use crate::ffi::HighsStatus;
use lpvec_core::SolverStatus;

pub(crate) fn highs_to_core_status(status: HighsStatus) -> SolverStatus {
    match status {
        HighsStatus::Optimal => SolverStatus::Optimal,
        HighsStatus::Infeasible => SolverStatus::Infeasible,
        HighsStatus::Unbounded => SolverStatus::Unbounded,
        HighsStatus::ReachedTimeLimit => SolverStatus::TimeLimit,
        HighsStatus::ReachedIterationLimit => SolverStatus::IterationLimit,
        HighsStatus::Unknown => SolverStatus::Unknown,
    }
}

/// Statuses for which HiGHS exposes a usable primal point.
pub(crate) fn highs_has_solution(status: HighsStatus) -> bool {
    matches!(
        status,
        HighsStatus::Optimal | HighsStatus::ReachedTimeLimit | HighsStatus::ReachedIterationLimit
    )
}
