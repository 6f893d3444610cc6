//! Backend-neutral solve interface.
//!
//! A backend turns a [`Model`] into its own problem, blocks until it finishes
//! and reports a [`Solution`]. Infeasible and unbounded models come back as
//! statuses; [`SolverError`] is reserved for models the backend refuses and
//! for failures inside the backend.

use crate::Model;
use lpvec_expr::VariableId;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Terminal status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Stopped by the time limit; values hold the best point found, if any.
    TimeLimit,
    /// Stopped by the iteration limit; values hold the best point found, if any.
    IterationLimit,
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        self == SolverStatus::Optimal
    }

    /// Statuses under which a backend may report a primal point.
    pub fn may_have_values(self) -> bool {
        matches!(
            self,
            SolverStatus::Optimal | SolverStatus::TimeLimit | SolverStatus::IterationLimit
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::TimeLimit => "time_limit",
            SolverStatus::IterationLimit => "iteration_limit",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to run a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The model has no objective sense.
    NoObjective,
    /// The objective references a variable the model does not hold.
    UnknownVariable(VariableId),
    /// The solver settings are out of range.
    InvalidConfig(String),
    /// The backend rejected the model or failed while solving it.
    Backend { solver: &'static str, reason: String },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::NoObjective => "SOLVER_NO_OBJECTIVE",
            SolverError::UnknownVariable(_) => "SOLVER_UNKNOWN_VARIABLE",
            SolverError::InvalidConfig(_) => "SOLVER_INVALID_CONFIG",
            SolverError::Backend { .. } => "SOLVER_BACKEND",
        }
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::NoObjective => {
                write!(f, "[{}] Model has no objective sense", self.code())
            }
            SolverError::UnknownVariable(id) => write!(
                f,
                "[{}] Variable ID {} is not part of the model",
                self.code(),
                id.inner()
            ),
            SolverError::InvalidConfig(reason) => write!(f, "[{}] {}", self.code(), reason),
            SolverError::Backend { solver, reason } => {
                write!(f, "[{}] {} failed: {}", self.code(), solver, reason)
            }
        }
    }
}

impl std::error::Error for SolverError {}

/// Primal and dual values of a solved model, indexed by creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionValues {
    pub primal: Vec<f64>,
    /// Reduced costs, one per variable.
    pub reduced_costs: Vec<f64>,
    /// Row activities, one per constraint.
    pub row_activity: Vec<f64>,
    /// Shadow prices, one per constraint.
    pub row_duals: Vec<f64>,
    /// Objective value including the objective's constant term.
    pub objective_value: f64,
}

/// Outcome of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolverStatus,
    /// Present when the backend produced a primal point.
    pub values: Option<SolutionValues>,
    pub solve_time: Duration,
    /// Backend counters such as iteration counts or the MIP gap.
    pub stats: BTreeMap<String, f64>,
}

impl Solution {
    /// A solution carrying only a status.
    pub fn new(status: SolverStatus, solve_time: Duration) -> Self {
        Self {
            status,
            values: None,
            solve_time,
            stats: BTreeMap::new(),
        }
    }

    pub fn with_values(mut self, values: SolutionValues) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: f64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    pub fn has_values(&self) -> bool {
        self.values.is_some()
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.values.as_ref().map(|values| values.objective_value)
    }

    /// Primal value of one variable.
    pub fn value(&self, id: VariableId) -> Option<f64> {
        self.values.as_ref()?.primal.get(id.index()).copied()
    }
}

/// A solver backend.
pub trait Solver {
    /// Solve `model`, blocking until the backend returns.
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError>;
}
