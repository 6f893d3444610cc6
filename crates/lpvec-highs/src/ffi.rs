//! Thin safe layer over the `highs` crate.
//!
//! [`HighsModel`] collects columns, rows and options, and is consumed by
//! [`HighsModel::solve`]. The returned [`HighsOutcome`] owns the solved HiGHS
//! instance and answers queries about it.
#![allow(unsafe_code)]

use highs::{Col, HighsModelStatus, Model, RowProblem, Sense as HighsSense, SolvedModel};
use lpvec_core::Sense;
use std::ffi::{CStr, CString};
use std::fmt;
use tracing::{debug, trace};

/// Terminal model status, reduced to the cases callers act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    /// Unbounded, or HiGHS could not separate unbounded from infeasible.
    Unbounded,
    ReachedTimeLimit,
    ReachedIterationLimit,
    Unknown,
}

/// Errors from building or solving a HiGHS problem.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsModelError {
    ColumnIndexOutOfBounds { column_index: usize, num_columns: usize },
    /// HiGHS reported an error instead of a model status.
    SolveFailed { reason: String },
}

impl fmt::Display for HighsModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsModelError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "column {column_index} does not exist ({num_columns} columns)"
            ),
            HighsModelError::SolveFailed { reason } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for HighsModelError {}

/// Value of a HiGHS option.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

/// Primal and dual vectors copied out of a solved instance.
#[derive(Debug, Clone, Default)]
pub struct SolutionSnapshot {
    pub col_values: Vec<f64>,
    pub col_duals: Vec<f64>,
    pub row_values: Vec<f64>,
    pub row_duals: Vec<f64>,
}

/// A HiGHS row problem under construction.
pub struct HighsModel {
    problem: RowProblem,
    columns: Vec<Col>,
    sense: Sense,
    options: Vec<(String, HighsOption)>,
    output: bool,
}

impl HighsModel {
    pub fn new(sense: Sense) -> Self {
        Self {
            problem: RowProblem::default(),
            columns: Vec::new(),
            sense,
            options: Vec::new(),
            output: false,
        }
    }

    /// Add a column with bounds and objective coefficient; returns its index.
    pub fn add_col(&mut self, lower: f64, upper: f64, cost: f64, integer: bool) -> usize {
        let col = if integer {
            self.problem.add_integer_column(cost, lower..=upper)
        } else {
            self.problem.add_column(cost, lower..=upper)
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Add a row `lower <= sum(coef * col) <= upper` over existing columns.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        terms: &[(usize, f64)],
    ) -> Result<(), HighsModelError> {
        let factors = terms
            .iter()
            .map(|&(column_index, coef)| {
                self.columns
                    .get(column_index)
                    .map(|col| (*col, coef))
                    .ok_or(HighsModelError::ColumnIndexOutOfBounds {
                        column_index,
                        num_columns: self.columns.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.problem.add_row(lower..=upper, factors);
        Ok(())
    }

    /// Queue an option for the solve.
    pub fn set_option(&mut self, name: impl Into<String>, value: HighsOption) {
        self.options.push((name.into(), value));
    }

    /// Let HiGHS print its own log output.
    pub fn set_output(&mut self, enabled: bool) {
        self.output = enabled;
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.problem.num_rows()
    }

    /// Hand the problem to HiGHS and block until it returns.
    pub fn solve(self) -> Result<HighsOutcome, HighsModelError> {
        debug!(
            component = "solver",
            operation = "solve",
            status = "start",
            num_cols = self.num_cols(),
            num_rows = self.num_rows(),
            sense = self.sense.as_str(),
            options = self.options.len(),
            "Passing problem to HiGHS"
        );

        let sense = match self.sense {
            Sense::Minimize => HighsSense::Minimise,
            Sense::Maximize => HighsSense::Maximise,
        };
        let mut model =
            self.problem
                .try_optimise(sense)
                .map_err(|status| HighsModelError::SolveFailed {
                    reason: format!("HiGHS refused the problem ({status:?})"),
                })?;
        if !self.output {
            model.make_quiet();
        }
        for (name, value) in &self.options {
            apply_option(&mut model, name, value)?;
        }
        if self.output {
            apply_option(&mut model, "output_flag", &HighsOption::Bool(true))?;
            apply_option(&mut model, "log_to_console", &HighsOption::Bool(true))?;
        }

        let solved = model
            .try_solve()
            .map_err(|status| HighsModelError::SolveFailed {
                reason: format!("HiGHS returned {status:?}"),
            })?;
        let status = map_status(solved.status())?;
        Ok(HighsOutcome { status, solved })
    }
}

/// Set one option, surfacing a rejected name or value as an error.
///
/// `highs::Model::set_option` panics on a non-OK status, so the C setters
/// are called directly.
fn apply_option(model: &mut Model, name: &str, value: &HighsOption) -> Result<(), HighsModelError> {
    let rejected = || HighsModelError::SolveFailed {
        reason: format!("HiGHS rejected option {name} = {value:?}"),
    };
    let c_name = CString::new(name).map_err(|_| rejected())?;
    let highs = model.as_mut_ptr();
    let status = match value {
        HighsOption::Bool(val) => unsafe {
            highs_sys::Highs_setBoolOptionValue(highs, c_name.as_ptr(), highs_sys::HighsInt::from(*val))
        },
        HighsOption::Int(val) => unsafe {
            highs_sys::Highs_setIntOptionValue(highs, c_name.as_ptr(), *val)
        },
        HighsOption::Float(val) => unsafe {
            highs_sys::Highs_setDoubleOptionValue(highs, c_name.as_ptr(), *val)
        },
        HighsOption::Str(val) => {
            let c_value = CString::new(val.as_str()).map_err(|_| rejected())?;
            unsafe { highs_sys::Highs_setStringOptionValue(highs, c_name.as_ptr(), c_value.as_ptr()) }
        }
    };
    if status == highs_sys::STATUS_ERROR {
        debug!(
            component = "solver",
            operation = "set_option",
            status = "error",
            option = name,
            value = ?value,
            status_code = status,
            "HiGHS rejected option"
        );
        return Err(rejected());
    }
    trace!(
        component = "solver",
        operation = "set_option",
        status = "success",
        option = name,
        value = ?value,
        "Set HiGHS option"
    );
    Ok(())
}

impl fmt::Debug for HighsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsModel")
            .field("num_cols", &self.num_cols())
            .field("num_rows", &self.num_rows())
            .field("sense", &self.sense)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A solved HiGHS instance.
pub struct HighsOutcome {
    status: HighsStatus,
    solved: SolvedModel,
}

impl HighsOutcome {
    pub fn status(&self) -> HighsStatus {
        self.status
    }

    /// Objective value as HiGHS sees it.
    pub fn objective_value(&self) -> f64 {
        self.solved.objective_value()
    }

    pub fn mip_gap(&self) -> f64 {
        self.solved.mip_gap()
    }

    pub fn simplex_iteration_count(&self) -> u64 {
        self.int_info("simplex_iteration_count").unwrap_or(0)
    }

    pub fn snapshot(&self) -> SolutionSnapshot {
        let solution = self.solved.get_solution();
        SolutionSnapshot {
            col_values: solution.columns().to_vec(),
            col_duals: solution.dual_columns().to_vec(),
            row_values: solution.rows().to_vec(),
            row_duals: solution.dual_rows().to_vec(),
        }
    }

    fn int_info(&self, name: &str) -> Option<u64> {
        let c_name = CString::new(name).ok()?;
        let mut value: highs_sys::HighsInt = 0;
        let status = unsafe {
            highs_sys::Highs_getIntInfoValue(self.solved.as_ptr(), c_name.as_ptr(), &raw mut value)
        };
        if status == highs_sys::STATUS_OK {
            u64::try_from(value).ok()
        } else {
            debug!(
                component = "solver",
                operation = "solve_info",
                status = "warn",
                info = name,
                status_code = status,
                "HiGHS info value not available"
            );
            None
        }
    }
}

impl fmt::Debug for HighsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsOutcome")
            .field("status", &self.status)
            .field("objective_value", &self.objective_value())
            .finish_non_exhaustive()
    }
}

/// Version string of the linked HiGHS library.
pub fn highs_version() -> Option<String> {
    let ptr = unsafe { highs_sys::Highs_version() };
    if ptr.is_null() {
        return None;
    }
    let version = unsafe { CStr::from_ptr(ptr) };
    version.to_str().ok().map(str::to_string)
}

fn map_status(status: HighsModelStatus) -> Result<HighsStatus, HighsModelError> {
    let mapped = match status {
        HighsModelStatus::Optimal => HighsStatus::Optimal,
        HighsModelStatus::Infeasible => HighsStatus::Infeasible,
        HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
            HighsStatus::Unbounded
        }
        HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
        HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
        HighsModelStatus::LoadError
        | HighsModelStatus::ModelError
        | HighsModelStatus::PresolveError
        | HighsModelStatus::SolveError
        | HighsModelStatus::PostsolveError => {
            return Err(HighsModelError::SolveFailed {
                reason: format!("HiGHS model status {status:?}"),
            });
        }
        _ => HighsStatus::Unknown,
    };
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_row_rejects_unknown_column() {
        let mut model = HighsModel::new(Sense::Minimize);
        model.add_col(0.0, 1.0, 0.0, false);
        let err = model.add_row(0.0, 1.0, &[(0, 1.0), (3, 2.0)]).unwrap_err();
        assert_eq!(
            err,
            HighsModelError::ColumnIndexOutOfBounds {
                column_index: 3,
                num_columns: 1,
            }
        );
        assert_eq!(model.num_rows(), 0);
    }

    #[test]
    fn test_minimize_single_column() {
        let mut model = HighsModel::new(Sense::Minimize);
        let x = model.add_col(1.0, f64::INFINITY, 1.0, false);
        model.add_row(2.0, f64::INFINITY, &[(x, 1.0)]).unwrap();

        let outcome = model.solve().unwrap();
        assert_eq!(outcome.status(), HighsStatus::Optimal);
        assert!((outcome.objective_value() - 2.0).abs() < 1e-9);
        assert!((outcome.snapshot().col_values[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_option_is_an_error() {
        let mut model = HighsModel::new(Sense::Minimize);
        model.add_col(0.0, 1.0, 1.0, false);
        model.set_option("time_limit", HighsOption::Float(-1.0));
        let err = model.solve().unwrap_err();
        assert!(matches!(err, HighsModelError::SolveFailed { .. }));
        assert!(err.to_string().contains("time_limit"));
    }

    #[test]
    fn test_unknown_option_is_an_error() {
        let mut model = HighsModel::new(Sense::Minimize);
        model.add_col(0.0, 1.0, 1.0, false);
        model.set_option("no_such_option", HighsOption::Bool(true));
        assert!(matches!(
            model.solve(),
            Err(HighsModelError::SolveFailed { .. })
        ));
    }

    #[test]
    fn test_inverted_infinite_bounds_are_an_error() {
        let mut model = HighsModel::new(Sense::Minimize);
        model.add_col(f64::INFINITY, f64::INFINITY, 1.0, false);
        assert!(matches!(
            model.solve(),
            Err(HighsModelError::SolveFailed { .. })
        ));
    }

    #[test]
    fn test_version_is_reported() {
        assert!(highs_version().is_some_and(|v| !v.is_empty()));
    }

    #[test]
    fn test_error_statuses_are_failures() {
        assert!(map_status(HighsModelStatus::ModelError).is_err());
        assert_eq!(
            map_status(HighsModelStatus::UnboundedOrInfeasible),
            Ok(HighsStatus::Unbounded)
        );
    }
}
