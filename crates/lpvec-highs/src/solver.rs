//! HiGHS implementation of the [`lpvec_core::Solver`] trait.

use crate::ffi::{HighsModel, HighsModelError, HighsOption, HighsOutcome, highs_version};
use crate::status::{highs_has_solution, highs_to_core_status};
use lpvec_core::{
    Model, Solution, SolutionValues, Solver, SolverConfig, SolverError, SolverStatus,
};
use std::time::Instant;
use tracing::{debug, trace, warn};

const SOLVER_NAME: &str = "HiGHS";

/// Solves [`Model`]s with HiGHS.
///
/// Only configuration lives here. Each call to [`Solver::solve`] translates
/// the model into a fresh HiGHS problem.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_time_limit(&mut self, seconds: f64) {
        self.config.time_limit = Some(seconds);
    }

    pub fn set_mip_gap(&mut self, gap: f64) {
        self.config.mip_gap = Some(gap);
    }

    pub fn set_verbosity(&mut self, level: u32) {
        self.config.verbosity = Some(level);
    }

    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.config.log_to_console = Some(enabled);
    }
}

impl Solver for HighsSolver {
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
        let started = Instant::now();
        self.config
            .validate()
            .map_err(|err| SolverError::InvalidConfig(err.to_string()))?;
        if model.num_variables() == 0 {
            return empty_solution(model, started);
        }
        let highs = translate(model, &self.config)?;
        let outcome = highs.solve().map_err(backend_error)?;
        Ok(collect_solution(model, &outcome, started))
    }
}

fn backend_error(err: HighsModelError) -> SolverError {
    SolverError::Backend {
        solver: SOLVER_NAME,
        reason: err.to_string(),
    }
}

/// A model without columns is optimal at its objective constant.
///
/// HiGHS is not called; with no columns every row is `lower <= 0 <= upper`.
fn empty_solution(model: &Model, started: Instant) -> Result<Solution, SolverError> {
    let objective = model.objective();
    if objective.sense.is_none() {
        return Err(SolverError::NoObjective);
    }
    let row_activity = vec![0.0; model.num_constraints()];
    let status = if model
        .constraints()
        .all(|(_, constraint, _)| constraint.bounds.lower <= 0.0 && constraint.bounds.upper >= 0.0)
    {
        SolverStatus::Optimal
    } else {
        SolverStatus::Infeasible
    };
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver_status = %status,
        constraints = model.num_constraints(),
        "Model has no variables; skipping HiGHS"
    );
    let solution = Solution::new(status, started.elapsed());
    if !status.is_optimal() {
        return Ok(solution);
    }
    Ok(solution.with_values(SolutionValues {
        row_duals: vec![0.0; row_activity.len()],
        row_activity,
        objective_value: objective.constant,
        ..SolutionValues::default()
    }))
}

/// Copy columns, rows and options from `model` into a HiGHS problem.
fn translate(model: &Model, config: &SolverConfig) -> Result<HighsModel, SolverError> {
    let objective = model.objective();
    let sense = objective.sense.ok_or(SolverError::NoObjective)?;

    debug!(
        component = "solver",
        operation = "translate",
        status = "start",
        solver_version = %highs_version().unwrap_or_default(),
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        "Translating model for HiGHS"
    );

    // Columns are added in id order, so a variable's index is its column.
    let mut costs = vec![0.0; model.num_variables()];
    for &(var_id, coef) in &objective.terms {
        let slot = costs
            .get_mut(var_id.index())
            .ok_or(SolverError::UnknownVariable(var_id))?;
        *slot += coef;
    }

    let mut highs = HighsModel::new(sense);
    for ((var_id, var), cost) in model.variables().zip(costs) {
        let column = highs.add_col(var.bounds.lower, var.bounds.upper, cost, var.is_integer());
        trace!(
            component = "solver",
            operation = "add_column",
            status = "success",
            var_id = var_id.inner(),
            column,
            cost,
            domain = var.domain.as_str(),
            "Added column"
        );
    }

    let mut terms = Vec::new();
    for (constraint_id, constraint, row) in model.constraints() {
        terms.clear();
        terms.extend(row.iter().map(|&(var_id, coef)| (var_id.index(), coef)));
        highs
            .add_row(constraint.bounds.lower, constraint.bounds.upper, &terms)
            .map_err(backend_error)?;
        trace!(
            component = "solver",
            operation = "add_row",
            status = "success",
            constraint_id = constraint_id.inner(),
            nnz = row.len(),
            "Added row"
        );
    }

    apply_config(&mut highs, config);
    Ok(highs)
}

fn apply_config(highs: &mut HighsModel, config: &SolverConfig) {
    let chatty = config.log_to_console.unwrap_or(false) || config.verbosity.is_some_and(|v| v > 0);
    highs.set_output(chatty);

    if let Some(limit) = config.time_limit {
        highs.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        highs.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(presolve) = config.presolve {
        let mode = if presolve { "on" } else { "off" };
        highs.set_option("presolve", HighsOption::Str(mode.to_string()));
    }
    if let Some(threads) = config.threads {
        let threads = i32::try_from(threads).unwrap_or(i32::MAX);
        highs.set_option("threads", HighsOption::Int(threads));
    }
    if let Some(tolerance) = config.tolerance {
        for option in ["primal_feasibility_tolerance", "dual_feasibility_tolerance"] {
            highs.set_option(option, HighsOption::Float(tolerance));
        }
    }
}

fn collect_solution(model: &Model, outcome: &HighsOutcome, started: Instant) -> Solution {
    let highs_status = outcome.status();
    let iterations = outcome.simplex_iteration_count();
    let solution = Solution::new(highs_to_core_status(highs_status), started.elapsed())
        .with_stat("simplex_iterations", iterations as f64);

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver_status = ?highs_status,
        simplex_iterations = iterations,
        duration_ms = solution.solve_time.as_secs_f64() * 1000.0,
        "HiGHS solve finished"
    );

    if !highs_has_solution(highs_status) {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver_status = ?highs_status,
            "No primal solution available"
        );
        return solution;
    }
    if !solution.status.is_optimal() {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver_status = ?highs_status,
            "Returning best point found before the limit"
        );
    }

    let snapshot = outcome.snapshot();
    // HiGHS never sees the objective constant.
    let objective_value = outcome.objective_value() + model.objective().constant;
    solution
        .with_stat("mip_gap", outcome.mip_gap())
        .with_values(SolutionValues {
            primal: snapshot.col_values,
            reduced_costs: snapshot.col_duals,
            row_activity: snapshot.row_values,
            row_duals: snapshot.row_duals,
            objective_value,
        })
}
