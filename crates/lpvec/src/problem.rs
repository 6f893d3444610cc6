//! The problem facade that owns the model and its latest solution.

use crate::constraints::ConstraintSet;
use crate::error::FrameError;
use lpvec_core::{Model, PrettyPrintOptions, Sense, Solver, SolverConfig, SolverStatus, Variable};
use lpvec_expr::{ConstraintExpr, ConstraintId, Expr, VariableId};
use lpvec_highs::HighsSolver;
use std::fmt;
use std::ops::AddAssign;
use std::time::Instant;
use tracing::{debug, warn};

/// Outcome of the latest solve, with PuLP-compatible numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LpStatus {
    Optimal,
    #[default]
    NotSolved,
    Infeasible,
    Unbounded,
    Undefined,
}

impl LpStatus {
    /// Numeric status code: 1, 0, -1, -2, -3.
    pub fn code(self) -> i32 {
        match self {
            LpStatus::Optimal => 1,
            LpStatus::NotSolved => 0,
            LpStatus::Infeasible => -1,
            LpStatus::Unbounded => -2,
            LpStatus::Undefined => -3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LpStatus::Optimal => "Optimal",
            LpStatus::NotSolved => "Not Solved",
            LpStatus::Infeasible => "Infeasible",
            LpStatus::Unbounded => "Unbounded",
            LpStatus::Undefined => "Undefined",
        }
    }
}

impl From<SolverStatus> for LpStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Optimal => LpStatus::Optimal,
            SolverStatus::Infeasible => LpStatus::Infeasible,
            SolverStatus::Unbounded => LpStatus::Unbounded,
            SolverStatus::TimeLimit | SolverStatus::IterationLimit | SolverStatus::Unknown => {
                LpStatus::Undefined
            }
        }
    }
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named linear program: the model, its objective sense, solver settings,
/// and the values of the latest solve.
///
/// Every container constructor takes the problem explicitly; there is no
/// ambient current problem.
#[derive(Debug, Clone)]
pub struct LpProblem {
    name: String,
    sense: Sense,
    model: Model,
    config: SolverConfig,
    objective_set: bool,
    status: LpStatus,
    values: Option<Vec<f64>>,
    objective_value: Option<f64>,
    deferred_error: Option<FrameError>,
}

impl LpProblem {
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        let mut model = Model::new();
        model.set_objective_sense(sense);
        Self {
            name: name.into(),
            sense,
            model,
            config: SolverConfig::default(),
            objective_set: false,
            status: LpStatus::NotSolved,
            values: None,
            objective_value: None,
            deferred_error: None,
        }
    }

    /// Use `config` for every subsequent [`LpProblem::solve`].
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// The flat model handed to the solver.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn num_variables(&self) -> usize {
        self.model.num_variables()
    }

    pub fn num_constraints(&self) -> usize {
        self.model.num_constraints()
    }

    pub(crate) fn add_variable(
        &mut self,
        name: String,
        variable: Variable,
    ) -> Result<VariableId, FrameError> {
        Ok(self.model.add_named_variable(name, variable)?)
    }

    /// Name of a variable, as registered by its container.
    pub fn variable_name(&self, id: VariableId) -> Option<&str> {
        self.model.get_variable_name(id)
    }

    /// Add a single constraint.
    pub fn add_constraint(&mut self, constraint: ConstraintExpr) -> Result<ConstraintId, FrameError> {
        Ok(self.model.add_constraint_expr(constraint)?)
    }

    /// Add every constraint of a set, or none of them.
    pub fn add_constraints(&mut self, constraints: ConstraintSet) -> Result<Vec<ConstraintId>, FrameError> {
        self.add_named_constraints(None, constraints)
    }

    /// Like [`LpProblem::add_constraints`], naming each row `{prefix}_{label}`
    /// when a prefix is given.
    pub fn add_named_constraints(
        &mut self,
        prefix: Option<&str>,
        constraints: ConstraintSet,
    ) -> Result<Vec<ConstraintId>, FrameError> {
        for (_, constraint) in constraints.iter() {
            self.model.validate_constraint_expr(constraint)?;
        }

        let started = Instant::now();
        let mut ids = Vec::with_capacity(constraints.len());
        for (label, constraint) in constraints {
            let id = self.model.add_constraint_expr(constraint)?;
            if let Some(prefix) = prefix {
                self.model
                    .set_constraint_name(id, format!("{prefix}_{}", label.name_fragment()))?;
            }
            ids.push(id);
        }

        debug!(
            component = "problem",
            operation = "add_constraints",
            status = "success",
            constraints = ids.len(),
            total_constraints = self.model.num_constraints(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Added constraint set"
        );
        Ok(ids)
    }

    /// Set the objective, replacing any previous one.
    pub fn set_objective(&mut self, objective: Expr) -> Result<(), FrameError> {
        if self.objective_set {
            warn!(
                component = "problem",
                operation = "set_objective",
                status = "warn",
                problem = %self.name,
                "Replacing existing objective"
            );
        }
        self.model.set_objective(self.sense, objective)?;
        self.objective_set = true;
        Ok(())
    }

    fn defer(&mut self, result: Result<(), FrameError>) {
        let Err(err) = result else {
            return;
        };
        warn!(
            component = "problem",
            operation = "add_assign",
            status = "error",
            code = err.code(),
            "Deferring accumulation error until solve"
        );
        if self.deferred_error.is_none() {
            self.deferred_error = Some(err);
        }
    }

    /// Solve with HiGHS using the problem's [`SolverConfig`].
    pub fn solve(&mut self) -> Result<LpStatus, FrameError> {
        let mut solver = HighsSolver::with_config(self.config.clone());
        self.solve_with(&mut solver)
    }

    /// Solve with any backend.
    ///
    /// An error recorded by a failed `+=` is returned first, without calling
    /// the solver. Infeasible and unbounded problems are statuses, not errors.
    /// Values of any earlier solve are dropped first, so after an error the
    /// problem reads as `NotSolved`.
    pub fn solve_with<S: Solver>(&mut self, solver: &mut S) -> Result<LpStatus, FrameError> {
        self.status = LpStatus::NotSolved;
        self.values = None;
        self.objective_value = None;
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }

        let solution = solver.solve(&self.model)?;
        self.status = LpStatus::from(solution.status);
        self.objective_value = solution.objective_value();
        self.values = solution.values.map(|values| values.primal);

        debug!(
            component = "problem",
            operation = "solve",
            status = "success",
            problem = %self.name,
            lp_status = self.status.as_str(),
            variables = self.model.num_variables(),
            constraints = self.model.num_constraints(),
            duration_ms = solution.solve_time.as_secs_f64() * 1000.0,
            "Problem solved"
        );
        Ok(self.status)
    }

    /// Status of the latest solve; `NotSolved` before the first one.
    pub fn status(&self) -> LpStatus {
        self.status
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Value of one variable in the latest solution.
    pub fn value(&self, id: VariableId) -> Option<f64> {
        self.values.as_ref()?.get(id.index()).copied()
    }

    pub(crate) fn solution_values(&self) -> Result<&[f64], FrameError> {
        self.values.as_deref().ok_or(FrameError::NotSolved)
    }
}

impl AddAssign<ConstraintExpr> for LpProblem {
    fn add_assign(&mut self, constraint: ConstraintExpr) {
        let result = self.add_constraint(constraint).map(|_| ());
        self.defer(result);
    }
}

impl AddAssign<ConstraintSet> for LpProblem {
    fn add_assign(&mut self, constraints: ConstraintSet) {
        let result = self.add_constraints(constraints).map(|_| ());
        self.defer(result);
    }
}

impl AddAssign<Expr> for LpProblem {
    fn add_assign(&mut self, objective: Expr) {
        let result = self.set_objective(objective);
        self.defer(result);
    }
}

impl fmt::Display for LpProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        write!(f, "{}", self.model.format_lp(PrettyPrintOptions::full()))
    }
}
