//! Flat solver-facing model for lpvec.
//!
//! Label-indexed containers register their variables and constraints here;
//! solver backends read the model through the [`Solver`] trait.

pub mod config;
pub mod model;
pub mod solver;
pub mod types;

pub use config::{ConfigError, SolverConfig};
pub use model::{Model, ModelError, PrettyPrintOptions};
pub use solver::{Solution, SolutionValues, Solver, SolverError, SolverStatus};
pub use types::{Bounds, Constraint, Domain, Objective, Sense, Variable};
