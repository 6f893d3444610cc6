#![allow(clippy::float_cmp)]

use indexmap::IndexMap;
use lpvec::{
    Axis, FrameError, Label, LpProblem, LpStatus, Sense, SolverConfig, VariableFamily,
    VariableGrid, VariableSpec,
};

fn unit() -> VariableSpec {
    VariableSpec::continuous().with_bounds(0.0, 1.0)
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

#[test]
fn test_maximize_bounded_sum() {
    let mut problem = LpProblem::new("bounded", Sense::Maximize);
    let a = VariableFamily::from_labels("a", 0..5, &mut problem, unit()).unwrap();
    problem += a.sum();

    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);
    let values = a.get_value(&problem).unwrap();
    assert_eq!(values.len(), 5);
    assert!(values.values().all(|v| close(*v, 1.0)));
    assert!(close(problem.objective_value().unwrap(), 5.0));
}

#[test]
fn test_shifted_comparison_with_free_variables_is_unbounded() {
    let mut problem = LpProblem::new("BasicExample", Sense::Maximize);
    let a = VariableFamily::from_labels("a", 0..5, &mut problem, VariableSpec::default()).unwrap();
    let mut b = VariableFamily::from_labels("b", 0..6, &mut problem, VariableSpec::default()).unwrap();
    b.shift_labels(3).unwrap();

    problem += a.le(&b).unwrap();
    problem += a.sum();

    assert_eq!(problem.num_constraints(), 2);
    assert_eq!(problem.solve().unwrap(), LpStatus::Unbounded);
    assert_eq!(problem.status().code(), -2);
    assert_eq!(a.get_value(&problem), Err(FrameError::NotSolved));
}

#[test]
fn test_shifted_comparison_with_bounded_family_is_optimal() {
    let mut problem = LpProblem::new("BasicExample", Sense::Maximize);
    let a = VariableFamily::from_labels("a", 0..5, &mut problem, unit()).unwrap();
    let mut b = VariableFamily::from_labels("b", 0..6, &mut problem, unit()).unwrap();
    b.shift_labels(3).unwrap();

    problem += a.le(&b).unwrap();
    problem += a.sum();

    assert_eq!(problem.solve().unwrap().code(), 1);
    let values = a.get_value(&problem).unwrap();
    assert_eq!(
        values.keys().cloned().collect::<Vec<_>>(),
        (0..5).map(Label::from).collect::<Vec<_>>()
    );
    assert!(values.values().all(|v| close(*v, 1.0)));

    let b_values = b.get_value(&problem).unwrap();
    assert!(close(b_values[&Label::from(3)], 1.0));
    assert!(close(b_values[&Label::from(4)], 1.0));
}

#[test]
fn test_resolve_after_adding_constraints() {
    let mut problem = LpProblem::new("resolve", Sense::Maximize);
    let a = VariableFamily::from_labels("a", 0..3, &mut problem, unit()).unwrap();
    problem += a.sum();
    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);

    let mut caps = IndexMap::new();
    caps.insert(Label::from(1), 0.25);
    problem += a.le(&caps).unwrap();
    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);

    let values = a.get_value(&problem).unwrap();
    assert!(close(values[&Label::from(1)], 0.25));
    assert!(close(problem.objective_value().unwrap(), 2.25));
}

#[test]
fn test_infeasible_problem() {
    let mut problem = LpProblem::new("infeasible", Sense::Minimize)
        .with_config(SolverConfig::new().with_presolve(false));
    let a = VariableFamily::from_labels("a", 0..2, &mut problem, unit()).unwrap();
    problem += a.ge(2.0).unwrap();
    problem += a.sum();

    assert_eq!(problem.solve().unwrap(), LpStatus::Infeasible);
    assert_eq!(a.get_value(&problem), Err(FrameError::NotSolved));
}

#[test]
fn test_deferred_error_surfaces_on_solve() {
    let mut problem = LpProblem::new("deferred", Sense::Minimize);
    let a = VariableFamily::from_labels("a", 0..2, &mut problem, unit()).unwrap();
    problem += a.le(f64::NAN).unwrap();
    problem += a.sum();

    let err = problem.solve().unwrap_err();
    assert_eq!(err.code(), "CONSTRAINT_INVALID_RHS");
    assert_eq!(problem.status(), LpStatus::NotSolved);
    assert_eq!(problem.num_constraints(), 0);
}

#[test]
fn test_integer_family() {
    let mut problem = LpProblem::new("integer", Sense::Maximize);
    let spec = VariableSpec::integer().with_bounds(0.0, 10.0);
    let n = VariableFamily::from_labels("n", ["x", "y"], &mut problem, spec).unwrap();
    problem += n.mul(2.0).unwrap().le(5.0).unwrap();
    problem += n.sum();

    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);
    let values = n.get_value(&problem).unwrap();
    assert!(close(values[&Label::from("x")], 2.0));
    assert!(close(values[&Label::from("y")], 2.0));
}

#[test]
fn test_grid_transport() {
    let mut problem = LpProblem::new("transport", Sense::Minimize);
    let spec = VariableSpec::continuous().with_lower(0.0);
    let ship = VariableGrid::from_labels("ship", ["s1", "s2"], ["d1", "d2"], &mut problem, spec)
        .unwrap();

    let mut supply = IndexMap::new();
    supply.insert(Label::from("s1"), 5.0);
    supply.insert(Label::from("s2"), 5.0);
    let mut demand = IndexMap::new();
    demand.insert(Label::from("d1"), 3.0);
    demand.insert(Label::from("d2"), 4.0);

    let shipped_to = ship.sum_axis(Axis::Rows);
    let shipped_from = ship.sum_axis(Axis::Columns);
    problem += shipped_to.ge(&demand).unwrap();
    problem += shipped_from.le(&supply).unwrap();
    problem += ship.sum();

    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);
    assert!(close(problem.objective_value().unwrap(), 7.0));

    let received = shipped_to.get_value(&problem).unwrap();
    assert!(close(received[&Label::from("d1")], 3.0));
    assert!(close(received[&Label::from("d2")], 4.0));

    let cells = ship.get_value(&problem).unwrap();
    assert_eq!(cells.len(), 4);
    let total: f64 = cells.values().sum();
    assert!(close(total, 7.0));
}

#[test]
fn test_out_of_range_config_is_a_solver_failure() {
    for config in [
        SolverConfig::new().with_time_limit(-1.0),
        SolverConfig::new().with_mip_gap(-0.1),
        SolverConfig::new().with_tolerance(0.0),
    ] {
        let mut problem = LpProblem::new("config", Sense::Maximize).with_config(config);
        let a = VariableFamily::from_labels("a", 0..2, &mut problem, unit()).unwrap();
        problem += a.sum();

        let err = problem.solve().unwrap_err();
        assert!(matches!(err, FrameError::SolverFailure(_)));
        assert_eq!(problem.status(), LpStatus::NotSolved);
    }
}

#[test]
fn test_failed_resolve_forgets_previous_solution() {
    let mut problem = LpProblem::new("resolve", Sense::Maximize);
    let a = VariableFamily::from_labels("a", 0..2, &mut problem, unit()).unwrap();
    problem += a.sum();
    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);

    problem.set_config(SolverConfig::new().with_time_limit(-1.0));
    assert!(problem.solve().is_err());
    assert_eq!(problem.status(), LpStatus::NotSolved);
    assert_eq!(a.get_value(&problem), Err(FrameError::NotSolved));
}

#[test]
fn test_problem_without_variables_is_optimal() {
    let mut problem = LpProblem::new("empty", Sense::Minimize);
    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);
    assert_eq!(problem.objective_value(), Some(0.0));

    let a = VariableFamily::from_labels("a", Vec::<i64>::new(), &mut problem, unit()).unwrap();
    problem += a.sum();
    assert_eq!(problem.solve().unwrap(), LpStatus::Optimal);
    assert!(a.get_value(&problem).unwrap().is_empty());
}
