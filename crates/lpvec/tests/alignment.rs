#![allow(clippy::float_cmp)]

use indexmap::IndexMap;
use lpvec::{
    BinaryOp, ComparisonSense, FrameError, Label, LabelIndex, LpProblem, Sense, VariableFamily,
    VariableGrid, VariableSpec, apply,
};

fn families() -> (LpProblem, VariableFamily, VariableFamily) {
    let mut problem = LpProblem::new("BasicExample", Sense::Maximize);
    let a = VariableFamily::from_labels("a", 0..5, &mut problem, VariableSpec::default()).unwrap();
    let b = VariableFamily::from_labels("b", 0..6, &mut problem, VariableSpec::default()).unwrap();
    (problem, a, b)
}

#[test]
fn test_shifted_comparison_yields_overlap_constraints() {
    let (mut problem, a, mut b) = families();
    b.shift_labels(3).unwrap();

    let constraints = a.le(&b).unwrap();
    assert_eq!(constraints.len(), 2);
    assert_eq!(
        constraints.labels().cloned().collect::<Vec<_>>(),
        vec![Label::from(3), Label::from(4)]
    );
    for (label, constraint) in constraints.iter() {
        assert_eq!(constraint.sense(), ComparisonSense::LessEqual);
        let terms = constraint.expr().linear_terms();
        assert_eq!(terms[0], (a.get(label).unwrap(), 1.0));
        assert_eq!(terms[1], (b.get(label).unwrap(), -1.0));
    }

    problem += constraints;
    assert_eq!(problem.num_constraints(), 2);
}

#[test]
fn test_shift_keeps_handles_and_registers_nothing() {
    let (problem, _, mut b) = families();
    let handles = b.handles().to_vec();

    b.shift_labels(3).unwrap();

    assert_eq!(b.labels(), &LabelIndex::range(3, 9));
    assert_eq!(b.handles(), handles.as_slice());
    assert_eq!(problem.num_variables(), 11);
    assert_eq!(problem.variable_name(b.get(3).unwrap()), Some("b_0"));
}

#[test]
fn test_scalar_minus_family() {
    let (_, a, _) = families();
    let c = a.rsub(1.0).unwrap();

    assert_eq!(c.labels(), a.labels());
    for (label, expr) in c.iter() {
        assert_eq!(expr.constant(), 1.0);
        assert_eq!(expr.linear_terms(), &[(a.get(label).unwrap(), -1.0)]);
    }
}

#[test]
fn test_disjoint_comparison_is_a_noop() {
    let (mut problem, a, mut b) = families();
    b.shift_labels(100).unwrap();

    let constraints = a.eq(&b).unwrap();
    assert!(constraints.is_empty());
    problem += constraints;
    assert_eq!(problem.num_constraints(), 0);
}

#[test]
fn test_duplicate_labels_rejected_before_registration() {
    let mut problem = LpProblem::new("dup", Sense::Minimize);
    let err = VariableFamily::from_labels("x", [0, 0, 1], &mut problem, VariableSpec::default())
        .unwrap_err();
    assert_eq!(err, FrameError::DuplicateLabel { label: Label::from(0) });
    assert_eq!(problem.num_variables(), 0);

    let err = VariableGrid::from_labels("g", 0..2, ["c", "c"], &mut problem, VariableSpec::default())
        .unwrap_err();
    assert_eq!(err.code(), "LABEL_DUPLICATE");
    assert_eq!(problem.num_variables(), 0);
}

#[test]
fn test_invalid_operations() {
    let (mut problem, a, b) = families();
    let grid = VariableGrid::from_labels("g", 0..5, 0..2, &mut problem, VariableSpec::default())
        .unwrap();

    let err = apply(&a, BinaryOp::Add, &grid).unwrap_err();
    assert!(matches!(err, FrameError::ShapeMismatch { .. }));

    assert_eq!(apply(&a, BinaryOp::Mul, &b).unwrap_err(), FrameError::NonLinear);
    assert_eq!(a.div(0.0).unwrap_err(), FrameError::DivisionByZero);

    let mut weights = IndexMap::new();
    weights.insert(Label::from(0), 1.0);
    let err = apply(&weights, BinaryOp::Le, 2.0).unwrap_err();
    assert_eq!(err.code(), "FRAME_SHAPE_MISMATCH");

    let err = LabelIndex::new(["x"]).unwrap().shift(1).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_expression_families_chain() {
    let (_, a, mut b) = families();
    b.shift_labels(3).unwrap();

    // 2a - b + 1 >= 0 over the overlap
    let lhs = a.mul(2.0).unwrap().sub(&b).unwrap().add(1.0).unwrap();
    let constraints = lhs.ge(0.0).unwrap();
    assert_eq!(constraints.len(), 2);
    let c3 = constraints.get(&Label::from(3)).unwrap();
    assert_eq!(c3.sense(), ComparisonSense::GreaterEqual);
    assert_eq!(c3.rhs(), -1.0);
    assert_eq!(c3.expr().constant(), 0.0);
}

#[test]
fn test_grid_row_family_against_family() {
    let mut problem = LpProblem::new("rows", Sense::Minimize);
    let x = VariableGrid::from_labels("x", ["r1", "r2"], 0..3, &mut problem, VariableSpec::default())
        .unwrap();
    let cap = VariableFamily::from_labels("cap", 1..4, &mut problem, VariableSpec::default())
        .unwrap();

    let row = x.row("r2").unwrap();
    let constraints = row.le(&cap).unwrap();
    assert_eq!(
        constraints.labels().cloned().collect::<Vec<_>>(),
        vec![Label::from(1), Label::from(2)]
    );
}
