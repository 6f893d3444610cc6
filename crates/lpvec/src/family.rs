//! One-dimensional label-indexed containers.

use crate::error::FrameError;
use crate::index::LabelIndex;
use crate::label::{Label, write_listing};
use crate::problem::LpProblem;
use indexmap::IndexMap;
use lpvec_core::{Bounds, Domain, ModelError, Variable};
use lpvec_expr::{Expr, VariableId, linear_sum};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Domain and bounds shared by every variable of a container.
///
/// The default is a continuous variable without bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VariableSpec {
    pub domain: Domain,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl VariableSpec {
    pub fn continuous() -> Self {
        Self::default()
    }

    pub fn integer() -> Self {
        Self {
            domain: Domain::Integer,
            ..Self::default()
        }
    }

    pub fn binary() -> Self {
        Self {
            domain: Domain::Binary,
            ..Self::default()
        }
    }

    pub fn with_lower(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn with_upper(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn with_bounds(self, lower: f64, upper: f64) -> Self {
        self.with_lower(lower).with_upper(upper)
    }

    /// The variable this spec describes, checked before anything is registered.
    pub(crate) fn to_variable(self) -> Result<Variable, FrameError> {
        let variable = Variable::with_domain(
            self.domain,
            Bounds::from_options(self.lower, self.upper),
        );
        if !variable.bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            }
            .into());
        }
        Ok(variable)
    }
}

pub(crate) fn register_variables(
    problem: &mut LpProblem,
    names: impl Iterator<Item = String>,
    variable: Variable,
) -> Result<Vec<VariableId>, FrameError> {
    let mut handles = Vec::with_capacity(names.size_hint().0);
    for name in names {
        handles.push(problem.add_variable(name, variable)?);
    }
    Ok(handles)
}

/// Decision variables keyed by a [`LabelIndex`], one handle per label.
///
/// Clones share handles with the original; relabelling one clone does not
/// touch the other.
#[derive(Debug, Clone)]
pub struct VariableFamily {
    name: String,
    index: LabelIndex,
    handles: Vec<VariableId>,
}

impl VariableFamily {
    /// Register one variable per label, named `{name}_{label}`.
    ///
    /// Labels and bounds are validated first; on error nothing is registered.
    pub fn from_labels<I, L>(
        name: impl Into<String>,
        labels: I,
        problem: &mut LpProblem,
        spec: VariableSpec,
    ) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let name = name.into();
        let index = LabelIndex::new(labels)?;
        let variable = spec.to_variable()?;
        let started = Instant::now();

        let names = index
            .iter()
            .map(|label| format!("{name}_{}", label.name_fragment()));
        let handles = register_variables(problem, names, variable)?;

        debug!(
            component = "family",
            operation = "from_labels",
            status = "success",
            family = %name,
            variables = handles.len(),
            domain = spec.domain.as_str(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Registered variable family"
        );
        Ok(Self {
            name,
            index,
            handles,
        })
    }

    pub(crate) fn from_parts(name: String, index: LabelIndex, handles: Vec<VariableId>) -> Self {
        Self {
            name,
            index,
            handles,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &LabelIndex {
        &self.index
    }

    /// Handles in label order.
    pub fn handles(&self) -> &[VariableId] {
        &self.handles
    }

    pub fn get(&self, label: impl Into<Label>) -> Option<VariableId> {
        let label = label.into();
        self.index
            .position(&label)
            .and_then(|pos| self.handles.get(pos).copied())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, VariableId)> {
        self.index.iter().zip(self.handles.iter().copied())
    }

    /// Move every integer label by `offset`, keeping the same handles.
    pub fn shift_labels(&mut self, offset: i64) -> Result<(), FrameError> {
        self.index = self.index.shift(offset)?;
        Ok(())
    }

    /// Replace the labels; the new index must have one label per handle.
    pub fn set_labels(&mut self, index: LabelIndex) -> Result<(), FrameError> {
        if index.len() != self.handles.len() {
            return Err(FrameError::shape_mismatch(format!(
                "family '{}' has {} variables but the new index has {} labels",
                self.name,
                self.handles.len(),
                index.len()
            )));
        }
        self.index = index;
        Ok(())
    }

    /// Sum of all variables, each with coefficient 1.
    pub fn sum(&self) -> Expr {
        Expr::from_linear(self.handles.iter().map(|id| (*id, 1.0)).collect())
    }

    /// Weighted sum over the labels present in both the family and `weights`.
    pub fn dot(&self, weights: &IndexMap<Label, f64>) -> Expr {
        Expr::from_linear(
            self.iter()
                .filter_map(|(label, id)| weights.get(label).map(|w| (id, *w)))
                .collect(),
        )
    }

    pub fn to_exprs(&self) -> ExprFamily {
        ExprFamily::from_parts(
            self.index.clone(),
            self.handles.iter().map(|id| Expr::var(*id)).collect(),
        )
    }

    /// Per-label values of the latest solve.
    pub fn get_value(&self, problem: &LpProblem) -> Result<IndexMap<Label, f64>, FrameError> {
        let values = problem.solution_values()?;
        self.iter()
            .map(|(label, id)| {
                let value = values
                    .get(id.index())
                    .copied()
                    .ok_or(FrameError::NotSolved)?;
                Ok::<_, FrameError>((label.clone(), value))
            })
            .collect()
    }
}

/// The family name, then one `label    handle` line per variable.
impl fmt::Display for VariableFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.is_empty() {
            writeln!(f)?;
        }
        write_listing(f, self.iter())
    }
}

/// Linear expressions keyed by a [`LabelIndex`]; the result of family arithmetic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprFamily {
    index: LabelIndex,
    exprs: Vec<Expr>,
}

impl ExprFamily {
    /// Pair labels with expressions positionally.
    pub fn new(index: LabelIndex, exprs: Vec<Expr>) -> Result<Self, FrameError> {
        if index.len() != exprs.len() {
            return Err(FrameError::shape_mismatch(format!(
                "{} labels for {} expressions",
                index.len(),
                exprs.len()
            )));
        }
        Ok(Self { index, exprs })
    }

    pub(crate) fn from_parts(index: LabelIndex, exprs: Vec<Expr>) -> Self {
        Self { index, exprs }
    }

    pub fn labels(&self) -> &LabelIndex {
        &self.index
    }

    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    pub fn get(&self, label: impl Into<Label>) -> Option<&Expr> {
        let label = label.into();
        self.index
            .position(&label)
            .and_then(|pos| self.exprs.get(pos))
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Expr)> {
        self.index.iter().zip(self.exprs.iter())
    }

    pub fn sum(&self) -> Expr {
        linear_sum(self.exprs.iter().cloned())
    }

    pub fn to_exprs(&self) -> ExprFamily {
        self.clone()
    }

    pub fn shift_labels(&mut self, offset: i64) -> Result<(), FrameError> {
        self.index = self.index.shift(offset)?;
        Ok(())
    }

    pub(crate) fn map(self, f: impl Fn(&Expr) -> Expr) -> ExprFamily {
        let exprs = self.exprs.iter().map(f).collect();
        Self {
            index: self.index,
            exprs,
        }
    }

    /// Per-label values of the expressions at the latest solution.
    pub fn get_value(&self, problem: &LpProblem) -> Result<IndexMap<Label, f64>, FrameError> {
        let values = problem.solution_values()?;
        self.iter()
            .map(|(label, expr)| {
                let value = expr
                    .evaluate(|id| values.get(id.index()).copied())
                    .ok_or(FrameError::NotSolved)?;
                Ok::<_, FrameError>((label.clone(), value))
            })
            .collect()
    }
}

impl fmt::Display for ExprFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(f, self.iter())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use lpvec_core::Sense;

    fn problem() -> LpProblem {
        LpProblem::new("family", Sense::Minimize)
    }

    #[test]
    fn test_from_labels_names_variables() {
        let mut problem = problem();
        let x = VariableFamily::from_labels("x", ["a", "b"], &mut problem, VariableSpec::default())
            .unwrap();

        assert_eq!(x.len(), 2);
        let b = x.get("b").unwrap();
        assert_eq!(problem.variable_name(b), Some("x_b"));
        let var = problem.model().get_variable(b).unwrap();
        assert_eq!(var.bounds, Bounds::free());
        assert_eq!(var.domain, Domain::Continuous);
    }

    #[test]
    fn test_duplicate_labels_register_nothing() {
        let mut problem = problem();
        let err = VariableFamily::from_labels("x", [0, 0, 1], &mut problem, VariableSpec::default())
            .unwrap_err();
        assert_eq!(err, FrameError::DuplicateLabel { label: Label::Int(0) });
        assert_eq!(problem.num_variables(), 0);
    }

    #[test]
    fn test_invalid_bounds_register_nothing() {
        let mut problem = problem();
        let spec = VariableSpec::continuous().with_bounds(2.0, 1.0);
        let err = VariableFamily::from_labels("x", 0..3, &mut problem, spec).unwrap_err();
        assert_eq!(err.code(), "VARIABLE_INVALID_BOUNDS");
        assert_eq!(problem.num_variables(), 0);
    }

    #[test]
    fn test_unusable_bounds_register_nothing() {
        let mut problem = problem();
        for spec in [
            VariableSpec::binary().with_lower(f64::NAN),
            VariableSpec::binary().with_upper(f64::NAN),
            VariableSpec::continuous().with_lower(f64::INFINITY),
            VariableSpec::integer().with_upper(f64::NEG_INFINITY),
        ] {
            let err = VariableFamily::from_labels("x", 0..3, &mut problem, spec).unwrap_err();
            assert_eq!(err.code(), "VARIABLE_INVALID_BOUNDS");
        }
        assert_eq!(problem.num_variables(), 0);
    }

    #[test]
    fn test_binary_spec_is_clamped() {
        let mut problem = problem();
        let x = VariableFamily::from_labels("x", 0..2, &mut problem, VariableSpec::binary()).unwrap();
        let var = problem.model().get_variable(x.handles()[0]).unwrap();
        assert_eq!(var.bounds, Bounds::new(0.0, 1.0));
    }

    #[test]
    fn test_shift_and_set_labels_keep_handles() {
        let mut problem = problem();
        let mut b = VariableFamily::from_labels("b", 0..6, &mut problem, VariableSpec::default())
            .unwrap();
        let before = b.handles().to_vec();

        b.shift_labels(3).unwrap();
        assert_eq!(b.labels(), &LabelIndex::range(3, 9));
        assert_eq!(b.handles(), before.as_slice());
        assert_eq!(b.get(3), Some(before[0]));
        assert_eq!(problem.num_variables(), 6);

        let err = b.set_labels(LabelIndex::range(0, 2)).unwrap_err();
        assert_eq!(err.code(), "FRAME_SHAPE_MISMATCH");
        b.set_labels(LabelIndex::new(["a", "b", "c", "d", "e", "f"]).unwrap())
            .unwrap();
        assert_eq!(b.get("f"), Some(before[5]));
    }

    #[test]
    fn test_clone_relabels_independently() {
        let mut problem = problem();
        let a = VariableFamily::from_labels("a", 0..3, &mut problem, VariableSpec::default())
            .unwrap();
        let mut shifted = a.clone();
        shifted.shift_labels(10).unwrap();
        assert_eq!(a.labels(), &LabelIndex::range(0, 3));
        assert_eq!(shifted.handles(), a.handles());
    }

    #[test]
    fn test_sum_and_dot() {
        let mut problem = problem();
        let a = VariableFamily::from_labels("a", 0..3, &mut problem, VariableSpec::default())
            .unwrap();
        let total = a.sum();
        assert_eq!(total.linear_terms().len(), 3);
        assert!(total.linear_terms().iter().all(|(_, c)| *c == 1.0));

        let mut weights = IndexMap::new();
        weights.insert(Label::from(2), 4.0);
        weights.insert(Label::from(7), 1.0);
        let weighted = a.dot(&weights);
        assert_eq!(weighted.linear_terms(), &[(a.handles()[2], 4.0)]);
    }

    #[test]
    fn test_get_value_requires_solution() {
        let mut problem = problem();
        let a = VariableFamily::from_labels("a", 0..2, &mut problem, VariableSpec::default())
            .unwrap();
        assert_eq!(a.get_value(&problem), Err(FrameError::NotSolved));
        assert_eq!(a.to_exprs().get_value(&problem), Err(FrameError::NotSolved));
    }

    #[test]
    fn test_display_lists_labels() {
        let mut problem = problem();
        let x = VariableFamily::from_labels("x", [1, 10], &mut problem, VariableSpec::default())
            .unwrap();
        assert_eq!(x.to_string(), "x\n1     x0\n10    x1");

        let shifted = x.to_exprs().map(|expr| expr.scale(2.0));
        assert_eq!(shifted.to_string(), "1     2 x0\n10    2 x1");
        assert_eq!(ExprFamily::default().to_string(), "");
    }

    #[test]
    fn test_expr_family_requires_matching_lengths() {
        let err = ExprFamily::new(LabelIndex::range(0, 2), vec![Expr::from_constant(1.0)])
            .unwrap_err();
        assert_eq!(err.code(), "FRAME_SHAPE_MISMATCH");
    }
}
