//! Two-dimensional label-indexed containers.

use crate::error::FrameError;
use crate::family::{ExprFamily, VariableFamily, VariableSpec, register_variables};
use crate::index::LabelIndex;
use crate::label::{Label, write_listing};
use crate::problem::LpProblem;
use indexmap::IndexMap;
use lpvec_expr::{Expr, VariableId, linear_sum};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Axis collapsed by a grid sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Sum down each column; the result is indexed by columns.
    Rows,
    /// Sum across each row; the result is indexed by rows.
    Columns,
}

/// Sum a row-major `rows x columns` buffer along one axis.
fn sum_over_axis(values: &[Expr], rows: usize, columns: usize, axis: Axis) -> Vec<Expr> {
    match axis {
        Axis::Rows => {
            let mut result = vec![Expr::default(); columns];
            for r in 0..rows {
                for (c, slot) in result.iter_mut().enumerate() {
                    *slot = Expr::add(slot, &values[r * columns + c]);
                }
            }
            result
        }
        Axis::Columns if columns == 0 => vec![Expr::default(); rows],
        Axis::Columns => values
            .chunks(columns)
            .take(rows)
            .map(|row| linear_sum(row.iter().cloned()))
            .collect(),
    }
}

/// Decision variables keyed by a row index and a column index.
///
/// Handles are stored row-major. A row behaves as a [`VariableFamily`] over
/// the column labels and a column as one over the row labels.
#[derive(Debug, Clone)]
pub struct VariableGrid {
    name: String,
    rows: LabelIndex,
    columns: LabelIndex,
    handles: Vec<VariableId>,
}

impl VariableGrid {
    /// Register one variable per cell, named `{name}_{row}_{column}`.
    pub fn from_labels<R, RL, C, CL>(
        name: impl Into<String>,
        rows: R,
        columns: C,
        problem: &mut LpProblem,
        spec: VariableSpec,
    ) -> Result<Self, FrameError>
    where
        R: IntoIterator<Item = RL>,
        RL: Into<Label>,
        C: IntoIterator<Item = CL>,
        CL: Into<Label>,
    {
        let name = name.into();
        let rows = LabelIndex::new(rows)?;
        let columns = LabelIndex::new(columns)?;
        let variable = spec.to_variable()?;
        let started = Instant::now();

        let names = rows.iter().flat_map(|row| {
            let name = &name;
            columns.iter().map(move |col| {
                format!("{name}_{}_{}", row.name_fragment(), col.name_fragment())
            })
        });
        let handles = register_variables(problem, names, variable)?;

        debug!(
            component = "grid",
            operation = "from_labels",
            status = "success",
            grid = %name,
            rows = rows.len(),
            columns = columns.len(),
            variables = handles.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Registered variable grid"
        );
        Ok(Self {
            name,
            rows,
            columns,
            handles,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &LabelIndex {
        &self.rows
    }

    pub fn columns(&self) -> &LabelIndex {
        &self.columns
    }

    /// Row-major handles.
    pub fn handles(&self) -> &[VariableId] {
        &self.handles
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn get(&self, row: impl Into<Label>, column: impl Into<Label>) -> Option<VariableId> {
        let r = self.rows.position(&row.into())?;
        let c = self.columns.position(&column.into())?;
        self.handles.get(r * self.columns.len() + c).copied()
    }

    /// One row as a family over the column labels, sharing handles.
    pub fn row(&self, label: impl Into<Label>) -> Option<VariableFamily> {
        let label = label.into();
        let r = self.rows.position(&label)?;
        let width = self.columns.len();
        let handles = self.handles[r * width..(r + 1) * width].to_vec();
        Some(VariableFamily::from_parts(
            format!("{}_{}", self.name, label.name_fragment()),
            self.columns.clone(),
            handles,
        ))
    }

    /// One column as a family over the row labels, sharing handles.
    pub fn column(&self, label: impl Into<Label>) -> Option<VariableFamily> {
        let label = label.into();
        let c = self.columns.position(&label)?;
        let width = self.columns.len();
        let handles = (0..self.rows.len())
            .map(|r| self.handles[r * width + c])
            .collect();
        Some(VariableFamily::from_parts(
            format!("{}_{}", self.name, label.name_fragment()),
            self.rows.clone(),
            handles,
        ))
    }

    pub fn sum(&self) -> Expr {
        Expr::from_linear(self.handles.iter().map(|id| (*id, 1.0)).collect())
    }

    /// Collapse one axis; the result is indexed by the other.
    pub fn sum_axis(&self, axis: Axis) -> ExprFamily {
        self.to_exprs().sum_axis(axis)
    }

    pub fn shift_rows(&mut self, offset: i64) -> Result<(), FrameError> {
        self.rows = self.rows.shift(offset)?;
        Ok(())
    }

    pub fn shift_columns(&mut self, offset: i64) -> Result<(), FrameError> {
        self.columns = self.columns.shift(offset)?;
        Ok(())
    }

    pub fn to_exprs(&self) -> ExprGrid {
        ExprGrid::from_parts(
            self.rows.clone(),
            self.columns.clone(),
            self.handles.iter().map(|id| Expr::var(*id)).collect(),
        )
    }

    /// Per-cell values of the latest solve, keyed by `(row, column)`.
    pub fn get_value(
        &self,
        problem: &LpProblem,
    ) -> Result<IndexMap<(Label, Label), f64>, FrameError> {
        let values = problem.solution_values()?;
        let mut result = IndexMap::with_capacity(self.handles.len());
        for (r, row) in self.rows.iter().enumerate() {
            for (c, col) in self.columns.iter().enumerate() {
                let id = self.handles[r * self.columns.len() + c];
                let value = values
                    .get(id.index())
                    .copied()
                    .ok_or(FrameError::NotSolved)?;
                result.insert((row.clone(), col.clone()), value);
            }
        }
        Ok(result)
    }
}

/// Linear expressions keyed by rows and columns; the result of grid arithmetic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprGrid {
    rows: LabelIndex,
    columns: LabelIndex,
    exprs: Vec<Expr>,
}

impl ExprGrid {
    pub(crate) fn from_parts(rows: LabelIndex, columns: LabelIndex, exprs: Vec<Expr>) -> Self {
        Self {
            rows,
            columns,
            exprs,
        }
    }

    pub fn rows(&self) -> &LabelIndex {
        &self.rows
    }

    pub fn columns(&self) -> &LabelIndex {
        &self.columns
    }

    /// Row-major expressions.
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn get(&self, row: impl Into<Label>, column: impl Into<Label>) -> Option<&Expr> {
        let r = self.rows.position(&row.into())?;
        let c = self.columns.position(&column.into())?;
        self.exprs.get(r * self.columns.len() + c)
    }

    pub fn sum(&self) -> Expr {
        linear_sum(self.exprs.iter().cloned())
    }

    pub fn sum_axis(&self, axis: Axis) -> ExprFamily {
        let (rows, columns) = self.shape();
        let sums = sum_over_axis(&self.exprs, rows, columns, axis);
        let index = match axis {
            Axis::Rows => self.columns.clone(),
            Axis::Columns => self.rows.clone(),
        };
        ExprFamily::from_parts(index, sums)
    }

    pub fn to_exprs(&self) -> ExprGrid {
        self.clone()
    }

    pub(crate) fn map(self, f: impl Fn(&Expr) -> Expr) -> ExprGrid {
        let exprs = self.exprs.iter().map(f).collect();
        Self {
            rows: self.rows,
            columns: self.columns,
            exprs,
        }
    }
}

/// Cells in row-major order, keyed by `(row, column)`.
fn cell_labels(rows: &LabelIndex, columns: &LabelIndex) -> Vec<Label> {
    rows.iter()
        .flat_map(|row| columns.iter().map(move |col| Label::from((row.clone(), col.clone()))))
        .collect()
}

impl fmt::Display for VariableGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.is_empty() {
            writeln!(f)?;
        }
        let labels = cell_labels(&self.rows, &self.columns);
        write_listing(f, labels.iter().zip(&self.handles))
    }
}

impl fmt::Display for ExprGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = cell_labels(&self.rows, &self.columns);
        write_listing(f, labels.iter().zip(&self.exprs))
    }
}
