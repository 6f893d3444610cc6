//! Labelled collections of constraints produced by aligned comparisons.

use crate::label::{Label, write_listing};
use lpvec_expr::ConstraintExpr;
use std::fmt;

/// Ordered `(label, constraint)` pairs.
///
/// Grid comparisons label each cell with the tuple `(row, column)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    entries: Vec<(Label, ConstraintExpr)>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, label: Label, constraint: ConstraintExpr) {
        self.entries.push((label, constraint));
    }

    /// Constraint stored under a label.
    pub fn get(&self, label: &Label) -> Option<&ConstraintExpr> {
        self.entries
            .iter()
            .find(|(entry_label, _)| entry_label == label)
            .map(|(_, constraint)| constraint)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.entries.iter().map(|(label, _)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Label, ConstraintExpr)> {
        self.entries.iter()
    }

    /// Append every constraint of `other` after those of `self`.
    pub fn extend(&mut self, other: ConstraintSet) {
        self.entries.extend(other.entries);
    }
}

impl IntoIterator for ConstraintSet {
    type Item = (Label, ConstraintExpr);
    type IntoIter = std::vec::IntoIter<(Label, ConstraintExpr)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Label, ConstraintExpr)> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = (Label, ConstraintExpr)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(f, self.entries.iter().map(|(label, constraint)| (label, constraint)))
    }
}
