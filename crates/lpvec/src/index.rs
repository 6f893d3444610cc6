//! Ordered sets of unique labels.

use crate::error::FrameError;
use crate::label::Label;
use indexmap::IndexSet;
use std::fmt;

/// Ordered sequence of unique [`Label`]s.
///
/// Order is insertion order and defines iteration and display order of every
/// container built on the index.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: IndexSet<Label>,
}

// Equality is order-sensitive, unlike `IndexSet`'s.
impl PartialEq for LabelIndex {
    fn eq(&self, other: &Self) -> bool {
        self.labels.iter().eq(other.labels.iter())
    }
}

impl Eq for LabelIndex {}

impl LabelIndex {
    /// Build an index, failing on the first repeated label.
    pub fn new<I, L>(labels: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let iter = labels.into_iter();
        let mut set = IndexSet::with_capacity(iter.size_hint().0);
        for label in iter {
            let label = label.into();
            if set.contains(&label) {
                return Err(FrameError::DuplicateLabel { label });
            }
            set.insert(label);
        }
        Ok(Self { labels: set })
    }

    /// Integer labels `start..end`.
    pub fn range(start: i64, end: i64) -> Self {
        Self {
            labels: (start..end).map(Label::Int).collect(),
        }
    }

    pub(crate) fn from_unique(labels: IndexSet<Label>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Label> {
        self.labels.iter()
    }

    /// Label at a position.
    pub fn get(&self, pos: usize) -> Option<&Label> {
        self.labels.get_index(pos)
    }

    /// Position of a label.
    pub fn position(&self, label: &Label) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Labels of `self` in order, followed by labels only in `other` in their order.
    pub fn union(&self, other: &LabelIndex) -> LabelIndex {
        let mut labels = self.labels.clone();
        labels.extend(other.labels.iter().cloned());
        Self { labels }
    }

    /// Labels present in both indexes, in `self`'s order.
    pub fn intersection(&self, other: &LabelIndex) -> LabelIndex {
        self.filter(|label| other.contains(label))
    }

    pub(crate) fn filter(&self, mut keep: impl FnMut(&Label) -> bool) -> LabelIndex {
        Self {
            labels: self.labels.iter().filter(|l| keep(l)).cloned().collect(),
        }
    }

    /// New index with every integer label moved by `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NotShiftable`] for the first non-integer label or
    /// the first label whose shift would overflow.
    pub fn shift(&self, offset: i64) -> Result<LabelIndex, FrameError> {
        let mut labels = IndexSet::with_capacity(self.labels.len());
        for label in &self.labels {
            let shifted = label
                .as_int()
                .and_then(|value| value.checked_add(offset))
                .ok_or_else(|| FrameError::NotShiftable {
                    label: label.clone(),
                })?;
            labels.insert(Label::Int(shifted));
        }
        Ok(Self { labels })
    }

    pub fn to_vec(&self) -> Vec<Label> {
        self.labels.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a LabelIndex {
    type Item = &'a Label;
    type IntoIter = indexmap::set::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

impl fmt::Display for LabelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (pos, label) in self.labels.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_duplicates() {
        let err = LabelIndex::new([0, 0, 1]).unwrap_err();
        assert_eq!(
            err,
            FrameError::DuplicateLabel {
                label: Label::Int(0)
            }
        );
    }

    #[test]
    fn test_union_keeps_left_order_then_right_only() {
        let a = LabelIndex::new([3, 1, 2]).unwrap();
        let b = LabelIndex::new([2, 5, 4, 3]).unwrap();
        assert_eq!(a.union(&b), LabelIndex::new([3, 1, 2, 5, 4]).unwrap());
        assert_ne!(a, LabelIndex::new([1, 2, 3]).unwrap());
    }

    #[test]
    fn test_intersection_keeps_left_order() {
        let a = LabelIndex::range(0, 5);
        let b = LabelIndex::new([6, 4, 3, 8]).unwrap();
        let common = a.intersection(&b);
        assert_eq!(common.to_vec(), vec![Label::Int(3), Label::Int(4)]);
        assert!(a.intersection(&LabelIndex::range(10, 12)).is_empty());
    }

    #[test]
    fn test_shift_integer_labels() {
        let shifted = LabelIndex::range(0, 3).shift(3).unwrap();
        assert_eq!(shifted.to_vec(), LabelIndex::range(3, 6).to_vec());
        assert_eq!(shifted.position(&Label::Int(4)), Some(1));
        assert_eq!(shifted.get(2), Some(&Label::Int(5)));
    }

    #[test]
    fn test_shift_rejects_strings_and_overflow() {
        let err = LabelIndex::new(["a", "b"]).unwrap().shift(1).unwrap_err();
        assert!(err.is_type_error());

        let err = LabelIndex::new([i64::MAX]).unwrap().shift(1).unwrap_err();
        assert_eq!(
            err,
            FrameError::NotShiftable {
                label: Label::Int(i64::MAX)
            }
        );
    }

    #[test]
    fn test_display() {
        let index = LabelIndex::new(["x", "y"]).unwrap();
        assert_eq!(index.to_string(), "[x, y]");
    }
}
