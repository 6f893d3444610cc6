//! Labels that key the entries of families and grids.

use std::fmt;

/// A single index label: an integer, a string, or a tuple of labels.
///
/// Labels are ordered variant-first (all integers before all strings before
/// all tuples), then by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Int(i64),
    Str(String),
    Tuple(Vec<Label>),
}

impl Label {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Label::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Text used when the label becomes part of a variable name.
    ///
    /// Tuple parts are joined with `_`, so `("a", 1)` yields `a_1`.
    pub fn name_fragment(&self) -> String {
        match self {
            Label::Int(value) => value.to_string(),
            Label::Str(value) => value.clone(),
            Label::Tuple(parts) => parts
                .iter()
                .map(Label::name_fragment)
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(value) => write!(f, "{value}"),
            Label::Str(value) => write!(f, "{value}"),
            Label::Tuple(parts) => {
                write!(f, "(")?;
                for (pos, part) in parts.iter().enumerate() {
                    if pos > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Write one `label    value` line per entry, labels padded to a common width.
pub(crate) fn write_listing<'a, T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a Label, T)>,
) -> fmt::Result {
    let lines: Vec<(String, T)> = entries.map(|(label, value)| (label.to_string(), value)).collect();
    let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (pos, (label, value)) in lines.iter().enumerate() {
        if pos > 0 {
            writeln!(f)?;
        }
        write!(f, "{label:<width$}    {value}")?;
    }
    Ok(())
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Int(i64::from(value))
    }
}

impl From<u32> for Label {
    fn from(value: u32) -> Self {
        Label::Int(i64::from(value))
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value)
    }
}

impl From<&Label> for Label {
    fn from(value: &Label) -> Self {
        value.clone()
    }
}

impl From<Vec<Label>> for Label {
    fn from(parts: Vec<Label>) -> Self {
        Label::Tuple(parts)
    }
}

impl<A, B> From<(A, B)> for Label
where
    A: Into<Label>,
    B: Into<Label>,
{
    fn from((first, second): (A, B)) -> Self {
        Label::Tuple(vec![first.into(), second.into()])
    }
}
