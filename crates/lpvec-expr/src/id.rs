//! Dense handles for variables and rows.

use std::fmt;

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub fn inner(self) -> u32 {
                self.0
            }

            /// Zero-based creation position.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

dense_id!(
    /// Column handle issued by a model.
    VariableId,
    "x"
);
dense_id!(
    /// Row handle issued by a model.
    ConstraintId,
    "c"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_raw_value() {
        let id = VariableId::new(7);
        assert_eq!(id.inner(), 7);
        assert_eq!(id.index(), 7);
        assert!(VariableId::new(1) < id);
    }

    #[test]
    fn display_uses_prefix() {
        assert_eq!(VariableId::new(3).to_string(), "x3");
        assert_eq!(ConstraintId::new(0).to_string(), "c0");
    }
}
