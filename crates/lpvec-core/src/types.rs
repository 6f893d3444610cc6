use lpvec_expr::VariableId;
use serde::{Deserialize, Serialize};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Value domain of a decision variable, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Continuous,
    Integer,
    Binary,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Continuous => "continuous",
            Domain::Integer => "integer",
            Domain::Binary => "binary",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Domain::Continuous)
    }
}

/// Bounds for a variable or constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// No bound on either side.
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Bounds from optional limits; a missing side is unbounded.
    pub fn from_options(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self::new(
            lower.unwrap_or(f64::NEG_INFINITY),
            upper.unwrap_or(f64::INFINITY),
        )
    }

    /// True when neither side is NaN, lower does not exceed upper, and
    /// neither side is infinite in the wrong direction.
    pub fn is_valid(self) -> bool {
        !self.lower.is_nan()
            && !self.upper.is_nan()
            && self.lower <= self.upper
            && self.lower != f64::INFINITY
            && self.upper != f64::NEG_INFINITY
    }
}

/// A decision variable with bounds and domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub bounds: Bounds,
    pub domain: Domain,
}

impl Variable {
    /// Create a binary variable with bounds [0, 1].
    pub fn binary() -> Self {
        Self {
            bounds: Bounds::new(0.0, 1.0),
            domain: Domain::Binary,
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            bounds,
            domain: Domain::Continuous,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            bounds,
            domain: Domain::Integer,
        }
    }

    /// Create a variable of the given domain.
    ///
    /// Binary variables are clamped to [0, 1] intersected with `bounds`.
    /// Invalid bounds are kept as given, so they still fail validation.
    pub fn with_domain(domain: Domain, bounds: Bounds) -> Self {
        match domain {
            Domain::Continuous => Self::continuous(bounds),
            Domain::Integer => Self::integer(bounds),
            Domain::Binary if !bounds.is_valid() => Self {
                bounds,
                domain: Domain::Binary,
            },
            Domain::Binary => Self {
                bounds: Bounds::new(bounds.lower.max(0.0), bounds.upper.min(1.0)),
                domain: Domain::Binary,
            },
        }
    }

    pub fn is_integer(&self) -> bool {
        self.domain.is_integer()
    }
}

/// A constraint row with lower and upper bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub bounds: Bounds,
}

/// Objective function with a sense and linear terms
#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub sense: Option<Sense>,
    pub terms: Vec<(VariableId, f64)>,
    pub constant: f64,
}

impl Objective {
    /// Create a new empty objective
    pub fn new() -> Self {
        Self::default()
    }
}
