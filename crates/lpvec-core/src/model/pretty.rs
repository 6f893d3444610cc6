//! Human-readable LP listing of a model.

use std::fmt::Write as _;

use lpvec_expr::{ConstraintId, VariableId};

use crate::model::Model;
use crate::types::{Bounds, Domain, Sense};

const FLOAT_EQ_EPSILON: f64 = 1e-12;
const PREVIEW_CONSTRAINTS: usize = 20;
const PREVIEW_TERMS: usize = 30;

/// Formatting controls for the listing.
#[derive(Debug, Clone, Copy)]
pub struct PrettyPrintOptions {
    /// Maximum number of constraints to render.
    pub constraints: Option<usize>,
    /// Maximum number of terms to render per linear expression.
    pub terms: Option<usize>,
}

impl PrettyPrintOptions {
    /// Preview mode used by terse displays.
    pub fn preview() -> Self {
        Self {
            constraints: Some(PREVIEW_CONSTRAINTS),
            terms: Some(PREVIEW_TERMS),
        }
    }

    /// Full mode with no truncation.
    pub fn full() -> Self {
        Self {
            constraints: None,
            terms: None,
        }
    }
}

impl Model {
    /// Render objective, constraints and variable domains in creation order.
    pub fn format_lp(&self, options: PrettyPrintOptions) -> String {
        let mut lines = Vec::new();
        lines.push(self.render_objective_line(options.terms));
        lines.push("SUBJECT TO".to_string());

        let total = self.num_constraints();
        let limit = options.constraints.unwrap_or(total).min(total);
        if limit == 0 {
            lines.push(" (none)".to_string());
        }
        for (constraint_id, constraint, row) in self.constraints().take(limit) {
            let label = self.constraint_label(constraint_id);
            let lhs = self.format_terms(row, options.terms);
            lines.push(format!(" {label}: {lhs} {}", render_row_bounds(constraint.bounds)));
        }
        if limit < total {
            lines.push(format!(" ... ({} more constraints)", total - limit));
        }

        lines.push("VARIABLES".to_string());
        for (var_id, var) in self.variables() {
            let label = self.variable_label(var_id);
            let domain = match var.domain {
                Domain::Continuous => "Continuous",
                Domain::Integer => "Integer",
                Domain::Binary => "Binary",
            };
            lines.push(format!(" {} {domain}", format_variable_bounds(&label, var.bounds)));
        }

        lines.join("\n")
    }

    fn render_objective_line(&self, max_terms: Option<usize>) -> String {
        let objective = self.objective();
        let Some(sense) = objective.sense else {
            return "Objective: (not set)".to_string();
        };
        let sense_label = match sense {
            Sense::Minimize => "MINIMIZE",
            Sense::Maximize => "MAXIMIZE",
        };
        let mut expr = self.format_terms(&objective.terms, max_terms);
        if !float_approx_equal(objective.constant, 0.0) {
            let _ = write!(expr, " + {}", format_ascii_number(objective.constant));
        }
        format!("{sense_label}\n {expr}")
    }

    fn format_terms(&self, terms: &[(VariableId, f64)], max_terms: Option<usize>) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        let limit = max_terms.unwrap_or(terms.len()).min(terms.len());
        let mut rendered = String::new();
        for (idx, (var_id, coeff)) in terms.iter().take(limit).enumerate() {
            let label = self.variable_label(*var_id);
            let magnitude = coeff.abs();
            let body = if float_approx_equal(magnitude, 1.0) {
                label
            } else {
                format!("{} {label}", format_ascii_number(magnitude))
            };
            match (idx, *coeff < 0.0) {
                (0, true) => {
                    let _ = write!(rendered, "-{body}");
                }
                (0, false) => rendered.push_str(&body),
                (_, true) => {
                    let _ = write!(rendered, " - {body}");
                }
                (_, false) => {
                    let _ = write!(rendered, " + {body}");
                }
            }
        }
        if limit < terms.len() {
            let _ = write!(rendered, " + ... ({} more terms)", terms.len() - limit);
        }
        rendered
    }

    fn variable_label(&self, var_id: VariableId) -> String {
        self.get_variable_name(var_id)
            .map_or_else(|| format!("x[{}]", var_id.inner()), ToString::to_string)
    }

    fn constraint_label(&self, constraint_id: ConstraintId) -> String {
        self.get_constraint_name(constraint_id)
            .map_or_else(|| format!("_C{}", constraint_id.inner() + 1), ToString::to_string)
    }
}

fn render_row_bounds(bounds: Bounds) -> String {
    if float_approx_equal(bounds.lower, bounds.upper) {
        return format!("= {}", format_ascii_number(bounds.upper));
    }
    match (bounds.lower.is_finite(), bounds.upper.is_finite()) {
        (false, true) => format!("<= {}", format_ascii_number(bounds.upper)),
        (true, false) => format!(">= {}", format_ascii_number(bounds.lower)),
        (true, true) => format!(
            "in [{}, {}]",
            format_ascii_number(bounds.lower),
            format_ascii_number(bounds.upper)
        ),
        (false, false) => "free".to_string(),
    }
}

fn format_variable_bounds(label: &str, bounds: Bounds) -> String {
    match (bounds.lower.is_finite(), bounds.upper.is_finite()) {
        (true, true) => format!(
            "{} <= {label} <= {}",
            format_ascii_number(bounds.lower),
            format_ascii_number(bounds.upper)
        ),
        (true, false) => format!("{label} >= {}", format_ascii_number(bounds.lower)),
        (false, true) => format!("{label} <= {}", format_ascii_number(bounds.upper)),
        (false, false) => format!("{label} free"),
    }
}

/// Shared numeric formatter for listing output.
pub fn format_ascii_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let mut rendered = format!("{value:.12}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    }
}

fn float_approx_equal(lhs: f64, rhs: f64) -> bool {
    if lhs.to_bits() == rhs.to_bits() {
        return true;
    }
    if !lhs.is_finite() || !rhs.is_finite() {
        return false;
    }
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= FLOAT_EQ_EPSILON * scale
}

#[cfg(test)]
mod tests {
    use super::{PrettyPrintOptions, format_ascii_number};
    use crate::model::Model;
    use crate::types::{Bounds, Sense, Variable};
    use lpvec_expr::Expr;

    #[test]
    fn format_lp_lists_sections_in_creation_order() {
        let mut model = Model::new();
        let a = model
            .add_named_variable("a_0", Variable::continuous(Bounds::new(0.0, 1.0)))
            .expect("a");
        let b = model
            .add_named_variable("b_0", Variable::continuous(Bounds::free()))
            .expect("b");
        model
            .add_constraint_expr(Expr::var(a).le_expr(&Expr::var(b)))
            .expect("constraint");
        model
            .set_objective(Sense::Maximize, Expr::new(vec![(a, 1.0), (b, -2.0)], 0.0))
            .expect("objective");

        let rendered = model.format_lp(PrettyPrintOptions::full());
        assert!(rendered.starts_with("MAXIMIZE\n a_0 - 2 b_0"));
        assert!(rendered.contains("_C1: a_0 - b_0 <= 0"));
        assert!(rendered.contains("0 <= a_0 <= 1 Continuous"));
        assert!(rendered.contains("b_0 free Continuous"));
    }

    #[test]
    fn format_lp_preview_truncates_constraints() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous(Bounds::new(0.0, 1.0)))
            .expect("var");
        for rhs in 0..25 {
            model
                .add_constraint_expr(Expr::var(x).le_scalar(f64::from(rhs)))
                .expect("constraint");
        }

        let rendered = model.format_lp(PrettyPrintOptions::preview());
        assert!(rendered.contains("... (5 more constraints)"));
        assert!(rendered.contains("Objective: (not set)"));
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(format_ascii_number(2.5), "2.5");
        assert_eq!(format_ascii_number(-0.0), "0");
        assert_eq!(format_ascii_number(f64::NEG_INFINITY), "-inf");
    }
}
