//! Two families over overlapping labels, constrained termwise and solved.
//!
//! Run with `LPVEC_TRACE=debug` to see solver logs.

use lpvec::{FrameError, LpProblem, Sense, VariableFamily, VariableSpec, init_logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None)?;

    let mut problem = LpProblem::new("BasicExample", Sense::Maximize);
    let spec = VariableSpec::continuous().with_bounds(0.0, 1.0);

    let a = VariableFamily::from_labels("a", 0..5, &mut problem, spec)?;
    let mut b = VariableFamily::from_labels("b", 0..6, &mut problem, spec)?;
    b.shift_labels(3)?;

    // Only labels 3 and 4 exist in both families.
    println!("{a}\n\n{b}\n");
    let overlap = a.le(&b)?;
    println!("{overlap}\n");
    problem += overlap;

    let c = a.rsub(1.0)?;
    println!("c = 1 - a\n{c}\n");

    problem += a.sum();
    println!("{problem}");

    let status = problem.solve()?;
    println!("status: {status} ({})", status.code());

    match a.get_value(&problem) {
        Ok(values) => {
            for (label, value) in &values {
                println!("a[{label}] = {value}");
            }
        }
        Err(FrameError::NotSolved) => println!("no solution values"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
