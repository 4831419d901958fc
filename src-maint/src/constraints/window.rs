use crate::problem::Problem;

/// Start-time window violation.
///
/// A start below 1 or above `tmax` adds 1.0 and nothing else is checked for
/// that intervention. Otherwise every step the window runs past the horizon
/// adds 1.0.
pub fn viol_window(problem: &Problem, x: &[i64]) -> f64 {
    let mut total = 0.0;
    for (intervention, &start) in problem.interventions.iter().zip(x) {
        if start < 1 || start > intervention.tmax {
            total += 1.0;
            continue;
        }
        if let Some(window) = intervention.window(start) {
            let last = *window.end();
            if last > problem.horizon {
                total += (last - problem.horizon) as f64;
            }
        }
    }
    total
}
