use crate::problem::Problem;

/// Season steps during which both windows of an exclusion pair are active
pub fn viol_exclusions(problem: &Problem, x: &[i64]) -> f64 {
    let mut total = 0.0;
    for exclusion in &problem.exclusions {
        let first = &problem.interventions[exclusion.first];
        let second = &problem.interventions[exclusion.second];
        let wa = first.window(x[exclusion.first]);
        let wb = second.window(x[exclusion.second]);
        let (Some(wa), Some(wb)) = (wa, wb) else {
            continue;
        };
        let lo = (*wa.start()).max(*wb.start());
        let hi = (*wa.end()).min(*wb.end());
        if lo > hi {
            continue;
        }
        total += exclusion.steps.iter().filter(|&&t| lo <= t && t <= hi).count() as f64;
    }
    total
}
