use ndarray::Array2;

use crate::problem::Problem;

/// Slack under which usage still counts as within its bounds
pub const RESOURCE_TOLERANCE: f64 = 1e-6;

/// Usage of every resource at every step, `usage[[r, t - 1]]`
pub fn resource_usage(problem: &Problem, x: &[i64]) -> Array2<f64> {
    let mut usage = Array2::<f64>::zeros((problem.resources.len(), problem.horizon));
    for (intervention, &start) in problem.interventions.iter().zip(x) {
        let Some(window) = intervention.window(start) else {
            continue;
        };
        let s = start as usize;
        for workload in &intervention.workloads {
            let profile = &workload.by_start[s - 1];
            for t in window.clone().take_while(|&t| t <= problem.horizon) {
                usage[[workload.resource, t - 1]] += profile[t - s];
            }
        }
    }
    usage
}

/// Sum of deficits below `min` and excesses above `max` over all resources and steps
pub fn viol_resources(problem: &Problem, x: &[i64]) -> f64 {
    let usage = resource_usage(problem, x);
    let mut total = 0.0;
    for (r, resource) in problem.resources.iter().enumerate() {
        for t in 0..problem.horizon {
            let used = usage[[r, t]];
            if used < resource.min[t] - RESOURCE_TOLERANCE {
                total += resource.min[t] - used;
            } else if used > resource.max[t] + RESOURCE_TOLERANCE {
                total += used - resource.max[t];
            }
        }
    }
    total
}
