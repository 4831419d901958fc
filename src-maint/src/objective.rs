//! Risk objective: weighted mean risk plus expected tail excess

use maint_de::{Objective, ObjectiveEvaluator};

use crate::problem::Problem;

/// Index of the quantile value in an ascending vector of `len` values
pub fn quantile_index(quantile: f64, len: usize) -> usize {
    // Rank is taken in f64. Single precision rounds a few pairs up one rank
    // (q=0.6 over 25 values gives 16 there, 15 here).
    let rank = (quantile * len as f64).ceil() as usize;
    rank.clamp(1, len.max(1)) - 1
}

/// Mean risk and tail excess at one step `t`, given a scratch buffer
fn step_risk(
    problem: &Problem,
    x: &[i64],
    t: usize,
    per_scenario: &mut Vec<f64>,
) -> (f64, f64) {
    let n = problem.scenarios[t - 1];
    per_scenario.clear();
    per_scenario.resize(n, 0.0);

    let mut total = 0.0;
    let mut active = false;
    for (intervention, &start) in problem.interventions.iter().zip(x) {
        match intervention.window(start) {
            Some(window) if window.contains(&t) => {}
            _ => continue,
        }
        active = true;
        let values = intervention.risk_at(start, t);
        for (k, slot) in per_scenario.iter_mut().enumerate() {
            let v = values.get(k).copied().unwrap_or(0.0);
            *slot += v;
            total += v;
        }
    }

    let mean = total / n.max(1) as f64;
    if !active || per_scenario.is_empty() {
        return (mean, 0.0);
    }
    per_scenario.sort_unstable_by(f64::total_cmp);
    let q = per_scenario[quantile_index(problem.quantile, per_scenario.len())];
    (mean, (q - mean).max(0.0))
}

/// Horizon-averaged `(mean_risk, expected_excess)` of an assignment
pub fn risk_profile(problem: &Problem, x: &[i64]) -> (f64, f64) {
    let mut buffer = Vec::new();
    let (mut mean_sum, mut excess_sum) = (0.0, 0.0);
    for t in 1..=problem.horizon {
        let (mean, excess) = step_risk(problem, x, t, &mut buffer);
        mean_sum += mean;
        excess_sum += excess;
    }
    let horizon = problem.horizon as f64;
    (mean_sum / horizon, excess_sum / horizon)
}

/// Fitness evaluator for one problem instance
#[derive(Debug, Clone, Copy)]
pub struct RiskObjective<'a> {
    problem: &'a Problem,
}

impl<'a> RiskObjective<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }
}

impl ObjectiveEvaluator for RiskObjective<'_> {
    fn evaluate(&self, x: &[i64], penalty: f64) -> Objective {
        let (mean_risk, expected_excess) = risk_profile(self.problem, x);
        let alpha = self.problem.alpha;
        Objective {
            fitness: alpha * mean_risk + (1.0 - alpha) * expected_excess + penalty,
            mean_risk,
            expected_excess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_problem;
    use serde_json::json;

    #[test]
    fn test_quantile_index() {
        assert_eq!(quantile_index(1.0, 4), 3);
        assert_eq!(quantile_index(0.5, 4), 1);
        assert_eq!(quantile_index(0.75, 8), 5);
        assert_eq!(quantile_index(0.7, 8), 5);
        assert_eq!(quantile_index(0.6, 25), 14);
        assert_eq!(quantile_index(0.01, 3), 0);
        assert_eq!(quantile_index(0.5, 0), 0);
    }

    #[test]
    fn test_zero_scenarios_and_idle_steps() {
        let doc = json!({
            "Interventions": {
                "A": { "tmax": 1, "Delta": [1], "workload": {}, "risk": { "1": { "1": [] } } }
            },
            "T": 2, "Scenarios_number": [0, 3], "Quantile": 0.9, "Alpha": 0.2
        });
        let p = parse_problem(&doc.to_string()).unwrap();
        let o = RiskObjective::new(&p).evaluate(&[1], 0.0);
        assert_eq!(o.mean_risk, 0.0);
        assert_eq!(o.expected_excess, 0.0);
        assert_eq!(o.fitness, 0.0);
    }

    #[test]
    fn test_missing_scenario_values_count_as_zero() {
        let doc = json!({
            "Interventions": {
                "A": { "tmax": 1, "Delta": [1], "workload": {}, "risk": { "1": { "1": [4.0] } } }
            },
            "T": 1, "Scenarios_number": [2], "Quantile": 1.0, "Alpha": 0.5
        });
        let p = parse_problem(&doc.to_string()).unwrap();
        let o = RiskObjective::new(&p).evaluate(&[1], 1.5);
        // scenarios [4, 0]: mean 2, worst 4
        assert_eq!(o.mean_risk, 2.0);
        assert_eq!(o.expected_excess, 2.0);
        assert_eq!(o.fitness, 0.5 * 2.0 + 0.5 * 2.0 + 1.5);
    }
}
