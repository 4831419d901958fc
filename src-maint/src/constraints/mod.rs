//! Constraint families and their penalty aggregation
//!
//! Each family reports a raw, unscaled violation. A violated family weighs
//! [`CONSTRAINT_SCALE`] times its raw value in the total penalty, so any
//! infeasible schedule scores worse than any feasible one on realistic risk
//! magnitudes.

mod exclusion;
mod resource;
mod window;

pub use exclusion::viol_exclusions;
pub use resource::{RESOURCE_TOLERANCE, resource_usage, viol_resources};
pub use window::viol_window;

use maint_de::{ConstraintEvaluator, ConstraintStatus};

use crate::problem::Problem;

/// Weight of a violated family in the total penalty
pub const CONSTRAINT_SCALE: f64 = 1e6;

/// Raw violation per constraint family
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstraintReport {
    pub window: f64,
    pub resource: f64,
    pub exclusion: f64,
}

impl ConstraintReport {
    pub fn evaluate(problem: &Problem, x: &[i64]) -> Self {
        Self {
            window: viol_window(problem, x),
            resource: viol_resources(problem, x),
            exclusion: viol_exclusions(problem, x),
        }
    }

    /// Scaled sum of the violated families
    pub fn penalty(&self) -> f64 {
        [self.window, self.resource, self.exclusion]
            .iter()
            .filter(|&&v| v > 0.0)
            .map(|v| v * CONSTRAINT_SCALE)
            .sum()
    }

    pub fn satisfied(&self) -> bool {
        self.penalty() == 0.0
    }
}

/// Penalty evaluator for one problem instance
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceConstraints<'a> {
    problem: &'a Problem,
}

impl<'a> MaintenanceConstraints<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }

    pub fn report(&self, x: &[i64]) -> ConstraintReport {
        ConstraintReport::evaluate(self.problem, x)
    }
}

impl ConstraintEvaluator for MaintenanceConstraints<'_> {
    fn evaluate(&self, x: &[i64]) -> ConstraintStatus {
        ConstraintStatus::from_penalty(self.report(x).penalty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_problem;
    use serde_json::json;

    /// Two unit-length interventions over T = 3, one resource, one exclusion in steps 2..3
    fn problem() -> Problem {
        let doc = json!({
            "Resources": { "c1": { "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0] } },
            "Seasons": { "full": ["2", "3"] },
            "Interventions": {
                "A": {
                    "tmax": "3", "Delta": [1, 1, 2],
                    "workload": {
                        "c1": { "1": { "1": 1.0 }, "2": { "2": 1.0 }, "3": { "3": 1.0 } }
                    },
                    "risk": {}
                },
                "B": {
                    "tmax": "2", "Delta": [1, 2],
                    "workload": {
                        "c1": { "1": { "1": 1.0 }, "2": { "2": 1.0 }, "3": { "2": 1.0 } }
                    },
                    "risk": {}
                }
            },
            "Exclusions": { "E1": ["A", "B", "full"] },
            "T": 3, "Scenarios_number": [1, 1, 1], "Quantile": 0.5, "Alpha": 0.5
        });
        parse_problem(&doc.to_string()).unwrap()
    }

    #[test]
    fn test_feasible_assignment() {
        let p = problem();
        let c = MaintenanceConstraints::new(&p);
        assert_eq!(c.report(&[1, 2]), ConstraintReport::default());
        assert_eq!(c.evaluate(&[1, 2]), ConstraintStatus { satisfied: true, penalty: 0.0 });
    }

    #[test]
    fn test_start_out_of_range() {
        let p = problem();
        let r = MaintenanceConstraints::new(&p).report(&[0, 3]);
        assert_eq!(r.window, 2.0);
        // neither start has a usable window, so nothing else fires
        assert_eq!(r.resource, 0.0);
        assert_eq!(r.exclusion, 0.0);
        assert_eq!(r.penalty(), 2.0 * CONSTRAINT_SCALE);
    }

    #[test]
    fn test_resource_excess_and_exclusion_overlap() {
        let p = problem();
        // A at 2 covers step 2, B at 2 covers steps 2..3
        let r = MaintenanceConstraints::new(&p).report(&[2, 2]);
        assert_eq!(r.window, 0.0);
        assert_eq!(r.resource, 1.0);
        assert_eq!(r.exclusion, 1.0);
        assert_eq!(r.penalty(), 2.0 * CONSTRAINT_SCALE);
        assert!(!r.satisfied());
    }

    #[test]
    fn test_horizon_overrun() {
        let p = problem();
        // A started at 3 lasts 2 steps, one past T
        let r = MaintenanceConstraints::new(&p).report(&[3, 1]);
        assert_eq!(r.window, 1.0);
        let usage = resource_usage(&p, &[3, 1]);
        assert_eq!(usage[[0, 0]], 1.0);
        assert_eq!(usage[[0, 2]], 1.0);
    }

    #[test]
    fn test_resource_deficit() {
        let mut p = problem();
        p.resources[0].min = vec![1.0, 1.0, 1.0];
        // both at step 1: one unit over max there, steps 2 and 3 idle
        let r = MaintenanceConstraints::new(&p).report(&[1, 1]);
        assert_eq!(r.resource, 3.0);
        // the overlap at step 1 lies outside the season
        assert_eq!(r.exclusion, 0.0);
    }
}
