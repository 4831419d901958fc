//! Seed providers for slot 0 of the initial population
//!
//! A provider gets a slice of the shared wall-clock budget. Failure is
//! reported, not fatal: the search then starts from a fully random
//! population.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::debug;
use maint_de::{ConstraintEvaluator, ObjectiveEvaluator};

use crate::constraints::MaintenanceConstraints;
use crate::error::SeedError;
use crate::objective::RiskObjective;
use crate::problem::Problem;
use crate::read::read_solution;

pub trait SeedProvider {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Produce one assignment within `budget`
    fn solve(&self, problem: &Problem, budget: Duration) -> Result<Vec<i64>, SeedError>;
}

/// Reads a previously written solution file
#[derive(Debug, Clone)]
pub struct FileSeed {
    path: PathBuf,
}

impl FileSeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeedProvider for FileSeed {
    fn name(&self) -> &str {
        "file"
    }

    fn solve(&self, problem: &Problem, _budget: Duration) -> Result<Vec<i64>, SeedError> {
        read_solution(&self.path, problem)
    }
}

/// Never produces a seed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

impl SeedProvider for NoSeed {
    fn name(&self) -> &str {
        "none"
    }

    fn solve(&self, _problem: &Problem, _budget: Duration) -> Result<Vec<i64>, SeedError> {
        Err(SeedError::Unavailable("seeding disabled".to_string()))
    }
}

/// Constructive start followed by one-variable-at-a-time improvement sweeps
///
/// Every intervention first takes the start with the lowest standalone mean
/// risk among those that fit in the horizon. Sweeps then try every start of
/// every intervention and keep strict improvements of the full fitness,
/// until a sweep changes nothing or the budget runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateDescentSeed {
    /// Upper bound on the number of sweeps (None = until no improvement)
    pub max_sweeps: Option<usize>,
}

/// Mean risk of intervention `i` alone, started at `start`, summed over its window
fn standalone_risk(problem: &Problem, i: usize, start: i64) -> f64 {
    let intervention = &problem.interventions[i];
    let Some(window) = intervention.window(start) else {
        return f64::INFINITY;
    };
    window
        .take_while(|&t| t <= problem.horizon)
        .map(|t| {
            let n = problem.scenarios[t - 1];
            let values = intervention.risk_at(start, t);
            values.iter().take(n).sum::<f64>() / n.max(1) as f64
        })
        .sum()
}

fn fits_horizon(problem: &Problem, i: usize, start: i64) -> bool {
    problem.interventions[i]
        .window(start)
        .is_some_and(|w| *w.end() <= problem.horizon)
}

impl CoordinateDescentSeed {
    fn initial(problem: &Problem) -> Vec<i64> {
        (0..problem.len())
            .map(|i| {
                let tmax = problem.interventions[i].tmax;
                (1..=tmax)
                    .filter(|&s| fits_horizon(problem, i, s))
                    .min_by(|&a, &b| {
                        standalone_risk(problem, i, a).total_cmp(&standalone_risk(problem, i, b))
                    })
                    .unwrap_or(1)
            })
            .collect()
    }
}

impl SeedProvider for CoordinateDescentSeed {
    fn name(&self) -> &str {
        "coordinate-descent"
    }

    fn solve(&self, problem: &Problem, budget: Duration) -> Result<Vec<i64>, SeedError> {
        if budget.is_zero() {
            return Err(SeedError::NoTimeLeft);
        }
        let deadline = Instant::now() + budget;
        let constraints = MaintenanceConstraints::new(problem);
        let objective = RiskObjective::new(problem);
        let fitness = |x: &[i64]| objective.evaluate(x, constraints.evaluate(x).penalty).fitness;

        let mut x = Self::initial(problem);
        let mut best = fitness(&x);
        let mut sweeps = 0usize;
        'sweeps: loop {
            if self.max_sweeps.is_some_and(|max| sweeps >= max) {
                break;
            }
            sweeps += 1;
            let mut improved = false;
            for i in 0..problem.len() {
                let current = x[i];
                for s in 1..=problem.interventions[i].tmax {
                    if Instant::now() >= deadline {
                        debug!("seed search: budget exhausted during sweep {}", sweeps);
                        break 'sweeps;
                    }
                    if s == x[i] {
                        continue;
                    }
                    let keep = x[i];
                    x[i] = s;
                    let f = fitness(&x);
                    if f < best {
                        best = f;
                        improved = true;
                    } else {
                        x[i] = keep;
                    }
                }
                if x[i] != current {
                    debug!(
                        "seed search: {} moved {} -> {} (fitness {:.6e})",
                        problem.interventions[i].name, current, x[i], best
                    );
                }
            }
            if !improved {
                break;
            }
        }
        debug!("seed search: {} sweeps, fitness {:.6e}", sweeps, best);
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_problem;
    use serde_json::json;

    fn problem() -> Problem {
        let doc = json!({
            "Interventions": {
                "A": {
                    "tmax": "3", "Delta": [1, 1, 2], "workload": {},
                    "risk": {
                        "1": { "1": [5.0] }, "2": { "2": [1.0] },
                        "3": { "3": [0.0] }, "4": { "3": [0.0] }
                    }
                }
            },
            "T": 3, "Scenarios_number": [1, 1, 1], "Quantile": 1.0, "Alpha": 1.0
        });
        parse_problem(&doc.to_string()).unwrap()
    }

    #[test]
    fn test_initial_skips_starts_past_the_horizon() {
        // start 3 would be cheapest but runs to step 4
        assert_eq!(CoordinateDescentSeed::initial(&problem()), vec![2]);
    }

    #[test]
    fn test_no_seed_fails() {
        assert!(NoSeed.solve(&problem(), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_zero_budget() {
        let r = CoordinateDescentSeed::default().solve(&problem(), Duration::ZERO);
        assert!(matches!(r, Err(SeedError::NoTimeLeft)));
    }
}
