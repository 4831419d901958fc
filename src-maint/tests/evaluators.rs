mod common;

use maint::de::{ConstraintEvaluator, ObjectiveEvaluator};
use maint::{MaintenanceConstraints, RiskObjective};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_satisfied_iff_zero_penalty() {
    let mut rng = StdRng::seed_from_u64(12);
    for problem in [common::unit_duration_problem(), common::two_step_problem()] {
        let constraints = MaintenanceConstraints::new(&problem);
        for _ in 0..200 {
            let x: Vec<i64> = (0..problem.len()).map(|_| rng.random_range(-1..=6)).collect();
            let status = constraints.evaluate(&x);
            assert!(status.penalty >= 0.0);
            assert_eq!(status.satisfied, status.penalty == 0.0, "x = {x:?}");
        }
    }
}

#[test]
fn test_start_above_tmax_is_infeasible() {
    let problem = common::unit_duration_problem();
    let constraints = MaintenanceConstraints::new(&problem);
    let status = constraints.evaluate(&[5, 1]);
    assert!(!status.satisfied);
    assert!(status.penalty > 0.0);
    assert_eq!(constraints.report(&[5, 1]).window, 1.0);
}

#[test]
fn test_objective_is_pure() {
    let problem = common::two_step_problem();
    let objective = RiskObjective::new(&problem);
    for x in [[1i64, 3], [2, 2], [3, 1], [0, 7]] {
        let a = objective.evaluate(&x, 17.0);
        let b = objective.evaluate(&x, 17.0);
        assert_eq!(a.fitness.to_bits(), b.fitness.to_bits());
        assert_eq!(a.mean_risk.to_bits(), b.mean_risk.to_bits());
        assert_eq!(a.expected_excess.to_bits(), b.expected_excess.to_bits());
    }
}

#[test]
fn test_alpha_moves_fitness_between_mean_and_excess() {
    let mut previous = f64::NEG_INFINITY;
    for (alpha, expected) in [(0.0, 0.5), (0.5, 1.25), (1.0, 2.0)] {
        let problem = common::alpha_problem(alpha);
        let o = RiskObjective::new(&problem).evaluate(&[1], 0.0);
        assert_eq!(o.mean_risk, 2.0);
        assert_eq!(o.expected_excess, 0.5);
        assert_eq!(o.fitness, expected);
        // mean exceeds excess here, so fitness grows with alpha
        assert!(o.fitness > previous);
        previous = o.fitness;
    }
}

#[test]
fn test_penalty_scales_per_family() {
    let problem = common::unit_duration_problem();
    let constraints = MaintenanceConstraints::new(&problem);
    // same step: one exclusion step and one unit over capacity
    let report = constraints.report(&[2, 2]);
    assert_eq!(report.exclusion, 1.0);
    assert_eq!(report.resource, 1.0);
    assert_eq!(constraints.evaluate(&[2, 2]).penalty, 2e6);

    let objective = RiskObjective::new(&problem).evaluate(&[1, 2], 0.0);
    assert_eq!(objective.fitness, 0.25);
}
