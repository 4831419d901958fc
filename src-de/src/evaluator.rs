//! Collaborator seams injected into the engine.
//!
//! The engine never looks inside a candidate: it asks a [`ConstraintEvaluator`]
//! for a penalty, hands that penalty to an [`ObjectiveEvaluator`] and keeps the
//! resulting fitness. A [`PopulationInitializer`] fills the population at start
//! and after every stagnation restart.

use ndarray::Array2;
use rand::rngs::StdRng;

use crate::bounds::Bounds;

/// Outcome of a constraint evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintStatus {
    /// True iff every constraint family is satisfied
    pub satisfied: bool,
    /// Aggregated non-negative penalty (0.0 iff `satisfied`)
    pub penalty: f64,
}

impl ConstraintStatus {
    /// Build a status from a penalty, deriving the satisfied flag from it
    pub fn from_penalty(penalty: f64) -> Self {
        Self { satisfied: penalty == 0.0, penalty }
    }
}

/// Outcome of an objective evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objective {
    /// Weighted objective plus the penalty it was given
    pub fitness: f64,
    /// Horizon-averaged mean risk
    pub mean_risk: f64,
    /// Horizon-averaged tail excess over the mean
    pub expected_excess: f64,
}

/// Computes the penalty of a candidate assignment.
///
/// Implementations must be pure: the engine calls them concurrently from
/// several workers on different candidates.
pub trait ConstraintEvaluator: Sync {
    fn evaluate(&self, x: &[i64]) -> ConstraintStatus;
}

/// Computes fitness of a candidate given its precomputed penalty.
pub trait ObjectiveEvaluator: Sync {
    fn evaluate(&self, x: &[i64], penalty: f64) -> Objective;
}

/// Produces a fresh population within bounds, one individual per row.
pub trait PopulationInitializer: Sync {
    fn generate(&self, npop: usize, bounds: &Bounds, rng: &mut StdRng) -> Array2<i64>;
}

/// Evaluate penalty then fitness, the order every caller in the engine uses
pub(crate) fn evaluate_candidate<O, C>(objective: &O, constraint: &C, x: &[i64]) -> Objective
where
    O: ObjectiveEvaluator + ?Sized,
    C: ConstraintEvaluator + ?Sized,
{
    let status = constraint.evaluate(x);
    objective.evaluate(x, status.penalty)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Span;
    impl ConstraintEvaluator for Span {
        fn evaluate(&self, x: &[i64]) -> ConstraintStatus {
            let over: i64 = x.iter().map(|&v| (v - 3).max(0)).sum();
            ConstraintStatus::from_penalty(over as f64)
        }
    }

    struct Sum;
    impl ObjectiveEvaluator for Sum {
        fn evaluate(&self, x: &[i64], penalty: f64) -> Objective {
            let s: i64 = x.iter().sum();
            Objective { fitness: s as f64 + penalty, mean_risk: s as f64, expected_excess: 0.0 }
        }
    }

    #[test]
    fn test_from_penalty_flags() {
        assert!(ConstraintStatus::from_penalty(0.0).satisfied);
        assert!(!ConstraintStatus::from_penalty(1e-9).satisfied);
    }

    #[test]
    fn test_candidate_penalty_flows_into_fitness() {
        let o = evaluate_candidate(&Sum, &Span, &[1, 5]);
        assert_eq!(o.mean_risk, 6.0);
        assert_eq!(o.fitness, 8.0);
    }
}
