use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::evaluator::{ConstraintEvaluator, ObjectiveEvaluator, evaluate_candidate};

/// Parallel evaluation configuration
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable parallel evaluation
    pub enabled: bool,
    /// Number of worker threads (None = use rayon's global pool)
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None, // Use rayon's default (typically num_cpus)
        }
    }
}

/// Build a dedicated pool when a thread count is requested
pub(crate) fn build_pool(config: &ParallelConfig) -> Result<Option<rayon::ThreadPool>> {
    match (config.enabled, config.num_threads) {
        (true, Some(n)) => Ok(Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?)),
        _ => Ok(None),
    }
}

/// One random generator per population slot, seeded once for the whole run.
///
/// With a fixed seed, slot `i` uses `seed + i`; without one, a nanosecond
/// clock reading takes the place of the seed.
pub(crate) fn seed_lanes(npop: usize, seed: Option<u64>) -> Vec<StdRng> {
    let base = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    });
    (0..npop)
        .map(|i| StdRng::seed_from_u64(base.wrapping_add(i as u64)))
        .collect()
}

/// Run `f(i, lane_rng)` for every slot, in parallel when enabled.
///
/// Results come back in slot order whatever the interleaving.
pub(crate) fn map_lanes<T, F>(lanes: &mut [StdRng], config: &ParallelConfig, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &mut StdRng) -> T + Send + Sync,
{
    if !config.enabled || lanes.len() < 4 {
        return lanes.iter_mut().enumerate().map(|(i, rng)| f(i, rng)).collect();
    }
    lanes.par_iter_mut().enumerate().map(|(i, rng)| f(i, rng)).collect()
}

/// Evaluate a population (penalty then fitness for each row)
///
/// # Arguments
/// * `population` - 2D array where each row is an individual
/// * `objective` - fitness evaluator
/// * `constraint` - penalty evaluator
/// * `config` - Parallel configuration
///
/// # Returns
/// Array of fitness values for each individual
pub fn evaluate_population_parallel<O, C>(
    population: &Array2<i64>,
    objective: &O,
    constraint: &C,
    config: &ParallelConfig,
) -> Array1<f64>
where
    O: ObjectiveEvaluator + ?Sized,
    C: ConstraintEvaluator + ?Sized,
{
    let npop = population.nrows();
    let eval_row = |i: usize| -> f64 {
        let individual = population.row(i).to_vec();
        evaluate_candidate(objective, constraint, &individual).fitness
    };

    if !config.enabled || npop < 4 {
        return Array1::from_iter((0..npop).map(eval_row));
    }
    Array1::from_vec((0..npop).into_par_iter().map(eval_row).collect())
}
