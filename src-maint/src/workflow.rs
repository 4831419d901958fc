//! Shared workflow: seed phase, then DE, inside one wall-clock budget

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{info, warn};
use maint_de::{
    ConstraintEvaluator, DEConfig, DEConfigBuilder, DifferentialEvolution, ObjectiveEvaluator,
    OptimizationRecorder, ParallelConfig,
};

use crate::constraints::MaintenanceConstraints;
use crate::error::MaintError;
use crate::objective::RiskObjective;
use crate::problem::Problem;
use crate::seed::SeedProvider;

/// Budget and search parameters for one planning run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Total wall-clock budget for seed and DE together
    pub time_limit: Duration,
    /// Fraction of the total budget handed to the seed provider
    pub seed_share: f64,
    pub popsize: usize,
    pub mutation: f64,
    pub mutation_prob: f64,
    pub recombination: f64,
    pub stagnation_limit: usize,
    pub max_generations: Option<usize>,
    pub rng_seed: Option<u64>,
    pub threads: Option<usize>,
    /// Write per-generation records to this CSV file
    pub record: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let de = DEConfig::default();
        Self {
            time_limit: Duration::from_secs(900),
            seed_share: 0.1,
            popsize: de.popsize,
            mutation: de.mutation,
            mutation_prob: de.mutation_prob,
            recombination: de.recombination,
            stagnation_limit: de.stagnation_limit,
            max_generations: None,
            rng_seed: None,
            threads: None,
            record: None,
        }
    }
}

impl Settings {
    /// Engine configuration, with `x0` as the slot-0 seed
    pub fn de_config(&self, x0: Option<Vec<i64>>) -> DEConfig {
        let mut builder = DEConfigBuilder::new()
            .popsize(self.popsize)
            .mutation(self.mutation)
            .mutation_prob(self.mutation_prob)
            .recombination(self.recombination)
            .stagnation_limit(self.stagnation_limit)
            .time_limit(self.time_limit)
            .parallel(ParallelConfig { enabled: true, num_threads: self.threads });
        if let Some(max) = self.max_generations {
            builder = builder.max_generations(max);
        }
        if let Some(seed) = self.rng_seed {
            builder = builder.seed(seed);
        }
        if let Some(x0) = x0 {
            builder = builder.x0(x0);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Seed,
    DifferentialEvolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub name: String,
    pub start: i64,
}

/// Final planning result
#[derive(Debug, Clone)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub assignment: Vec<i64>,
    pub fitness: f64,
    pub mean_risk: f64,
    pub expected_excess: f64,
    pub penalty: f64,
    pub satisfied: bool,
    pub source: ScheduleSource,
    pub generations: usize,
    pub restarts: usize,
}

impl Schedule {
    /// Score `x` against `problem` and wrap it
    pub fn evaluate(problem: &Problem, x: Vec<i64>, source: ScheduleSource) -> Self {
        let status = MaintenanceConstraints::new(problem).evaluate(&x);
        let objective = RiskObjective::new(problem).evaluate(&x, status.penalty);
        Self {
            entries: entries(problem, &x),
            fitness: objective.fitness,
            mean_risk: objective.mean_risk,
            expected_excess: objective.expected_excess,
            penalty: status.penalty,
            satisfied: status.satisfied,
            assignment: x,
            source,
            generations: 0,
            restarts: 0,
        }
    }
}

fn entries(problem: &Problem, x: &[i64]) -> Vec<ScheduleEntry> {
    problem
        .interventions
        .iter()
        .zip(x)
        .map(|(i, &start)| ScheduleEntry { name: i.name.clone(), start })
        .collect()
}

/// Seed budget: `seed_share` of the total, never more than what is left
pub fn seed_budget(settings: &Settings, elapsed: Duration) -> Duration {
    settings
        .time_limit
        .mul_f64(settings.seed_share.clamp(0.0, 1.0))
        .min(settings.time_limit.saturating_sub(elapsed))
}

/// Run the seed provider, then DE for whatever remains of the budget
///
/// `started` marks the beginning of the shared budget, typically taken before
/// the problem was loaded.
pub fn optimize(
    problem: &Problem,
    seed_provider: &dyn SeedProvider,
    settings: &Settings,
    started: Instant,
) -> Result<Schedule, MaintError> {
    let budget = seed_budget(settings, started.elapsed());
    info!("seed phase: provider {} with {:.1}s", seed_provider.name(), budget.as_secs_f64());

    let seed = match seed_provider.solve(problem, budget) {
        Ok(x) if x.len() == problem.len() => {
            let scored = Schedule::evaluate(problem, x, ScheduleSource::Seed);
            info!(
                "seed phase: fitness={:.6e} mean_risk={:.6e} expected_excess={:.6e} satisfied={}",
                scored.fitness, scored.mean_risk, scored.expected_excess, scored.satisfied
            );
            Some(scored)
        }
        Ok(x) => {
            warn!(
                "seed provider {} returned {} starts for {} interventions; using random init",
                seed_provider.name(),
                x.len(),
                problem.len()
            );
            None
        }
        Err(e) => {
            warn!(
                "seed provider {} failed: {}; starting from a random population",
                seed_provider.name(),
                e
            );
            None
        }
    };

    let elapsed = started.elapsed();
    if elapsed >= settings.time_limit {
        if let Some(seed) = seed {
            info!("no time left after the seed phase, keeping the seed");
            return Ok(seed);
        }
    }

    let constraints = MaintenanceConstraints::new(problem);
    let objective = RiskObjective::new(problem);
    let mut config = settings.de_config(seed.map(|s| s.assignment));
    let recorder = settings.record.as_ref().map(|_| OptimizationRecorder::new());
    if let Some(rec) = &recorder {
        config.callback = Some(rec.create_callback());
    }

    let mut de = DifferentialEvolution::new(&objective, &constraints, problem.bounds()?);
    *de.config_mut() = config;
    let report = de.solve(elapsed)?;

    if let (Some(rec), Some(path)) = (&recorder, &settings.record) {
        rec.save_to_csv(path)
            .map_err(|e| MaintError::Record { path: path.clone(), message: e.to_string() })?;
        info!("saved {} generation records to {}", rec.num_generations(), path.display());
    }

    Ok(Schedule {
        entries: entries(problem, &report.x),
        assignment: report.x,
        fitness: report.fun,
        mean_risk: report.mean_risk,
        expected_excess: report.expected_excess,
        penalty: report.penalty,
        satisfied: report.satisfied,
        source: ScheduleSource::DifferentialEvolution,
        generations: report.nit,
        restarts: report.restarts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_budget() {
        let settings = Settings {
            time_limit: Duration::from_secs(100),
            seed_share: 0.25,
            ..Settings::default()
        };
        assert_eq!(seed_budget(&settings, Duration::ZERO), Duration::from_secs(25));
        assert_eq!(seed_budget(&settings, Duration::from_secs(90)), Duration::from_secs(10));
        assert_eq!(seed_budget(&settings, Duration::from_secs(120)), Duration::ZERO);
    }

    #[test]
    fn test_de_config_carries_settings() {
        let settings = Settings {
            popsize: 12,
            max_generations: Some(7),
            rng_seed: Some(3),
            threads: Some(2),
            ..Settings::default()
        };
        let c = settings.de_config(Some(vec![1, 2]));
        assert_eq!(c.popsize, 12);
        assert_eq!(c.max_generations, Some(7));
        assert_eq!(c.seed, Some(3));
        assert_eq!(c.parallel.num_threads, Some(2));
        assert_eq!(c.x0, Some(vec![1, 2]));
        assert_eq!(c.stagnation_limit, 100);
        assert_eq!(c.time_limit, Duration::from_secs(900));
    }
}
