//! Integer Differential Evolution (DE) for penalty-augmented scheduling problems
//!
//! A time-boxed, parallel `best/1/exp` DE over integer decision vectors.
//! The engine knows nothing about the problem: fitness and penalties come
//! from injected [`ObjectiveEvaluator`] and [`ConstraintEvaluator`]
//! implementations, fresh populations from a [`PopulationInitializer`].
//!
//! Supported features:
//! - Inclusive integer box bounds, enforced by clamping
//! - best/1 mutation with a per-gene mutation probability
//! - Exponential crossover
//! - Optional seed individual `x0` placed in slot 0 after init
//! - Elitist one-to-one replacement, committed once per generation
//! - Stagnation counter with full population restart keeping the best
//! - Wall-clock budget shared with an earlier phase, optional generation cap
//! - Parallel trial generation with one random generator per slot

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub mod bounds;
pub mod crossover_exponential;
pub mod differential_evolution;
pub mod distinct_indices;
pub mod error;
pub mod evaluator;
pub mod init_random;
pub mod mutant_best1;
pub mod parallel_eval;
pub mod population;
pub mod recorder;


pub use bounds::Bounds;
pub use differential_evolution::differential_evolution;
pub use error::{DEError, Result};
pub use evaluator::{
	ConstraintEvaluator, ConstraintStatus, Objective, ObjectiveEvaluator, PopulationInitializer,
};
pub use init_random::UniformInitializer;
pub use parallel_eval::ParallelConfig;
pub use population::Population;
pub use recorder::{OptimizationRecord, OptimizationRecorder};

/// Per-generation callback type
pub type Callback = Box<dyn FnMut(&DEIntermediate) -> CallbackAction + Send>;

/// Configuration for the Differential Evolution optimizer
pub struct DEConfig {
	/// Number of individuals (absolute, not a multiple of the dimension)
	pub popsize: usize,
	/// Mutation factor F in [0, 2]
	pub mutation: f64,
	/// Probability that a gene is mutated at all, in [0, 1]
	pub mutation_prob: f64,
	/// Exponential crossover continuation rate CR in [0, 1]
	pub recombination: f64,
	/// Restart once this many generations in a row fail to improve
	pub stagnation_limit: usize,
	/// Total wall-clock budget, shared with whatever ran before DE
	pub time_limit: Duration,
	/// Optional cap on the number of generations
	pub max_generations: Option<usize>,
	pub seed: Option<u64>,
	/// Optional seed individual, placed in slot 0 after init
	pub x0: Option<Vec<i64>>,
	/// Optional per-generation callback (may stop early)
	pub callback: Option<Callback>,
	/// Parallel evaluation configuration
	pub parallel: ParallelConfig,
}

impl Default for DEConfig {
	fn default() -> Self {
		Self {
			popsize: 50,
			mutation: 0.6235,
			mutation_prob: 1.0,
			recombination: 0.5763,
			stagnation_limit: 100,
			time_limit: Duration::from_secs(60),
			max_generations: None,
			seed: None,
			x0: None,
			callback: None,
			parallel: ParallelConfig::default(),
		}
	}
}

impl DEConfig {
	/// Check parameters the engine cannot run with
	pub fn validate(&self, dim: usize) -> Result<()> {
		if self.popsize < 3 {
			return Err(DEError::PopulationTooSmall { pop_size: self.popsize });
		}
		if !(0.0..=2.0).contains(&self.mutation) {
			return Err(DEError::InvalidMutationFactor { factor: self.mutation });
		}
		if !(0.0..=1.0).contains(&self.mutation_prob) {
			return Err(DEError::InvalidMutationProbability { prob: self.mutation_prob });
		}
		if !(0.0..=1.0).contains(&self.recombination) {
			return Err(DEError::InvalidCrossoverRate { rate: self.recombination });
		}
		if let Some(x0) = &self.x0 {
			if x0.len() != dim {
				return Err(DEError::SeedDimensionMismatch { expected: dim, got: x0.len() });
			}
		}
		Ok(())
	}
}

/// Fluent builder for `DEConfig` for ergonomic configuration.
pub struct DEConfigBuilder {
	cfg: DEConfig,
}
impl Default for DEConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
impl DEConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: DEConfig::default() }
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.popsize = v;
		self
	}
	pub fn mutation(mut self, v: f64) -> Self {
		self.cfg.mutation = v;
		self
	}
	pub fn mutation_prob(mut self, v: f64) -> Self {
		self.cfg.mutation_prob = v;
		self
	}
	pub fn recombination(mut self, v: f64) -> Self {
		self.cfg.recombination = v;
		self
	}
	pub fn stagnation_limit(mut self, v: usize) -> Self {
		self.cfg.stagnation_limit = v;
		self
	}
	pub fn time_limit(mut self, v: Duration) -> Self {
		self.cfg.time_limit = v;
		self
	}
	pub fn max_generations(mut self, v: usize) -> Self {
		self.cfg.max_generations = Some(v);
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn x0(mut self, v: Vec<i64>) -> Self {
		self.cfg.x0 = Some(v);
		self
	}
	pub fn callback(mut self, cb: Callback) -> Self {
		self.cfg.callback = Some(cb);
		self
	}
	pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
		self.cfg.parallel = parallel;
		self
	}
	pub fn enable_parallel(mut self, enable: bool) -> Self {
		self.cfg.parallel.enabled = enable;
		self
	}
	pub fn parallel_threads(mut self, num_threads: usize) -> Self {
		self.cfg.parallel.num_threads = Some(num_threads);
		self
	}
	pub fn build(self) -> DEConfig {
		self.cfg
	}
}

/// Result/Report of a DE optimization run
#[derive(Clone)]
pub struct DEReport {
	/// Best assignment found
	pub x: Vec<i64>,
	/// Its fitness (objective plus penalty)
	pub fun: f64,
	pub mean_risk: f64,
	pub expected_excess: f64,
	pub penalty: f64,
	pub satisfied: bool,
	pub message: String,
	/// Generations run
	pub nit: usize,
	pub nfev: usize,
	pub restarts: usize,
	pub population: Array2<i64>,
	pub population_energies: Array1<f64>,
}

impl fmt::Debug for DEReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DEReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("mean_risk", &self.mean_risk)
			.field("expected_excess", &self.expected_excess)
			.field("penalty", &self.penalty)
			.field("satisfied", &self.satisfied)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field("restarts", &self.restarts)
			.field(
				"population",
				&format!("{}x{}", self.population.nrows(), self.population.ncols()),
			)
			.field("population_energies", &format!("len={}", self.population_energies.len()))
			.finish()
	}
}

/// Information passed to callback after each generation
pub struct DEIntermediate {
	pub x: Vec<i64>,
	pub fun: f64,
	pub convergence: f64, // measured as std(pop_f)
	pub iter: usize,
	pub stagnation: usize,
	pub restarts: usize,
	/// Population after this generation's selection
	pub population: Array2<i64>,
	pub population_energies: Array1<f64>,
}

/// Action returned by callback
pub enum CallbackAction {
	Continue,
	Stop,
}

fn run_in<T, OP>(pool: Option<&rayon::ThreadPool>, op: OP) -> T
where
	T: Send,
	OP: FnOnce() -> T + Send,
{
	match pool {
		Some(p) => p.install(op),
		None => op(),
	}
}

/// Differential Evolution optimizer
pub struct DifferentialEvolution<'a, O, C, I = UniformInitializer>
where
	O: ObjectiveEvaluator + ?Sized,
	C: ConstraintEvaluator + ?Sized,
	I: PopulationInitializer,
{
	objective: &'a O,
	constraint: &'a C,
	initializer: I,
	bounds: Bounds,
	config: DEConfig,
}

impl<'a, O, C> DifferentialEvolution<'a, O, C, UniformInitializer>
where
	O: ObjectiveEvaluator + ?Sized,
	C: ConstraintEvaluator + ?Sized,
{
	/// Create a new DE optimizer with uniform random initialization
	///
	/// The configuration is checked by [`DEConfig::validate`] when
	/// [`solve`](Self::solve) starts, so a population smaller than 3 set
	/// through [`config_mut`](Self::config_mut) fails there.
	pub fn new(objective: &'a O, constraint: &'a C, bounds: Bounds) -> Self {
		Self::with_initializer(objective, constraint, UniformInitializer, bounds)
	}
}

impl<'a, O, C, I> DifferentialEvolution<'a, O, C, I>
where
	O: ObjectiveEvaluator + ?Sized,
	C: ConstraintEvaluator + ?Sized,
	I: PopulationInitializer,
{
	pub fn with_initializer(
		objective: &'a O,
		constraint: &'a C,
		initializer: I,
		bounds: Bounds,
	) -> Self {
		Self { objective, constraint, initializer, bounds, config: DEConfig::default() }
	}

	/// Mutable access to configuration
	pub fn config_mut(&mut self) -> &mut DEConfig {
		&mut self.config
	}

	pub fn bounds(&self) -> &Bounds {
		&self.bounds
	}

	/// Run until the budget left after `elapsed` is used up
	///
	/// `elapsed` is the part of `config.time_limit` already consumed by an
	/// earlier phase. The deadline is checked before each generation; a
	/// generation in flight always completes.
	pub fn solve(&mut self, elapsed: Duration) -> Result<DEReport> {
		use crossover_exponential::exponential_crossover;
		use distinct_indices::distinct_pair;
		use evaluator::evaluate_candidate;
		use mutant_best1::mutant_best1;
		use parallel_eval::{build_pool, evaluate_population_parallel, map_lanes, seed_lanes};

		let n = self.bounds.len();
		self.config.validate(n)?;

		let npop = self.config.popsize;
		let remaining = self.config.time_limit.saturating_sub(elapsed);
		let started = Instant::now();

		let objective = self.objective;
		let constraint = self.constraint;
		let bounds = &self.bounds;
		let parallel = self.config.parallel.clone();
		let (f, mutation_prob, cr) =
			(self.config.mutation, self.config.mutation_prob, self.config.recombination);
		let stagnation_limit = self.config.stagnation_limit;
		let max_generations = self.config.max_generations;

		info!(
			"DE init: {} variables, population={}, F={:.4}, p_mut={:.3}, CR={:.4}, budget={:.1}s",
			n,
			npop,
			f,
			mutation_prob,
			cr,
			remaining.as_secs_f64()
		);

		let pool = build_pool(&parallel)?;

		// master RNG drives (re)initialization, lanes drive trials
		let mut rng: StdRng = match self.config.seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => {
				let mut thread_rng = rand::rng();
				StdRng::from_rng(&mut thread_rng)
			}
		};
		let mut lanes = seed_lanes(npop, self.config.seed.map(|s| s.wrapping_add(1)));

		let initial = self.initializer.generate(npop, bounds, &mut rng);
		let energies = run_in(pool.as_ref(), || {
			evaluate_population_parallel(&initial, objective, constraint, &parallel)
		});
		let mut nfev = npop;
		let mut population = Population::new(initial, energies)?;

		if let Some(x0) = &self.config.x0 {
			let mut x0c = x0.clone();
			bounds.clamp_inplace(&mut x0c);
			let f0 = evaluate_candidate(objective, constraint, &x0c).fitness;
			nfev += 1;
			population.insert(0, &x0c, f0);
			info!("  Seed individual placed in slot 0: fitness={:.6e}", f0);
		}

		let (best_idx, mut best_f) = population.best();
		let mut best_x = population.individual(best_idx).to_vec();
		info!("  Initial best: fitness={:.6e} at index {}", best_f, best_idx);

		let mut nit = 0usize;
		let mut stagnation = 0usize;
		let mut restarts = 0usize;
		let message;

		loop {
			if started.elapsed() >= remaining {
				message = format!("Time budget exhausted after {} generations", nit);
				break;
			}
			if max_generations.is_some_and(|max| nit >= max) {
				message = format!("Maximum generations reached: {}", nit);
				break;
			}

			if stagnation > stagnation_limit {
				let fresh = self.initializer.generate(npop, bounds, &mut rng);
				let fresh_f = run_in(pool.as_ref(), || {
					evaluate_population_parallel(&fresh, objective, constraint, &parallel)
				});
				nfev += npop;
				population.replace(fresh, fresh_f)?;
				population.insert(0, &best_x, best_f);
				restarts += 1;
				warn!(
					"DE restart #{} after {} stagnant generations (best fitness kept: {:.6e})",
					restarts, stagnation, best_f
				);
				stagnation = 0;
			}

			nit += 1;

			// Every trial of this generation reads the same frozen snapshot
			let (gen_best, _) = population.best();
			let snapshot = population.individuals();
			let snapshot_f = population.fitness();
			let trials: Vec<(Vec<i64>, f64)> = run_in(pool.as_ref(), || {
				map_lanes(&mut lanes, &parallel, |i, lane| {
					let (r1, r2) = distinct_pair(i, npop, lane);
					let mutant = mutant_best1(
						snapshot.row(i),
						snapshot.row(gen_best),
						snapshot.row(r1),
						snapshot.row(r2),
						f,
						mutation_prob,
						bounds,
						lane,
					);
					let mut trial = exponential_crossover(snapshot.row(i), &mutant, cr, lane);
					bounds.clamp_inplace(&mut trial);
					let trial_f = evaluate_candidate(objective, constraint, &trial).fitness;
					(trial, trial_f)
				})
			});
			nfev += npop;

			// Selection: strictly better trials replace their target
			let mut next = snapshot.clone();
			let mut next_f = snapshot_f.clone();
			let mut accepted = 0usize;
			for (i, (trial, trial_f)) in trials.into_iter().enumerate() {
				if trial_f < snapshot_f[i] {
					next.row_mut(i).assign(&ArrayView1::from(&trial[..]));
					next_f[i] = trial_f;
					accepted += 1;
				}
			}
			population.replace(next, next_f)?;

			let (new_best_idx, new_best_f) = population.best();
			if new_best_f < best_f {
				best_f = new_best_f;
				best_x = population.individual(new_best_idx).to_vec();
				stagnation = 0;
				info!("DE gen {:5}  new best fitness={:.6e}", nit, best_f);
			} else {
				stagnation += 1;
			}

			let pop_std = population.fitness().std(0.0);
			debug!(
				"DE gen {:5}  best_f={:.6e}  std={:.3e}  accepted={}/{}  stagnation={}",
				nit, best_f, pop_std, accepted, npop, stagnation
			);

			if let Some(ref mut cb) = self.config.callback {
				let intermediate = DEIntermediate {
					x: best_x.clone(),
					fun: best_f,
					convergence: pop_std,
					iter: nit,
					stagnation,
					restarts,
					population: population.individuals().clone(),
					population_energies: population.fitness().clone(),
				};
				if let CallbackAction::Stop = cb(&intermediate) {
					message = format!("Optimization stopped by callback after {} generations", nit);
					break;
				}
			}
		}

		// Re-derive the best from the final population and decompose it
		let (idx, _) = population.best();
		let x = population.individual(idx).to_vec();
		let status = constraint.evaluate(&x);
		let obj = objective.evaluate(&x, status.penalty);
		nfev += 1;

		info!(
			"DE finished: {}; fitness={:.6e} penalty={:.3e}",
			message, obj.fitness, status.penalty
		);
		info!(
			"  mean_risk={:.6e} expected_excess={:.6e}",
			obj.mean_risk, obj.expected_excess
		);
		info!("  {} generations, {} evaluations, {} restarts", nit, nfev, restarts);

		let (pop, energies) = population.into_parts();
		Ok(DEReport {
			x,
			fun: obj.fitness,
			mean_risk: obj.mean_risk,
			expected_excess: obj.expected_excess,
			penalty: status.penalty,
			satisfied: status.satisfied,
			message,
			nit,
			nfev,
			restarts,
			population: pop,
			population_energies: energies,
		})
	}
}
