//! maint - Risk-aware maintenance planning
//! Command-line interface of the planner
//!
//! Copyright (C) 2025 Pierre Aubert pierre(at)spinorama(dot)org
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::problem::Problem;
use crate::seed::{CoordinateDescentSeed, FileSeed, NoSeed, SeedProvider};
use crate::workflow::Settings;

/// Default wall-clock budget when neither the CLI nor the instance sets one
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 900.0;

/// Schedule maintenance interventions with a seeded, time-boxed differential evolution.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the problem instance (JSON).
    pub input: PathBuf,

    /// Write the solution here (`<name> <start>` per line) instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Total wall-clock budget in seconds.
    /// Defaults to the instance's ComputationTime, else 900.
    #[arg(short, long, value_parser = parse_strictly_positive_f64)]
    pub time_limit: Option<f64>,

    /// Fraction of the budget given to the seed phase.
    #[arg(long, default_value_t = 0.1, value_parser = parse_fraction)]
    pub seed_share: f64,

    /// Seed the population with a previously written solution file.
    #[arg(long)]
    pub seed_solution: Option<PathBuf>,

    /// Skip the constructive seed search (ignored with --seed-solution).
    #[arg(long = "no-seed-search", action = ArgAction::SetFalse)]
    pub seed_search: bool,

    /// Cap the improvement sweeps of the seed search (default: until no improvement).
    #[arg(long)]
    pub max_seed_sweeps: Option<usize>,

    /// Population size.
    #[arg(long, default_value_t = 50)]
    pub population: usize,

    /// Mutation factor F in [0, 2].
    #[arg(long, default_value_t = 0.6235)]
    pub mutation: f64,

    /// Per-gene mutation probability.
    #[arg(long, default_value_t = 1.0, value_parser = parse_fraction)]
    pub mutation_prob: f64,

    /// Exponential crossover rate CR.
    #[arg(long, default_value_t = 0.5763, value_parser = parse_fraction)]
    pub recombination: f64,

    /// Restart the population after this many generations without improvement.
    #[arg(long, default_value_t = 100)]
    pub stagnation: usize,

    /// Stop after this many generations even if time is left.
    #[arg(long)]
    pub max_generations: Option<usize>,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Random seed for reproducible runs.
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Save per-generation records to this CSV file.
    #[arg(long)]
    pub record: Option<PathBuf>,
}

fn parse_strictly_positive_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if v > 0.0 && v.is_finite() { Ok(v) } else { Err(format!("{v} must be > 0")) }
}

fn parse_fraction(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if (0.0..=1.0).contains(&v) { Ok(v) } else { Err(format!("{v} must be in [0, 1]")) }
}

impl Args {
    /// Workflow settings, resolving the time limit against the instance
    pub fn settings(&self, problem: &Problem) -> Settings {
        let secs = self
            .time_limit
            .or(problem.computation_time)
            .unwrap_or(DEFAULT_TIME_LIMIT_SECS);
        Settings {
            time_limit: Duration::from_secs_f64(secs),
            seed_share: self.seed_share,
            popsize: self.population,
            mutation: self.mutation,
            mutation_prob: self.mutation_prob,
            recombination: self.recombination,
            stagnation_limit: self.stagnation,
            max_generations: self.max_generations,
            rng_seed: self.rng_seed,
            threads: self.threads,
            record: self.record.clone(),
        }
    }

    pub fn seed_provider(&self) -> Box<dyn SeedProvider> {
        match (&self.seed_solution, self.seed_search) {
            (Some(path), _) => Box::new(FileSeed::new(path)),
            (None, true) => Box::new(CoordinateDescentSeed { max_sweeps: self.max_seed_sweeps }),
            (None, false) => Box::new(NoSeed),
        }
    }
}

/// Validate CLI arguments
pub fn validate_args(args: &Args) -> Result<(), String> {
    if args.population < 3 {
        return Err(format!("Population size ({}) must be >= 3", args.population));
    }
    if !(0.0..=2.0).contains(&args.mutation) {
        return Err(format!("Invalid mutation factor: {} (must be in [0, 2])", args.mutation));
    }
    if args.threads == Some(0) {
        return Err("Number of threads must be > 0".to_string());
    }
    if args.max_generations == Some(0) {
        return Err("Maximum generations must be > 0".to_string());
    }
    if args.seed_solution.is_some() && !args.seed_search {
        log::warn!("--no-seed-search has no effect together with --seed-solution");
    }
    if args.max_seed_sweeps.is_some() && (args.seed_solution.is_some() || !args.seed_search) {
        log::warn!("--max-seed-sweeps only applies to the constructive seed search");
    }
    Ok(())
}

/// Validate arguments and exit with error if validation fails
pub fn validate_args_or_exit(args: &Args) {
    if let Err(error) = validate_args(args) {
        eprintln!("Validation Error: {}", error);
        process::exit(1);
    }
}
