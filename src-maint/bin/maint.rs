//! maint - Risk-aware scheduling of maintenance interventions
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

use clap::Parser;
use log::info;
use maint::{ConstraintReport, Problem, ScheduleSource};
use std::error::Error;
use std::time::Instant;

/// Plan maintenance interventions for one problem instance.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The budget runs from process start, loading included
    let started = Instant::now();
    let args = maint::cli::Args::parse();

    // Validate CLI arguments
    maint::cli::validate_args_or_exit(&args);

    let problem = Problem::from_file(&args.input)?;
    info!(
        "loaded {}: {} interventions, {} resources, {} exclusions, T={}",
        args.input.display(),
        problem.len(),
        problem.resources.len(),
        problem.exclusions.len(),
        problem.horizon
    );

    let settings = args.settings(&problem);
    info!(
        "budget {:.1}s on {} worker threads",
        settings.time_limit.as_secs_f64(),
        args.threads.unwrap_or_else(num_cpus::get)
    );

    let provider = args.seed_provider();
    let schedule = maint::optimize(&problem, provider.as_ref(), &settings, started)?;

    let source = match schedule.source {
        ScheduleSource::Seed => "seed".to_string(),
        ScheduleSource::DifferentialEvolution => {
            format!("DE, {} generations, {} restarts", schedule.generations, schedule.restarts)
        }
    };
    let report = ConstraintReport::evaluate(&problem, &schedule.assignment);
    println!("Result ({source}) after {:.1}s", started.elapsed().as_secs_f64());
    println!("  fitness         : {:.6}", schedule.fitness);
    println!("  mean risk       : {:.6}", schedule.mean_risk);
    println!("  expected excess : {:.6}", schedule.expected_excess);
    println!(
        "  constraints     : {} (window {}, resource {:.6}, exclusion {})",
        if schedule.satisfied { "satisfied" } else { "VIOLATED" },
        report.window,
        report.resource,
        report.exclusion
    );

    match &args.output {
        Some(path) => {
            maint::write_solution(path, &problem, &schedule.assignment)
                .map_err(|source| maint::MaintError::Io { path: path.clone(), source })?;
            info!("solution written to {}", path.display());
        }
        None => print!("{}", maint::format_solution(&problem, &schedule.assignment)),
    }
    Ok(())
}
