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
//!
//! This crate plans maintenance interventions on a power network. It
//! integrates:
//!
//! - `maint_de`: the integer Differential Evolution engine
//! - a JSON problem loader and a plain-text solution format
//! - risk objective and constraint evaluators plugged into the engine
//! - seed providers and the shared-budget workflow used by the binary

// Re-export external crate functionality
pub use maint_de as de;

/// Common CLI argument definitions
pub mod cli;
/// Constraint families and penalty aggregation
pub mod constraints;
/// Error types
pub mod error;
/// Risk objective
pub mod objective;
/// Problem model
pub mod problem;
/// Problem and solution file reading/writing
pub mod read;
/// Seed providers
pub mod seed;
/// Shared workflow steps used by the binary
pub mod workflow;

// Re-export commonly used items
pub use constraints::{ConstraintReport, MaintenanceConstraints};
pub use error::{MaintError, ProblemError, SeedError};
pub use objective::RiskObjective;
pub use problem::{Exclusion, Intervention, Problem, Resource, Workload};
pub use read::*;
pub use seed::{CoordinateDescentSeed, FileSeed, NoSeed, SeedProvider};
pub use workflow::*;
