use std::time::Duration;

use crate::bounds::Bounds;
use crate::error::Result;
use crate::evaluator::{ConstraintEvaluator, ObjectiveEvaluator};
use crate::{DEConfig, DEReport, DifferentialEvolution};

/// Convenience wrapper around [`DifferentialEvolution`]:
/// - `objective`: fitness from an assignment and its penalty
/// - `constraint`: penalty of an assignment
/// - `bounds`: vector of inclusive (lower, upper) pairs
/// - `config`: DE configuration
/// - `elapsed`: part of `config.time_limit` already spent elsewhere
pub fn differential_evolution<O, C>(
	objective: &O,
	constraint: &C,
	bounds: &[(i64, i64)],
	config: DEConfig,
	elapsed: Duration,
) -> Result<DEReport>
where
	O: ObjectiveEvaluator + ?Sized,
	C: ConstraintEvaluator + ?Sized,
{
	let bounds = Bounds::new(bounds)?;
	let mut de = DifferentialEvolution::new(objective, constraint, bounds);
	*de.config_mut() = config;
	de.solve(elapsed)
}
