use ndarray::Array2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::bounds::Bounds;
use crate::evaluator::PopulationInitializer;

pub(crate) fn init_random<R: Rng + ?Sized>(
    npop: usize,
    bounds: &Bounds,
    rng: &mut R,
) -> Array2<i64> {
    let n = bounds.len();
    let mut pop = Array2::<i64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            pop[(i, j)] = rng.random_range(bounds.lower()[j]..=bounds.upper()[j]);
        }
    }
    pop
}

/// Draws every gene independently and uniformly from its inclusive range
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformInitializer;

impl PopulationInitializer for UniformInitializer {
    fn generate(&self, npop: usize, bounds: &Bounds, rng: &mut StdRng) -> Array2<i64> {
        init_random(npop, bounds, rng)
    }
}
