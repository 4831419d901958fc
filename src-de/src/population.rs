use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{DEError, Result};

pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
    let mut best_i = 0usize;
    let mut best_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val < best_v {
            best_v = val;
            best_i = i;
        }
    }
    (best_i, best_v)
}

/// Individuals (one per row) paired index-by-index with their fitness.
///
/// Row `i` of `individuals` is always scored by `fitness[i]`. A generation
/// never edits a live population: it builds the next one and swaps it in
/// with [`Population::replace`].
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Array2<i64>,
    fitness: Array1<f64>,
}

impl Population {
    pub fn new(individuals: Array2<i64>, fitness: Array1<f64>) -> Result<Self> {
        if individuals.nrows() != fitness.len() || fitness.is_empty() {
            return Err(DEError::PopulationMismatch {
                individuals: individuals.nrows(),
                fitness: fitness.len(),
            });
        }
        Ok(Self { individuals, fitness })
    }

    pub fn len(&self) -> usize {
        self.fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fitness.is_empty()
    }

    pub fn individuals(&self) -> &Array2<i64> {
        &self.individuals
    }

    pub fn fitness(&self) -> &Array1<f64> {
        &self.fitness
    }

    pub fn individual(&self, i: usize) -> ArrayView1<'_, i64> {
        self.individuals.row(i)
    }

    /// Index and fitness of the lowest-fitness individual (first one on ties)
    pub fn best(&self) -> (usize, f64) {
        argmin(&self.fitness)
    }

    /// Swap in a whole new generation; sizes must not change
    pub fn replace(&mut self, individuals: Array2<i64>, fitness: Array1<f64>) -> Result<()> {
        if individuals.nrows() != self.len() || fitness.len() != self.len() {
            return Err(DEError::PopulationMismatch {
                individuals: individuals.nrows(),
                fitness: fitness.len(),
            });
        }
        self.individuals = individuals;
        self.fitness = fitness;
        Ok(())
    }

    /// Overwrite slot `i` with a known individual and fitness
    pub fn insert(&mut self, i: usize, x: &[i64], f: f64) {
        self.individuals.row_mut(i).assign(&ArrayView1::from(x));
        self.fitness[i] = f;
    }

    pub fn into_parts(self) -> (Array2<i64>, Array1<f64>) {
        (self.individuals, self.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mismatch_is_rejected() {
        let r = Population::new(Array2::zeros((3, 2)), Array1::zeros(2));
        assert!(matches!(r, Err(DEError::PopulationMismatch { individuals: 3, fitness: 2 })));
    }

    #[test]
    fn test_best_and_insert() {
        let mut p = Population::new(array![[1, 1], [2, 2], [3, 3]], array![3.0, 1.0, 1.0]).unwrap();
        assert_eq!(p.best(), (1, 1.0));
        p.insert(0, &[4, 4], 0.5);
        assert_eq!(p.best(), (0, 0.5));
        assert_eq!(p.individual(0).to_vec(), vec![4, 4]);
    }

    #[test]
    fn test_replace_keeps_size() {
        let mut p = Population::new(array![[1], [2], [3]], array![1.0, 2.0, 3.0]).unwrap();
        assert!(p.replace(array![[1], [2]], array![1.0, 2.0]).is_err());
        p.replace(array![[7], [8], [9]], array![0.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.best(), (0, 0.0));
    }
}
