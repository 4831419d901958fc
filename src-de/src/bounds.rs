use crate::error::{DEError, Result};

/// Inclusive per-variable integer bounds, fixed for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    lower: Vec<i64>,
    upper: Vec<i64>,
}

impl Bounds {
    /// Build bounds from `(lower, upper)` pairs
    pub fn new(pairs: &[(i64, i64)]) -> Result<Self> {
        if pairs.is_empty() {
            return Err(DEError::EmptyBounds);
        }
        for (index, &(lower, upper)) in pairs.iter().enumerate() {
            if lower > upper {
                return Err(DEError::InvalidBounds { index, lower, upper });
            }
        }
        Ok(Self {
            lower: pairs.iter().map(|p| p.0).collect(),
            upper: pairs.iter().map(|p| p.1).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &[i64] {
        &self.lower
    }

    pub fn upper(&self) -> &[i64] {
        &self.upper
    }

    /// Clamp a single gene into its range
    #[inline]
    pub fn clamp_gene(&self, j: usize, v: i64) -> i64 {
        v.clamp(self.lower[j], self.upper[j])
    }

    /// Clamp every gene of `x` in place
    pub fn clamp_inplace(&self, x: &mut [i64]) {
        for (j, v) in x.iter_mut().enumerate() {
            *v = self.clamp_gene(j, *v);
        }
    }

    pub fn contains(&self, x: &[i64]) -> bool {
        x.len() == self.len()
            && x.iter().enumerate().all(|(j, &v)| self.lower[j] <= v && v <= self.upper[j])
    }
}
