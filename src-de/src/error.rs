//! Error types for the integer Differential Evolution engine.
//!
//! Constraint violations are never errors: they are penalties. The variants
//! below only cover configurations the engine refuses to start with.

use thiserror::Error;

/// Errors that can occur when building or starting a DE run.
#[derive(Debug, Error)]
pub enum DEError {
    /// No decision variables at all.
    #[error("bounds are empty: at least one decision variable is required")]
    EmptyBounds,

    /// A lower bound exceeds its corresponding upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: i64,
        /// The upper bound value
        upper: i64,
    },

    /// Population size is too small to draw two partners distinct from the target.
    #[error("population size ({pop_size}) must be >= 3")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
    },

    /// Mutation factor is out of valid range [0, 2].
    #[error("invalid mutation factor: {factor} (must be in [0, 2])")]
    InvalidMutationFactor {
        /// The invalid mutation factor
        factor: f64,
    },

    /// Per-gene mutation probability is out of valid range [0, 1].
    #[error("invalid mutation probability: {prob} (must be in [0, 1])")]
    InvalidMutationProbability {
        /// The invalid probability
        prob: f64,
    },

    /// Crossover rate is out of valid range [0, 1].
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid crossover rate
        rate: f64,
    },

    /// Seed individual has wrong dimension.
    #[error("seed dimension mismatch: expected {expected}, got {got}")]
    SeedDimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        got: usize,
    },

    /// Population matrix and fitness vector disagree in length.
    #[error("population has {individuals} individuals but {fitness} fitness values")]
    PopulationMismatch {
        /// Rows in the population matrix
        individuals: usize,
        /// Entries in the fitness vector
        fitness: usize,
    },

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
    /// Returns `true` if this is a bounds-related error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, DEError::EmptyBounds | DEError::InvalidBounds { .. })
    }

    /// Returns `true` if this is a configuration-related error.
    ///
    /// This includes population size, mutation and crossover parameters.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DEError::PopulationTooSmall { .. }
                | DEError::InvalidMutationFactor { .. }
                | DEError::InvalidMutationProbability { .. }
                | DEError::InvalidCrossoverRate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DEError::InvalidBounds { index: 2, lower: 5, upper: 1 };
        assert_eq!(err.to_string(), "invalid bounds at index 2: lower (5) > upper (1)");
        let err = DEError::PopulationTooSmall { pop_size: 2 };
        assert_eq!(err.to_string(), "population size (2) must be >= 3");
    }

    #[test]
    fn test_categories() {
        let config_err = DEError::InvalidCrossoverRate { rate: 1.5 };
        let bounds_err = DEError::EmptyBounds;
        let seed_err = DEError::SeedDimensionMismatch { expected: 3, got: 2 };

        assert!(config_err.is_config_error());
        assert!(!config_err.is_bounds_error());
        assert!(bounds_err.is_bounds_error());
        assert!(!bounds_err.is_config_error());
        assert!(!seed_err.is_config_error() && !seed_err.is_bounds_error());
    }
}
