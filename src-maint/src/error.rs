//! Error types for loading problems, producing seeds and running the workflow.

use std::path::PathBuf;

use maint_de::DEError;
use thiserror::Error;

/// Malformed or inconsistent problem data, raised before any search starts.
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("failed to read problem file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid problem JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field is present but its value is unusable
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    #[error("exclusion {exclusion} references unknown intervention {name}")]
    UnknownIntervention { exclusion: String, name: String },

    #[error("exclusion {exclusion} references unknown season {season}")]
    UnknownSeason { exclusion: String, season: String },

    #[error("intervention {intervention} uses unknown resource {resource}")]
    UnknownResource {
        intervention: String,
        resource: String,
    },

    /// A workload or risk entry falls outside the window of its start time
    #[error(
        "intervention {intervention}: {what} at t={t} lies outside the window of start {start}"
    )]
    OutOfWindow {
        intervention: String,
        what: &'static str,
        t: usize,
        start: usize,
    },
}

/// A seed provider could not produce an assignment.
///
/// Never fatal: the workflow falls back to a fully random population.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read solution file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed solution line {line}: {content:?}")]
    Parse { line: usize, content: String },

    #[error("solution names unknown intervention {name}")]
    UnknownIntervention { name: String },

    #[error("solution lists intervention {name} twice")]
    Duplicate { name: String },

    #[error("solution misses intervention {name}")]
    MissingIntervention { name: String },

    #[error("no time left for the seed phase")]
    NoTimeLeft,

    #[error("seed unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error of the planning workflow.
#[derive(Debug, Error)]
pub enum MaintError {
    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error("optimizer error: {0}")]
    Optimizer(#[from] DEError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save optimization record to {path}: {message}")]
    Record { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProblemError::UnknownSeason {
            exclusion: "E1".to_string(),
            season: "summer".to_string(),
        };
        assert_eq!(err.to_string(), "exclusion E1 references unknown season summer");

        let err = ProblemError::LengthMismatch {
            what: "Scenarios_number".to_string(),
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "Scenarios_number has 3 entries, expected 4");
    }

    #[test]
    fn test_wrapping() {
        let err: MaintError = DEError::PopulationTooSmall { pop_size: 1 }.into();
        assert_eq!(err.to_string(), "optimizer error: population size (1) must be >= 3");

        let err = SeedError::NoTimeLeft;
        assert_eq!(err.to_string(), "no time left for the seed phase");
    }
}
