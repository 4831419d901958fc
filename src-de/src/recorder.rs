use serde::Serialize;
use std::fs::{File, create_dir_all};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::{CallbackAction, DEIntermediate};

/// Records one row per generation via the engine callback
#[derive(Debug, Clone, Default)]
pub struct OptimizationRecorder {
    /// Shared records storage
    records: Arc<Mutex<Vec<OptimizationRecord>>>,
}

/// A single generation record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationRecord {
    /// Generation number (1-based)
    pub generation: usize,
    /// Best fitness known after this generation
    pub best_fitness: f64,
    /// Standard deviation of the population fitness
    pub convergence: f64,
    /// Generations in a row without improvement
    pub stagnation: usize,
    /// Restarts performed so far
    pub restarts: usize,
    /// Whether this generation improved the best known fitness
    pub is_improvement: bool,
}

impl OptimizationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a callback that appends a record per generation
    pub fn create_callback(&self) -> Box<dyn FnMut(&DEIntermediate) -> CallbackAction + Send> {
        let records = self.records.clone();
        let mut best: Option<f64> = None;

        Box::new(move |intermediate: &DEIntermediate| -> CallbackAction {
            let is_improvement = best.is_none_or(|b| intermediate.fun < b);
            if is_improvement {
                best = Some(intermediate.fun);
            }
            if let Ok(mut guard) = records.lock() {
                guard.push(OptimizationRecord {
                    generation: intermediate.iter,
                    best_fitness: intermediate.fun,
                    convergence: intermediate.convergence,
                    stagnation: intermediate.stagnation,
                    restarts: intermediate.restarts,
                    is_improvement,
                });
            }
            CallbackAction::Continue
        })
    }

    /// Write all records as CSV with a header row
    pub fn save_to_csv(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for record in self.get_records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Get a copy of all recorded generations
    pub fn get_records(&self) -> Vec<OptimizationRecord> {
        self.records.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn num_generations(&self) -> usize {
        self.records.lock().map(|g| g.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn step(iter: usize, fun: f64) -> DEIntermediate {
        DEIntermediate {
            x: vec![1, 2],
            fun,
            convergence: 0.1,
            iter,
            stagnation: 0,
            restarts: 0,
            population: Array2::from_elem((3, 2), 1),
            population_energies: Array1::from_elem(3, fun),
        }
    }

    #[test]
    fn test_records_improvements() {
        let recorder = OptimizationRecorder::new();
        let mut callback = recorder.create_callback();

        assert!(matches!(callback(&step(1, 5.0)), CallbackAction::Continue));
        callback(&step(2, 5.0));
        callback(&step(3, 1.25));

        let records = recorder.get_records();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_improvement);
        assert!(!records[1].is_improvement);
        assert!(records[2].is_improvement);
        assert_eq!(records[2].best_fitness, 1.25);
    }

    #[test]
    fn test_save_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace").join("run.csv");
        let recorder = OptimizationRecorder::new();
        let mut callback = recorder.create_callback();
        callback(&step(1, 2.0));
        callback(&step(2, 1.0));
        recorder.save_to_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "generation,best_fitness,convergence,stagnation,restarts,is_improvement"
        );
        assert!(lines[2].starts_with("2,1.0,"));
    }
}
