//! In-memory problem model
//!
//! Everything is 1-indexed in time on the outside (steps `1..=T`, starts
//! `1..=tmax`) and stored densely with 0-based offsets inside. Workload and
//! risk are kept relative to the active window of their start time, so an
//! intervention started at `s` reads entry `t - s` for absolute step `t`.

use std::ops::RangeInclusive;

use maint_de::{Bounds, DEError};

/// A shared capacity, bounded per time step
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    /// Minimum usage per step, `min[t - 1]`
    pub min: Vec<f64>,
    /// Maximum usage per step, `max[t - 1]`
    pub max: Vec<f64>,
}

/// Consumption of one resource by one intervention
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    /// Index into `Problem::resources`
    pub resource: usize,
    /// `by_start[s - 1][t - s]`, one entry per step of the window
    pub by_start: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Intervention {
    pub name: String,
    /// Last permissible start time
    pub tmax: i64,
    /// Duration when started at `s`, `delta[s - 1]`
    pub delta: Vec<i64>,
    pub workloads: Vec<Workload>,
    /// Per-scenario risk, `risk[s - 1][t - s][scenario]`
    pub risk: Vec<Vec<Vec<f64>>>,
}

impl Intervention {
    /// Absolute steps covered when started at `start`, not clipped to the horizon
    ///
    /// A start outside `1..=delta.len()` has no window.
    pub fn window(&self, start: i64) -> Option<RangeInclusive<usize>> {
        if start < 1 || start as usize > self.delta.len() {
            return None;
        }
        let first = start as usize;
        let last = first + self.delta[first - 1] as usize - 1;
        Some(first..=last)
    }

    /// Per-scenario risk at absolute step `t` for `start`; empty when not recorded
    pub fn risk_at(&self, start: i64, t: usize) -> &[f64] {
        let s = start as usize;
        self.risk
            .get(s.wrapping_sub(1))
            .and_then(|by_step| by_step.get(t.wrapping_sub(s)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Two interventions whose windows may not overlap during a season
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub name: String,
    pub first: usize,
    pub second: usize,
    pub season: String,
    /// Sorted, deduplicated absolute steps of the season
    pub steps: Vec<usize>,
}

/// A loaded, validated instance. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub resources: Vec<Resource>,
    pub interventions: Vec<Intervention>,
    pub exclusions: Vec<Exclusion>,
    /// Scenario count per step, `scenarios[t - 1]`
    pub scenarios: Vec<usize>,
    /// Number of time steps T
    pub horizon: usize,
    pub quantile: f64,
    pub alpha: f64,
    /// Suggested wall-clock budget in seconds, when the instance carries one
    pub computation_time: Option<f64>,
}

impl Problem {
    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    pub fn intervention_index(&self, name: &str) -> Option<usize> {
        self.interventions.iter().position(|i| i.name == name)
    }

    /// `(1, tmax)` for every intervention, in order
    pub fn bound_pairs(&self) -> Vec<(i64, i64)> {
        self.interventions.iter().map(|i| (1, i.tmax)).collect()
    }

    pub fn bounds(&self) -> Result<Bounds, DEError> {
        Bounds::new(&self.bound_pairs())
    }
}
