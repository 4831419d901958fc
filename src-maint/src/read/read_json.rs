use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::ProblemError;
use crate::problem::{Exclusion, Intervention, Problem, Resource, Workload};

/// A number that instances sometimes spell as a string ("17" or 17)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Text(String),
}

impl Numeric {
    fn to_i64(&self, field: &str) -> Result<i64, ProblemError> {
        match self {
            Numeric::Int(v) => Ok(*v),
            Numeric::Text(s) => {
                s.trim().parse().map_err(|_| invalid(field, format!("{s:?} is not an integer")))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResource {
    min: Vec<f64>,
    max: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawIntervention {
    tmax: Numeric,
    #[serde(rename = "Delta")]
    delta: Vec<f64>,
    #[serde(default)]
    workload: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>,
    #[serde(default)]
    risk: BTreeMap<String, BTreeMap<String, Vec<f64>>>,
}

#[derive(Debug, Deserialize)]
struct RawInstance {
    #[serde(rename = "Resources", default)]
    resources: BTreeMap<String, RawResource>,
    #[serde(rename = "Seasons", default)]
    seasons: BTreeMap<String, Vec<Numeric>>,
    #[serde(rename = "Interventions")]
    interventions: BTreeMap<String, RawIntervention>,
    #[serde(rename = "Exclusions", default)]
    exclusions: BTreeMap<String, Vec<String>>,
    #[serde(rename = "T")]
    horizon: usize,
    #[serde(rename = "Scenarios_number")]
    scenarios: Vec<usize>,
    #[serde(rename = "Quantile")]
    quantile: f64,
    #[serde(rename = "Alpha")]
    alpha: f64,
    #[serde(rename = "ComputationTime", default)]
    computation_time: Option<f64>,
}

fn invalid(field: &str, reason: impl Into<String>) -> ProblemError {
    ProblemError::InvalidField { field: field.to_string(), reason: reason.into() }
}

fn check_len(what: String, expected: usize, got: usize) -> Result<(), ProblemError> {
    if expected != got {
        return Err(ProblemError::LengthMismatch { what, expected, got });
    }
    Ok(())
}

fn parse_step(field: &str, key: &str) -> Result<usize, ProblemError> {
    match key.trim().parse::<usize>() {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(invalid(field, format!("{key:?} is not a time step"))),
    }
}

/// Offset of absolute step `t` inside the window of `start`, if it lies there
fn window_offset(delta: &[i64], start: usize, t: usize) -> Option<usize> {
    let d = *delta.get(start.checked_sub(1)?)? as usize;
    (t >= start && t < start + d).then(|| t - start)
}

fn build_intervention(
    name: &str,
    raw: RawIntervention,
    resource_index: &BTreeMap<&str, usize>,
) -> Result<Intervention, ProblemError> {
    let tmax = raw.tmax.to_i64(&format!("{name}.tmax"))?;
    if tmax < 1 {
        return Err(invalid(&format!("{name}.tmax"), format!("{tmax} must be >= 1")));
    }
    if raw.delta.len() < tmax as usize {
        return Err(invalid(
            &format!("{name}.Delta"),
            format!("{} entries for tmax {}", raw.delta.len(), tmax),
        ));
    }
    let mut delta = Vec::with_capacity(raw.delta.len());
    for &d in &raw.delta {
        if d < 1.0 || d.fract() != 0.0 {
            return Err(invalid(&format!("{name}.Delta"), format!("{d} is not a positive integer")));
        }
        delta.push(d as i64);
    }

    let mut workloads = Vec::with_capacity(raw.workload.len());
    for (res_name, by_step) in &raw.workload {
        let resource =
            *resource_index.get(res_name.as_str()).ok_or_else(|| ProblemError::UnknownResource {
                intervention: name.to_string(),
                resource: res_name.clone(),
            })?;
        let mut by_start: Vec<Vec<f64>> = delta.iter().map(|&d| vec![0.0; d as usize]).collect();
        for (t_key, by_start_raw) in by_step {
            let t = parse_step(&format!("{name}.workload.{res_name}"), t_key)?;
            for (s_key, &value) in by_start_raw {
                let s = parse_step(&format!("{name}.workload.{res_name}.{t_key}"), s_key)?;
                let offset = window_offset(&delta, s, t).ok_or_else(|| ProblemError::OutOfWindow {
                    intervention: name.to_string(),
                    what: "workload",
                    t,
                    start: s,
                })?;
                by_start[s - 1][offset] = value;
            }
        }
        workloads.push(Workload { resource, by_start });
    }

    let mut risk: Vec<Vec<Vec<f64>>> =
        delta.iter().map(|&d| vec![Vec::new(); d as usize]).collect();
    for (t_key, by_start_raw) in raw.risk {
        let t = parse_step(&format!("{name}.risk"), &t_key)?;
        for (s_key, values) in by_start_raw {
            let s = parse_step(&format!("{name}.risk.{t_key}"), &s_key)?;
            let offset = window_offset(&delta, s, t).ok_or_else(|| ProblemError::OutOfWindow {
                intervention: name.to_string(),
                what: "risk",
                t,
                start: s,
            })?;
            risk[s - 1][offset] = values;
        }
    }

    Ok(Intervention { name: name.to_string(), tmax, delta, workloads, risk })
}

/// Parse and validate a problem instance from its JSON text
pub fn parse_problem(json: &str) -> Result<Problem, ProblemError> {
    let raw: RawInstance = serde_json::from_str(json)?;
    let horizon = raw.horizon;
    if horizon < 1 {
        return Err(invalid("T", "the horizon needs at least one step"));
    }
    check_len("Scenarios_number".to_string(), horizon, raw.scenarios.len())?;
    if !(raw.quantile > 0.0 && raw.quantile <= 1.0) {
        return Err(invalid("Quantile", format!("{} is outside (0, 1]", raw.quantile)));
    }
    if !(0.0..=1.0).contains(&raw.alpha) {
        return Err(invalid("Alpha", format!("{} is outside [0, 1]", raw.alpha)));
    }
    if let Some(ct) = raw.computation_time {
        if !(ct > 0.0) {
            return Err(invalid("ComputationTime", format!("{ct} must be positive")));
        }
    }

    let mut resources = Vec::with_capacity(raw.resources.len());
    for (name, r) in raw.resources {
        check_len(format!("{name}.min"), horizon, r.min.len())?;
        check_len(format!("{name}.max"), horizon, r.max.len())?;
        resources.push(Resource { name, min: r.min, max: r.max });
    }
    let resource_index: BTreeMap<&str, usize> =
        resources.iter().enumerate().map(|(i, r)| (r.name.as_str(), i)).collect();

    let mut interventions = Vec::with_capacity(raw.interventions.len());
    for (name, ri) in raw.interventions {
        interventions.push(build_intervention(&name, ri, &resource_index)?);
    }
    if interventions.is_empty() {
        return Err(invalid("Interventions", "no intervention to schedule"));
    }

    let mut seasons: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (name, steps) in raw.seasons {
        let mut parsed = Vec::with_capacity(steps.len());
        for step in &steps {
            let t = step.to_i64(&format!("Seasons.{name}"))?;
            if t < 1 || t as usize > horizon {
                return Err(invalid(
                    &format!("Seasons.{name}"),
                    format!("step {t} is outside 1..={horizon}"),
                ));
            }
            parsed.push(t as usize);
        }
        parsed.sort_unstable();
        parsed.dedup();
        seasons.insert(name, parsed);
    }

    let index_of = |exclusion: &str, name: &str| {
        interventions.iter().position(|i| i.name == name).ok_or_else(|| {
            ProblemError::UnknownIntervention {
                exclusion: exclusion.to_string(),
                name: name.to_string(),
            }
        })
    };
    let mut exclusions = Vec::with_capacity(raw.exclusions.len());
    for (name, parts) in &raw.exclusions {
        let [a, b, season] = parts.as_slice() else {
            return Err(invalid(
                &format!("Exclusions.{name}"),
                "expected [intervention, intervention, season]",
            ));
        };
        let first = index_of(name, a)?;
        let second = index_of(name, b)?;
        let steps = seasons.get(season).cloned().ok_or_else(|| ProblemError::UnknownSeason {
            exclusion: name.clone(),
            season: season.clone(),
        })?;
        exclusions.push(Exclusion {
            name: name.clone(),
            first,
            second,
            season: season.clone(),
            steps,
        });
    }

    debug!(
        "parsed problem: T={}, {} interventions, {} resources, {} exclusions",
        horizon,
        interventions.len(),
        resources.len(),
        exclusions.len()
    );

    Ok(Problem {
        resources,
        interventions,
        exclusions,
        scenarios: raw.scenarios,
        horizon,
        quantile: raw.quantile,
        alpha: raw.alpha,
        computation_time: raw.computation_time,
    })
}

/// Load a problem instance from a JSON file
pub fn read_problem(path: &Path) -> Result<Problem, ProblemError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ProblemError::Io { path: path.to_path_buf(), source })?;
    parse_problem(&text)
}

impl Problem {
    pub fn from_json_str(json: &str) -> Result<Self, ProblemError> {
        parse_problem(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ProblemError> {
        read_problem(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_offset() {
        let delta = [2, 1];
        assert_eq!(window_offset(&delta, 1, 1), Some(0));
        assert_eq!(window_offset(&delta, 1, 2), Some(1));
        assert_eq!(window_offset(&delta, 1, 3), None);
        assert_eq!(window_offset(&delta, 2, 1), None);
        assert_eq!(window_offset(&delta, 3, 3), None);
        assert_eq!(window_offset(&delta, 0, 1), None);
    }

    #[test]
    fn test_numeric_spellings() {
        let n: Numeric = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(n.to_i64("tmax").unwrap(), 17);
        let n: Numeric = serde_json::from_str("4").unwrap();
        assert_eq!(n.to_i64("tmax").unwrap(), 4);
        let n: Numeric = serde_json::from_str("\"x\"").unwrap();
        assert!(matches!(n.to_i64("tmax"), Err(ProblemError::InvalidField { .. })));
    }
}
