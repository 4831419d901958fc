#![allow(dead_code)]

use maint::Problem;
use serde_json::{Map, Value, json};

/// Two interventions over `horizon` steps, each lasting `duration`, both
/// drawing one unit of `c1` and carrying risk 1.0 in a single scenario.
/// They exclude each other over the whole horizon.
pub fn pair_problem(horizon: usize, duration: usize, tmax: usize, min: f64, max: f64) -> Problem {
    let steps: Vec<String> = (1..=horizon).map(|t| t.to_string()).collect();
    let mut interventions = Map::new();
    for name in ["I1", "I2"] {
        let mut workload: Map<String, Value> = Map::new();
        let mut risk: Map<String, Value> = Map::new();
        for s in 1..=tmax {
            for t in s..s + duration {
                let w = workload.entry(t.to_string()).or_insert_with(|| json!({}));
                w[s.to_string()] = json!(1.0);
                let r = risk.entry(t.to_string()).or_insert_with(|| json!({}));
                r[s.to_string()] = json!([1.0]);
            }
        }
        interventions.insert(
            name.to_string(),
            json!({
                "tmax": tmax.to_string(),
                "Delta": vec![duration; tmax],
                "workload": { "c1": workload },
                "risk": risk,
            }),
        );
    }
    let doc = json!({
        "Resources": { "c1": { "min": vec![min; horizon], "max": vec![max; horizon] } },
        "Seasons": { "all": steps },
        "Interventions": interventions,
        "Exclusions": { "E1": ["I1", "I2", "all"] },
        "T": horizon,
        "Scenarios_number": vec![1; horizon],
        "Quantile": 1.0,
        "Alpha": 0.5,
    });
    Problem::from_json_str(&doc.to_string()).unwrap()
}

/// Unit durations, T = 4, tmax = 4, resource allowed to idle
pub fn unit_duration_problem() -> Problem {
    pair_problem(4, 1, 4, 0.0, 1.0)
}

/// Two-step durations, T = 4, tmax = 3, exactly one unit of work every step
pub fn two_step_problem() -> Problem {
    pair_problem(4, 2, 3, 1.0, 1.0)
}

/// One intervention covering both steps of a two-scenario horizon:
/// mean risk 2, expected excess 0.5
pub fn alpha_problem(alpha: f64) -> Problem {
    let doc = json!({
        "Interventions": {
            "I1": {
                "tmax": 1, "Delta": [2], "workload": {},
                "risk": { "1": { "1": [1.0, 3.0] }, "2": { "1": [2.0, 2.0] } }
            }
        },
        "T": 2, "Scenarios_number": [2, 2], "Quantile": 1.0, "Alpha": alpha
    });
    Problem::from_json_str(&doc.to_string()).unwrap()
}
