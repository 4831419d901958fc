use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::SeedError;
use crate::problem::Problem;

/// Render an assignment as `<name> <start>` lines, in intervention order
pub fn format_solution(problem: &Problem, x: &[i64]) -> String {
    let mut out = String::new();
    for (intervention, start) in problem.interventions.iter().zip(x) {
        let _ = writeln!(out, "{} {}", intervention.name, start);
    }
    out
}

pub fn write_solution(path: &Path, problem: &Problem, x: &[i64]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, format_solution(problem, x))
}

/// Parse `<name> <start>` lines back into an assignment ordered like `problem`
///
/// Blank lines and lines starting with `#` are skipped. Every intervention
/// must appear exactly once.
pub fn parse_solution(text: &str, problem: &Problem) -> Result<Vec<i64>, SeedError> {
    let mut x: Vec<Option<i64>> = vec![None; problem.len()];
    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let malformed = || SeedError::Parse { line: line_num + 1, content: line.to_string() };
        let (name, start) = match parts.as_slice() {
            [name, start] => (*name, start.parse::<i64>().map_err(|_| malformed())?),
            _ => return Err(malformed()),
        };
        let i = problem
            .intervention_index(name)
            .ok_or_else(|| SeedError::UnknownIntervention { name: name.to_string() })?;
        if x[i].replace(start).is_some() {
            return Err(SeedError::Duplicate { name: name.to_string() });
        }
    }
    x.into_iter()
        .enumerate()
        .map(|(i, s)| {
            s.ok_or_else(|| SeedError::MissingIntervention {
                name: problem.interventions[i].name.clone(),
            })
        })
        .collect()
}

pub fn read_solution(path: &Path, problem: &Problem) -> Result<Vec<i64>, SeedError> {
    let text = fs::read_to_string(path)
        .map_err(|source| SeedError::Io { path: path.to_path_buf(), source })?;
    parse_solution(&text, problem)
}
