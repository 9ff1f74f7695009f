use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Source name used for standard input
pub const STDIN_SOURCE: &str = "-";

/// Expand glob patterns into concrete paths, keeping the order they were given.
///
/// Arguments without glob metacharacters are passed through untouched (so a
/// missing file surfaces later as a read error naming that file). A pattern
/// that matches nothing is an error.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !is_glob(pattern) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let mut matched: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("Invalid glob pattern '{}'", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();
        if matched.is_empty() {
            anyhow::bail!("No files match '{}'", pattern);
        }
        matched.sort();
        paths.extend(matched);
    }
    Ok(paths)
}

/// A pattern that could not be expanded
#[derive(Debug)]
pub struct PatternFailure {
    pub pattern: String,
    /// Number of expanded paths that come before this pattern
    pub position: usize,
    pub error: anyhow::Error,
}

/// Expand each pattern on its own so one bad pattern doesn't drop the others.
pub fn expand_each(patterns: &[String]) -> (Vec<PathBuf>, Vec<PatternFailure>) {
    let mut paths = Vec::new();
    let mut failed = Vec::new();
    for pattern in patterns {
        match expand_patterns(std::slice::from_ref(pattern)) {
            Ok(matched) => paths.extend(matched),
            Err(error) => failed.push(PatternFailure {
                pattern: pattern.clone(),
                position: paths.len(),
                error,
            }),
        }
    }
    (paths, failed)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Read an analysis result from a JSON file
pub fn read_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_json(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Read an analysis result from standard input
pub fn read_json_stdin() -> Result<Value> {
    let mut content = String::new();
    std::io::stdin()
        .lock()
        .read_to_string(&mut content)
        .context("Failed to read standard input")?;
    parse_json(&content).context("Invalid JSON on standard input")
}

fn parse_json(content: &str) -> Result<Value> {
    Ok(serde_json::from_str(content)?)
}
