use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::analysis::{analyze_file, AnalysisSettings, CacheConfig};
use crate::input::PatternFailure;
use crate::scoring::{calculate_score, ScoreResult, ScoringConfig};

/// A recording that was analyzed and scored
#[derive(Debug, Clone)]
pub struct ScoredRecording {
    pub source: String,
    pub result: ScoreResult,
}

/// A recording that couldn't be analyzed
#[derive(Debug)]
pub struct FailedRecording {
    /// Index of the input among the expanded paths
    pub position: usize,
    pub source: String,
    pub error: anyhow::Error,
}

/// Raw analysis as written by `--save-dir`
#[derive(Serialize)]
struct SavedAnalysis<'a> {
    source: &'a str,
    analyzed_at: DateTime<Utc>,
    analysis: &'a Value,
}

/// Analyze recordings concurrently, save raw responses if asked, and score
/// them. Successes and failures both keep the order the paths were given in.
///
/// Individual failures don't stop the batch; they are returned alongside the
/// successes for the caller to report.
pub async fn analyze_and_score(
    client: &reqwest::Client,
    settings: &AnalysisSettings,
    scoring: &ScoringConfig,
    paths: &[PathBuf],
    cache_config: &CacheConfig,
    save_dir: Option<&Path>,
) -> (Vec<ScoredRecording>, Vec<FailedRecording>) {
    let cache_path = crate::analysis::cache::get_cache_path();
    tracing::debug!(
        cache = if cache_config.enabled { "enabled" } else { "disabled (--no-cache)" },
        files = paths.len(),
        "starting analysis"
    );

    let mut futures = FuturesUnordered::new();
    for (index, path) in paths.iter().enumerate() {
        let cache_path = &cache_path;
        futures.push(async move {
            let result = analyze_file(client, settings, cache_config, cache_path, path).await;
            (index, path, result)
        });
    }

    let mut scored = Vec::new();
    let mut failed = Vec::new();

    while let Some((index, path, result)) = futures.next().await {
        let source = path.display().to_string();
        match result {
            Ok(analysis) => {
                if let Some(dir) = save_dir {
                    match save_analysis(dir, path, &analysis) {
                        Ok(saved) => tracing::info!(file = %saved.display(), "saved raw analysis"),
                        Err(e) => tracing::warn!(error = %format!("{:#}", e), "could not save raw analysis"),
                    }
                }
                let result = calculate_score(&analysis, scoring);
                scored.push((index, ScoredRecording { source, result }));
            }
            Err(error) => {
                tracing::debug!(file = %source, error = %format!("{:#}", error), "analysis failed");
                failed.push(FailedRecording {
                    position: index,
                    source,
                    error,
                });
            }
        }
    }

    scored.sort_by_key(|(index, _)| *index);
    failed.sort_by_key(|f| f.position);
    (scored.into_iter().map(|(_, s)| s).collect(), failed)
}

/// Merge patterns that matched nothing into the upload failures, in the order
/// the inputs were given. A pattern sorts before the path at its position.
pub fn failures_in_input_order(
    patterns: Vec<PatternFailure>,
    uploads: Vec<FailedRecording>,
) -> Vec<FailedRecording> {
    let mut failed: Vec<FailedRecording> = patterns
        .into_iter()
        .map(|p| FailedRecording {
            position: p.position,
            source: p.pattern,
            error: p.error,
        })
        .collect();
    failed.extend(uploads);
    // Stable, so pattern failures stay ahead of uploads at the same position
    failed.sort_by_key(|f| f.position);
    failed
}

/// Where the raw analysis for `audio_path` is saved inside `dir`
pub fn saved_analysis_path(dir: &Path, audio_path: &Path) -> PathBuf {
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string());
    dir.join(format!("{}.analysis.json", stem))
}

/// Write a raw analysis next to its siblings in `dir`, atomically
pub fn save_analysis(dir: &Path, audio_path: &Path, analysis: &Value) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let target = saved_analysis_path(dir, audio_path);
    let source = audio_path.display().to_string();
    let saved = SavedAnalysis {
        source: &source,
        analyzed_at: Utc::now(),
        analysis,
    };

    let mut file = AtomicWriteFile::open(&target)
        .with_context(|| format!("Failed to open atomic write file at {}", target.display()))?;
    serde_json::to_writer_pretty(&mut file, &saved).context("Failed to serialize analysis")?;
    file.commit()
        .with_context(|| format!("Failed to save analysis to {}", target.display()))?;

    Ok(target)
}
