pub mod cache;
pub mod client;
pub mod error;
pub mod upload;

pub use cache::CacheConfig;
pub use client::{create_client, get_api_key_from_env};
pub use error::AnalysisError;
pub use upload::upload_audio;

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

/// Where and how to send recordings for analysis
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub retries: usize,
}

/// Analyze one recording: serve it from the cache when possible, otherwise
/// upload it and cache the response.
///
/// Upload failures are returned as [`AnalysisError`] inside the anyhow error
/// so callers can downcast to pick an exit code.
pub async fn analyze_file(
    client: &reqwest::Client,
    settings: &AnalysisSettings,
    cache_config: &CacheConfig,
    cache_path: &Path,
    path: &Path,
) -> Result<Value> {
    let audio = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read audio file {}", path.display()))?;

    let key = cache::cache_key(&settings.endpoint, &audio);
    if cache_config.enabled {
        if let Some(cached) = cache::read_cached(cache_path, &key) {
            tracing::info!(file = %path.display(), "using cached analysis");
            return Ok(cached);
        }
    }

    let started = Instant::now();
    let analysis = upload_audio(
        client,
        &settings.endpoint,
        settings.api_key.as_deref(),
        path,
        &audio,
        settings.retries,
    )
    .await?;
    tracing::info!(
        file = %path.display(),
        bytes = audio.len(),
        elapsed = ?started.elapsed(),
        "analysis received"
    );

    if cache_config.enabled {
        if let Err(e) = cache::write_cached(cache_path, &key, &analysis) {
            tracing::warn!(error = %e, "failed to cache analysis");
        }
    }

    Ok(analysis)
}
