use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Configuration for analysis response caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
}

/// Get the platform-appropriate cache directory for talkscore
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("talkscore/analysis-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/talkscore/analysis-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the analysis cache directory
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Cache key for an upload: the same audio sent to a different endpoint is a
/// different analysis.
pub fn cache_key(endpoint: &str, audio: &[u8]) -> String {
    let digest = Sha256::digest(audio);
    format!("analysis:{}:{:x}", endpoint, digest)
}

/// Read a cached analysis. Missing or corrupt entries are treated as a miss.
pub fn read_cached(cache_path: &Path, key: &str) -> Option<Value> {
    let bytes = cacache::read_sync(cache_path, key).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Store an analysis response
pub fn write_cached(cache_path: &Path, key: &str, analysis: &Value) -> Result<()> {
    let json = serde_json::to_vec(analysis)?;
    cacache::write_sync(cache_path, key, &json).context("Failed to write analysis cache")?;
    Ok(())
}
