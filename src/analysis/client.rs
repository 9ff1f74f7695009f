use anyhow::{Context, Result};
use std::time::Duration;

/// Environment variable holding the analysis service API key
pub const ENV_API_KEY_VAR: &str = "TALKSCORE_API_KEY";

/// Check for an API key in the TALKSCORE_API_KEY environment variable.
/// Returns Some(key) if the env var is set and non-empty, None otherwise.
pub fn get_api_key_from_env() -> Option<String> {
    match std::env::var(ENV_API_KEY_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Create the HTTP client used for uploads
pub fn create_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("talkscore/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}
