pub mod init;
mod schema;

pub use schema::{validate_config, validate_endpoint, Config, DEFAULT_RETRIES, DEFAULT_TIMEOUT};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured endpoint
pub const ENV_ENDPOINT_VAR: &str = "TALKSCORE_ENDPOINT";

/// Get the config directory path (~/.config/talkscore/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("talkscore")
}

/// Get the default config file path (~/.config/talkscore/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path,
///   and a missing default file just means built-in defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Save configuration as YAML, atomically
///
/// Creates parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Pick the analysis endpoint: command-line flag, then TALKSCORE_ENDPOINT,
/// then the config file.
pub fn resolve_endpoint(flag: Option<&str>, config: &Config) -> Option<String> {
    let from_env = std::env::var(ENV_ENDPOINT_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    flag.map(str::to_string)
        .or(from_env)
        .or_else(|| config.endpoint.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_missing_explicit_config_is_error() {
        let path = env::temp_dir().join("talkscore_test_missing_config.yaml");
        let _ = fs::remove_file(&path);
        assert!(load_config(Some(path)).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = env::temp_dir()
            .join("talkscore_test_config_dir")
            .join("config.yaml");
        let _ = fs::remove_file(&path);

        let config = Config {
            endpoint: Some("https://speech.example.com/analyze".to_string()),
            timeout: Some("10s".to_string()),
            retries: Some(5),
            scoring: None,
        };
        save_config(&path, &config).unwrap();

        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let path = env::temp_dir().join("talkscore_test_invalid_config.yaml");
        fs::write(&path, "endpoint: [unclosed\n").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_resolve_endpoint_flag_wins() {
        let config = Config {
            endpoint: Some("https://file.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_endpoint(Some("https://flag.example.com"), &config).as_deref(),
            Some("https://flag.example.com")
        );
    }
}
