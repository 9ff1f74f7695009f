use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scoring::{validate_scoring, ScoringConfig};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRIES: usize = 3;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// URL of the speech analysis service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Request timeout, e.g. "30s" or "2m"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Extra attempts for transient upload failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Request timeout; an unparseable value falls back to the default
    /// (`validate_config` reports it at startup).
    pub fn timeout(&self) -> Duration {
        self.timeout
            .as_deref()
            .and_then(|t| humantime::parse_duration(t.trim()).ok())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn retries(&self) -> usize {
        self.retries.unwrap_or(DEFAULT_RETRIES)
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}

/// Validate the whole config file at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref endpoint) = config.endpoint {
        if let Err(e) = validate_endpoint(endpoint) {
            errors.push(format!("endpoint: {}", e));
        }
    }

    if let Some(ref timeout) = config.timeout {
        match humantime::parse_duration(timeout.trim()) {
            Ok(d) if d.is_zero() => errors.push("timeout: must be greater than zero".to_string()),
            Ok(_) => {}
            Err(e) => errors.push(format!("timeout: invalid duration '{}' - {}", timeout, e)),
        }
    }

    if let Some(ref scoring) = config.scoring {
        if let Err(scoring_errors) = validate_scoring(scoring) {
            errors.extend(scoring_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The endpoint must be an absolute http(s) URL
pub fn validate_endpoint(endpoint: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(endpoint.trim())
        .map_err(|e| format!("invalid URL '{}' - {}", endpoint, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}', use http or https", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::TargetBand;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.retries(), DEFAULT_RETRIES);
        assert_eq!(config.scoring(), ScoringConfig::default());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
endpoint: "https://speech.example.com/v1/analyze"
timeout: "2m"
retries: 1
scoring:
  weights:
    pace: 0.2
  pauses:
    target: 8
    tolerance: 4
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://speech.example.com/v1/analyze")
        );
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.retries(), 1);
        assert_eq!(
            config.scoring().pauses_band(),
            TargetBand {
                target: 8.0,
                tolerance: 4.0
            }
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("https://speech.example.com/analyze").is_ok());
        assert!(validate_endpoint("http://localhost:8080/analyze").is_ok());
        assert!(validate_endpoint("ftp://speech.example.com").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            endpoint: Some("nope".to_string()),
            timeout: Some("soon".to_string()),
            retries: None,
            scoring: Some(ScoringConfig {
                pace: Some(TargetBand {
                    target: 150.0,
                    tolerance: 0.0,
                }),
                ..Default::default()
            }),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("endpoint"));
        assert!(errors[1].starts_with("timeout"));
        assert!(errors[2].starts_with("scoring.pace"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            timeout: Some("0s".to_string()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            endpoint: Some("https://speech.example.com/analyze".to_string()),
            timeout: Some("45s".to_string()),
            retries: Some(2),
            scoring: None,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
