use super::config::{ScoringConfig, TargetBand};
use super::metrics::ALL_METRICS;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref weights) = config.weights {
        for metric in ALL_METRICS {
            if let Some(weight) = weights.get(metric) {
                if !weight.is_finite() || weight < 0.0 {
                    errors.push(format!(
                        "scoring.weights.{}: must be a non-negative number, got {}",
                        metric.key(),
                        weight
                    ));
                }
            }
        }
    }

    for (name, band) in [
        ("pace", config.pace),
        ("pauses", config.pauses),
        ("volume", config.volume),
    ] {
        if let Some(band) = band {
            validate_band(name, &band, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_band(name: &str, band: &TargetBand, errors: &mut Vec<String>) {
    if !band.target.is_finite() {
        errors.push(format!("scoring.{}.target: must be a finite number", name));
    }
    if !band.tolerance.is_finite() || band.tolerance <= 0.0 {
        errors.push(format!(
            "scoring.{}.tolerance: must be greater than zero, got {}",
            name, band.tolerance
        ));
    }
}
