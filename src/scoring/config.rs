use serde::{Deserialize, Serialize};

use super::metrics::Metric;

pub const DEFAULT_PACE: TargetBand = TargetBand {
    target: 150.0,
    tolerance: 50.0,
};
pub const DEFAULT_PAUSES: TargetBand = TargetBand {
    target: 6.0,
    tolerance: 5.0,
};
pub const DEFAULT_VOLUME: TargetBand = TargetBand {
    target: 60.0,
    tolerance: 25.0,
};

/// Scoring overrides.
///
/// Every field is optional; anything left out uses the built-in engine
/// profile. Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     clarity: 0.2
///     sentiment: 0
///   pace: { target: 140, tolerance: 40 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Per-metric weight overrides. A weight of 0 disables the metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightsConfig>,

    /// Ideal speaking rate in words per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<TargetBand>,

    /// Ideal number of pauses per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pauses: Option<TargetBand>,

    /// Ideal loudness, used when volume isn't reported on a known scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<TargetBand>,
}

/// Target value and the distance from it at which a triangular score hits 0.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TargetBand {
    pub target: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articulation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coherence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intonation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pauses: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

impl WeightsConfig {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Clarity => self.clarity,
            Metric::Confidence => self.confidence,
            Metric::Fluency => self.fluency,
            Metric::Articulation => self.articulation,
            Metric::Coherence => self.coherence,
            Metric::Engagement => self.engagement,
            Metric::Pronunciation => self.pronunciation,
            Metric::Intonation => self.intonation,
            Metric::Pace => self.pace,
            Metric::Volume => self.volume,
            Metric::Filler => self.filler,
            Metric::Pauses => self.pauses,
            Metric::Sentiment => self.sentiment,
        }
    }
}

impl ScoringConfig {
    /// Effective weight for `metric`: the override if set, else the default.
    pub fn weight(&self, metric: Metric) -> f64 {
        self.weights
            .as_ref()
            .and_then(|w| w.get(metric))
            .unwrap_or_else(|| metric.default_weight())
    }

    pub fn pace_band(&self) -> TargetBand {
        self.pace.unwrap_or(DEFAULT_PACE)
    }

    pub fn pauses_band(&self) -> TargetBand {
        self.pauses.unwrap_or(DEFAULT_PAUSES)
    }

    pub fn volume_band(&self) -> TargetBand {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }
}
