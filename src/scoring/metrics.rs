use serde::{Deserialize, Serialize};

/// A metric the engine knows how to score.
///
/// The first eight are "direct" metrics: sub-scores the analysis service
/// already reports on some 0-1 / 1-5 / 1-10 / 0-100 scale. The rest are
/// derived from measurements (pace, pauses, volume, filler words, sentiment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Clarity,
    Confidence,
    Fluency,
    Articulation,
    Coherence,
    Engagement,
    Pronunciation,
    Intonation,
    Pace,
    Volume,
    Filler,
    Pauses,
    Sentiment,
}

/// Direct metrics, in the order they are looked up and aggregated.
pub const DIRECT_METRICS: [Metric; 8] = [
    Metric::Clarity,
    Metric::Confidence,
    Metric::Articulation,
    Metric::Fluency,
    Metric::Coherence,
    Metric::Engagement,
    Metric::Pronunciation,
    Metric::Intonation,
];

/// Every scored metric, in aggregation order.
pub const ALL_METRICS: [Metric; 13] = [
    Metric::Clarity,
    Metric::Confidence,
    Metric::Articulation,
    Metric::Fluency,
    Metric::Coherence,
    Metric::Engagement,
    Metric::Pronunciation,
    Metric::Intonation,
    Metric::Pace,
    Metric::Volume,
    Metric::Filler,
    Metric::Pauses,
    Metric::Sentiment,
];

pub const WORD_COUNT_KEYS: &[&str] = &["wordCount", "words"];
pub const DURATION_KEYS: &[&str] = &["duration", "durationSec", "seconds"];
pub const WPM_KEYS: &[&str] = &["wordsPerMinute", "wpm", "paceWpm", "speech_rate", "rate"];
pub const FILLER_RATE_KEYS: &[&str] = &["fillerWordRate", "fillerRate"];
pub const FILLER_COUNT_KEYS: &[&str] = &["fillerWordCount", "fillerCount", "umUhCount"];
pub const PAUSES_KEYS: &[&str] = &["pausesPerMinute", "pauseRate", "pauses_pm"];
pub const VOLUME_KEYS: &[&str] = &["volume", "loudness", "rms"];
pub const SENTIMENT_KEYS: &[&str] = &["sentiment", "polarity"];

impl Metric {
    /// Built-in weight in the final weighted average.
    pub fn default_weight(self) -> f64 {
        match self {
            Metric::Clarity => 0.12,
            Metric::Confidence => 0.12,
            Metric::Fluency => 0.10,
            Metric::Articulation => 0.08,
            Metric::Coherence => 0.08,
            Metric::Engagement => 0.06,
            Metric::Pronunciation => 0.08,
            Metric::Intonation => 0.06,
            Metric::Pace => 0.12,
            Metric::Volume => 0.06,
            Metric::Filler => 0.06,
            Metric::Pauses => 0.06,
            Metric::Sentiment => 0.10,
        }
    }

    /// Record key a direct metric is reported under. `None` for derived metrics.
    pub fn direct_key(self) -> Option<&'static str> {
        match self {
            Metric::Clarity => Some("clarity"),
            Metric::Confidence => Some("confidence"),
            Metric::Fluency => Some("fluency"),
            Metric::Articulation => Some("articulation"),
            Metric::Coherence => Some("coherence"),
            Metric::Engagement => Some("engagement"),
            Metric::Pronunciation => Some("pronunciation"),
            Metric::Intonation => Some("intonation"),
            _ => None,
        }
    }

    /// Name used for this metric in config files and JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Pace => "pace",
            Metric::Volume => "volume",
            Metric::Filler => "filler",
            Metric::Pauses => "pauses",
            Metric::Sentiment => "sentiment",
            direct => direct.direct_key().unwrap_or("unknown"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Clarity => "Clarity",
            Metric::Confidence => "Confidence",
            Metric::Fluency => "Fluency",
            Metric::Articulation => "Articulation",
            Metric::Coherence => "Coherence",
            Metric::Engagement => "Engagement",
            Metric::Pronunciation => "Pronunciation",
            Metric::Intonation => "Intonation",
            Metric::Pace => "Pace",
            Metric::Volume => "Volume",
            Metric::Filler => "Filler words",
            Metric::Pauses => "Pauses",
            Metric::Sentiment => "Sentiment",
        }
    }
}
