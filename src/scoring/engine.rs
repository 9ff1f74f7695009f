use serde::Serialize;
use serde_json::{Map, Value};

use super::config::ScoringConfig;
use super::extract::RawMetrics;
use super::metrics::Metric;
use super::normalize::{direct_score, filler_score, sentiment_score, triangular_score, volume_score};

/// Score returned for anything that isn't a JSON object.
pub const NOT_A_RECORD_SCORE: u8 = 50;

/// Neutral score that thin evidence is pulled toward.
pub const BASELINE_SCORE: f64 = 60.0;

/// One metric's contribution to the final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub metric: Metric,
    /// Normalized sub-score, 0-100
    pub score: f64,
    pub weight: f64,
    /// The measurement behind a curve-based score (words/min, pauses/min,
    /// filler percentage). `None` for direct metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured: Option<f64>,
}

/// How the final number was reached when no metric contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Fallback {
    /// The input wasn't a JSON object
    NotARecord,
    /// No recognized metric; scored by how many top-level keys there were
    Structural { keys: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<MetricScore>,
    /// Weighted mean before blending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<f64>,
    /// Share of the baseline mixed in (0 when three or more metrics contributed)
    pub blend: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Communication score, 0-100
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Score an analysis result with the built-in engine profile.
pub fn score(analysis: &Value) -> u8 {
    calculate_score(analysis, &ScoringConfig::default()).score
}

/// Reduce an arbitrary analysis result to a 0-100 communication score.
///
/// Never fails: non-objects score 50, objects without any usable metric fall
/// back to a key-count heuristic.
pub fn calculate_score(analysis: &Value, config: &ScoringConfig) -> ScoreResult {
    let Some(record) = analysis.as_object() else {
        tracing::debug!("analysis is not an object, using fallback score");
        return fallback_result(NOT_A_RECORD_SCORE, Fallback::NotARecord);
    };

    let raw = RawMetrics::from_record(record);
    let contributions = normalize_all(&raw, config);
    let (sum, total_weight, count) = aggregate(&contributions);

    if total_weight <= 0.0 {
        return structural_fallback(record);
    }

    let weighted = settle(sum / total_weight);
    let blend = blend_factor(count);
    let blended = weighted - (weighted - BASELINE_SCORE) * blend;
    let score = settle(blended).round().clamp(0.0, 100.0) as u8;

    tracing::debug!(count, weighted, blend, score, "scored analysis");

    ScoreResult {
        score,
        breakdown: ScoreBreakdown {
            contributions,
            weighted: Some(weighted),
            blend,
            fallback: None,
        },
    }
}

/// Normalize every available metric, in aggregation order. Metrics with no
/// usable value or a zero weight are left out.
pub fn normalize_all(raw: &RawMetrics, config: &ScoringConfig) -> Vec<MetricScore> {
    let pace = config.pace_band();
    let pauses = config.pauses_band();
    let volume = config.volume_band();

    let direct = raw
        .direct
        .iter()
        .map(|(metric, value)| (*metric, direct_score(value), None));

    let derived = [
        (
            Metric::Pace,
            raw.words_per_minute
                .and_then(|wpm| triangular_score(wpm, pace.target, pace.tolerance)),
            raw.words_per_minute,
        ),
        (
            Metric::Volume,
            raw.volume
                .as_ref()
                .and_then(|v| volume_score(v, volume.target, volume.tolerance)),
            None,
        ),
        (
            Metric::Filler,
            raw.filler_rate.and_then(filler_score),
            raw.filler_rate.map(|rate| (rate * 100.0).clamp(0.0, 100.0)),
        ),
        (
            Metric::Pauses,
            raw.pauses_per_minute
                .and_then(|ppm| triangular_score(ppm, pauses.target, pauses.tolerance)),
            raw.pauses_per_minute,
        ),
        (
            Metric::Sentiment,
            raw.sentiment.as_ref().and_then(sentiment_score),
            None,
        ),
    ];

    direct
        .chain(derived)
        .filter_map(|(metric, score, measured)| {
            let score = score?;
            let weight = config.weight(metric);
            if weight <= 0.0 {
                return None;
            }
            tracing::trace!(?metric, score, weight, "metric contributes");
            Some(MetricScore {
                metric,
                score,
                weight,
                measured,
            })
        })
        .collect()
}

/// Fold contributions into `(weighted sum, total weight, count)`.
pub fn aggregate(contributions: &[MetricScore]) -> (f64, f64, usize) {
    contributions
        .iter()
        .fold((0.0, 0.0, 0), |(sum, total, count), c| {
            (sum + c.score * c.weight, total + c.weight, count + 1)
        })
}

/// Share of the baseline mixed into the weighted mean for `count` metrics.
pub fn blend_factor(count: usize) -> f64 {
    match count {
        1 => 0.6,
        2 => 0.3,
        _ => 0.0,
    }
}

fn structural_fallback(record: &Map<String, Value>) -> ScoreResult {
    let keys = record.len();
    let score = if keys > 3 {
        70
    } else if keys > 1 {
        60
    } else {
        50
    };
    tracing::debug!(keys, score, "no recognized metrics, using structural fallback");
    fallback_result(score, Fallback::Structural { keys })
}

fn fallback_result(score: u8, fallback: Fallback) -> ScoreResult {
    ScoreResult {
        score,
        breakdown: ScoreBreakdown {
            contributions: Vec::new(),
            weighted: None,
            blend: 0.0,
            fallback: Some(fallback),
        },
    }
}

/// Drop floating point noise so values like 84.49999999999999 round as 84.5.
fn settle(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{TargetBand, WeightsConfig};
    use serde_json::json;

    fn sub_score(result: &ScoreResult, metric: Metric) -> Option<f64> {
        result
            .breakdown
            .contributions
            .iter()
            .find(|c| c.metric == metric)
            .map(|c| c.score)
    }

    #[test]
    fn test_non_records_score_50() {
        for value in [
            json!(null),
            json!(42),
            json!(-1.5),
            json!("excellent"),
            json!(true),
            json!([{"clarity": 1}]),
            json!([]),
        ] {
            let result = calculate_score(&value, &ScoringConfig::default());
            assert_eq!(result.score, 50, "input {}", value);
            assert_eq!(result.breakdown.fallback, Some(Fallback::NotARecord));
        }
    }

    #[test]
    fn test_structural_fallback() {
        assert_eq!(score(&json!({})), 50);
        assert_eq!(score(&json!({"a": 1})), 50);
        assert_eq!(score(&json!({"a": 1, "b": 2})), 60);
        assert_eq!(score(&json!({"a": 1, "b": 2, "c": 3})), 60);
        assert_eq!(score(&json!({"a": 1, "b": 2, "c": 3, "d": 4})), 70);
    }

    #[test]
    fn test_structural_fallback_counts_unusable_metrics() {
        // Recognized keys whose values can't be normalized still only count as keys
        let result = calculate_score(
            &json!({"clarity": "superb", "wpm": "fast"}),
            &ScoringConfig::default(),
        );
        assert_eq!(result.score, 60);
        assert_eq!(
            result.breakdown.fallback,
            Some(Fallback::Structural { keys: 2 })
        );
    }

    #[test]
    fn test_two_ratings_blend_toward_baseline() {
        // 95 * 0.7 + 60 * 0.3 = 84.5 -> 85
        let result = calculate_score(
            &json!({"clarity": "excellent", "confidence": "excellent"}),
            &ScoringConfig::default(),
        );
        assert_eq!(result.score, 85);
        assert_eq!(result.breakdown.blend, 0.3);
        assert_eq!(result.breakdown.weighted, Some(95.0));
    }

    #[test]
    fn test_ideal_delivery_scores_100() {
        let result = calculate_score(
            &json!({"wordsPerMinute": 150, "pausesPerMinute": 6, "fillerWordRate": 0}),
            &ScoringConfig::default(),
        );
        assert_eq!(result.score, 100);
        assert_eq!(result.breakdown.blend, 0.0);
        assert_eq!(result.breakdown.contributions.len(), 3);
        let (_, total_weight, _) = aggregate(&result.breakdown.contributions);
        assert!((total_weight - 0.24).abs() < 1e-9);
    }

    #[test]
    fn test_single_metric_blend() {
        // 80 * 0.4 + 60 * 0.6 = 68
        let result = calculate_score(&json!({"clarity": 0.8}), &ScoringConfig::default());
        assert_eq!(result.score, 68);
        assert_eq!(result.breakdown.blend, 0.6);
    }

    #[test]
    fn test_scale_detection_gives_same_sub_score() {
        for raw in [json!(0.8), json!(4), json!(8)] {
            let result = calculate_score(&json!({ "clarity": raw }), &ScoringConfig::default());
            let clarity = sub_score(&result, Metric::Clarity).unwrap();
            assert!((clarity - 80.0).abs() < 1e-9, "raw {} gave {}", raw, clarity);
            assert_eq!(result.score, 68);
        }
    }

    #[test]
    fn test_pace_monotonic_and_never_negative() {
        let pace_of = |wpm: f64| {
            let result = calculate_score(&json!({ "wpm": wpm }), &ScoringConfig::default());
            sub_score(&result, Metric::Pace).unwrap()
        };
        assert_eq!(pace_of(150.0), 100.0);
        assert_eq!(pace_of(100.0), 0.0);
        assert_eq!(pace_of(200.0), 0.0);
        assert_eq!(pace_of(20.0), 0.0);
        assert_eq!(pace_of(500.0), 0.0);
        assert!(pace_of(140.0) > pace_of(130.0));
        assert!(pace_of(160.0) > pace_of(170.0));
    }

    #[test]
    fn test_unrecognized_rating_contributes_nothing() {
        let result = calculate_score(
            &json!({"clarity": "superb", "confidence": 0.9, "fluency": 9, "coherence": 90}),
            &ScoringConfig::default(),
        );
        assert!(sub_score(&result, Metric::Clarity).is_none());
        assert_eq!(result.breakdown.contributions.len(), 3);
        // All three contributors score 90 and no blending applies
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_missing_metrics_do_not_drag_score_down() {
        let full = score(&json!({
            "clarity": 0.9, "confidence": 0.9, "fluency": 0.9, "articulation": 0.9
        }));
        assert_eq!(full, 90);
    }

    #[test]
    fn test_nested_metrics_are_scored() {
        let result = calculate_score(
            &json!({
                "id": "abc",
                "metrics": {"clarity": "good", "wordCount": 450, "duration": 180, "fillerCount": 9}
            }),
            &ScoringConfig::default(),
        );
        // clarity 78, pace 100 (150 wpm), filler 2% -> 60
        assert_eq!(sub_score(&result, Metric::Clarity), Some(78.0));
        assert_eq!(sub_score(&result, Metric::Pace), Some(100.0));
        let filler = sub_score(&result, Metric::Filler).unwrap();
        assert!((filler - 60.0).abs() < 1e-9);
        // (78*.12 + 100*.12 + 60*.06) / .30 = 83.2
        assert_eq!(result.score, 83);
    }

    #[test]
    fn test_sentiment_default_for_unknown_word() {
        let result = calculate_score(&json!({"sentiment": "bittersweet"}), &ScoringConfig::default());
        assert_eq!(sub_score(&result, Metric::Sentiment), Some(60.0));
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_out_of_range_sentiment_capped_before_weighting() {
        let result = calculate_score(
            &json!({"sentiment": 3, "clarity": 0.5}),
            &ScoringConfig::default(),
        );
        assert_eq!(sub_score(&result, Metric::Sentiment), Some(100.0));
        // (50*.12 + 100*.10) / .22 = 72.7, blended 0.3 toward 60 = 68.9
        assert_eq!(result.score, 69);
    }

    #[test]
    fn test_zero_weight_disables_metric() {
        let config = ScoringConfig {
            weights: Some(WeightsConfig {
                sentiment: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = calculate_score(&json!({"sentiment": "positive", "a": 1}), &config);
        assert!(result.breakdown.contributions.is_empty());
        assert_eq!(result.breakdown.fallback, Some(Fallback::Structural { keys: 2 }));
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_custom_pace_band() {
        let config = ScoringConfig {
            pace: Some(TargetBand {
                target: 120.0,
                tolerance: 40.0,
            }),
            ..Default::default()
        };
        let result = calculate_score(&json!({"wpm": 120}), &config);
        assert_eq!(sub_score(&result, Metric::Pace), Some(100.0));
    }

    #[test]
    fn test_measured_values_recorded() {
        let result = calculate_score(
            &json!({"wpm": 180, "pauseRate": 4, "fillerRate": 0.01}),
            &ScoringConfig::default(),
        );
        let measured = |metric| {
            result
                .breakdown
                .contributions
                .iter()
                .find(|c| c.metric == metric)
                .and_then(|c| c.measured)
        };
        assert_eq!(measured(Metric::Pace), Some(180.0));
        assert_eq!(measured(Metric::Pauses), Some(4.0));
        assert!((measured(Metric::Filler).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_always_in_range() {
        let inputs = [
            json!({"clarity": 5000, "confidence": -40, "wpm": -3}),
            json!({"clarity": 1e300, "sentiment": -1e300}),
            json!({"volume": "1e400", "rms": true}),
            json!({"metrics": {"metrics": {"clarity": 1}}}),
            json!({"clarity": "poor", "confidence": "very poor", "fluency": 0, "wpm": 20}),
        ];
        for input in inputs {
            let s = score(&input);
            assert!(s <= 100, "input {} scored {}", input, s);
        }
    }

    #[test]
    fn test_idempotent() {
        let input = json!({
            "clarity": "very good", "wpm": 138, "volume": 0.55,
            "polarity": 0.2, "metrics": {"pauses_pm": 7}
        });
        let first = calculate_score(&input, &ScoringConfig::default());
        let second = calculate_score(&input, &ScoringConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_blend_factor() {
        assert_eq!(blend_factor(0), 0.0);
        assert_eq!(blend_factor(1), 0.6);
        assert_eq!(blend_factor(2), 0.3);
        assert_eq!(blend_factor(3), 0.0);
        assert_eq!(blend_factor(13), 0.0);
    }
}
