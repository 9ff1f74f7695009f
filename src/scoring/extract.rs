//! Alias resolution over untrusted analysis output.
//!
//! This is the only place that cares about the shape of the incoming JSON.
//! Everything downstream works on [`RawMetrics`].

use serde_json::{Map, Value};

use super::metrics::{
    Metric, DIRECT_METRICS, DURATION_KEYS, FILLER_COUNT_KEYS, FILLER_RATE_KEYS, PAUSES_KEYS,
    SENTIMENT_KEYS, VOLUME_KEYS, WORD_COUNT_KEYS, WPM_KEYS,
};

/// Per-record lookup table built from a MetricRecord.
///
/// Direct metrics, volume and sentiment keep their raw JSON value since their
/// normalization depends on the value's type. Quantitative fields are already
/// reduced to finite numbers, with derived values filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetrics {
    pub direct: Vec<(Metric, Value)>,
    pub words_per_minute: Option<f64>,
    pub filler_rate: Option<f64>,
    pub pauses_per_minute: Option<f64>,
    pub volume: Option<Value>,
    pub sentiment: Option<Value>,
}

impl RawMetrics {
    /// Resolve every recognized metric in `record`.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let direct = DIRECT_METRICS
            .iter()
            .filter_map(|metric| {
                let key = metric.direct_key()?;
                lookup(record, &[key]).map(|v| (*metric, v.clone()))
            })
            .collect();

        let word_count = lookup_number(record, WORD_COUNT_KEYS);
        let duration = lookup_number(record, DURATION_KEYS);

        let words_per_minute = lookup_number(record, WPM_KEYS).or_else(|| match (word_count, duration) {
            (Some(words), Some(secs)) if secs > 0.0 => Some(words / secs * 60.0),
            _ => None,
        });

        let filler_rate = lookup_number(record, FILLER_RATE_KEYS).or_else(|| {
            let fillers = lookup_number(record, FILLER_COUNT_KEYS)?;
            match word_count {
                Some(words) if words > 0.0 => Some(fillers / words),
                _ => None,
            }
        });

        Self {
            direct,
            words_per_minute,
            filler_rate,
            pauses_per_minute: lookup_number(record, PAUSES_KEYS),
            volume: lookup(record, VOLUME_KEYS).cloned(),
            sentiment: lookup(record, SENTIMENT_KEYS).cloned(),
        }
    }

    /// True when no recognized key was found at all.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
            && self.words_per_minute.is_none()
            && self.filler_rate.is_none()
            && self.pauses_per_minute.is_none()
            && self.volume.is_none()
            && self.sentiment.is_none()
    }
}

/// First non-null value among `aliases`. Each alias is tried at the top level
/// and then inside the nested `metrics` object before moving to the next one.
pub fn lookup<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    let nested = record.get("metrics").and_then(Value::as_object);

    aliases.iter().find_map(|key| {
        present(record.get(*key)).or_else(|| nested.and_then(|m| present(m.get(*key))))
    })
}

/// Like [`lookup`], but only accepts a finite JSON number.
fn lookup_number(record: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    lookup(record, aliases)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawMetrics {
        RawMetrics::from_record(value.as_object().unwrap())
    }

    #[test]
    fn test_empty_record() {
        let metrics = raw(json!({}));
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let metrics = raw(json!({"a": 1, "b": "two", "transcript": "hello"}));
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_direct_metrics_keep_raw_value() {
        let metrics = raw(json!({"clarity": "good", "fluency": 7}));
        assert_eq!(
            metrics.direct,
            vec![(Metric::Clarity, json!("good")), (Metric::Fluency, json!(7))]
        );
    }

    #[test]
    fn test_nested_metrics_fallback() {
        let metrics = raw(json!({"metrics": {"clarity": 0.9, "wpm": 140}}));
        assert_eq!(metrics.direct, vec![(Metric::Clarity, json!(0.9))]);
        assert_eq!(metrics.words_per_minute, Some(140.0));
    }

    #[test]
    fn test_top_level_wins_over_nested() {
        let metrics = raw(json!({"clarity": 0.5, "metrics": {"clarity": 0.9}}));
        assert_eq!(metrics.direct, vec![(Metric::Clarity, json!(0.5))]);
    }

    #[test]
    fn test_alias_order_checks_nested_before_next_alias() {
        // "wordsPerMinute" inside metrics beats the lower-priority "wpm" at top level
        let metrics = raw(json!({"wpm": 100, "metrics": {"wordsPerMinute": 150}}));
        assert_eq!(metrics.words_per_minute, Some(150.0));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let metrics = raw(json!({"wordsPerMinute": null, "wpm": 120}));
        assert_eq!(metrics.words_per_minute, Some(120.0));
    }

    #[test]
    fn test_wpm_derived_from_words_and_duration() {
        let metrics = raw(json!({"words": 300, "durationSec": 120}));
        assert_eq!(metrics.words_per_minute, Some(150.0));
    }

    #[test]
    fn test_wpm_not_derived_from_zero_duration() {
        let metrics = raw(json!({"wordCount": 300, "duration": 0}));
        assert_eq!(metrics.words_per_minute, None);
    }

    #[test]
    fn test_wpm_string_falls_back_to_derivation() {
        let metrics = raw(json!({"wpm": "fast", "wordCount": 100, "seconds": 60}));
        assert_eq!(metrics.words_per_minute, Some(100.0));
    }

    #[test]
    fn test_filler_rate_direct() {
        let metrics = raw(json!({"fillerRate": 0.02}));
        assert_eq!(metrics.filler_rate, Some(0.02));
    }

    #[test]
    fn test_filler_rate_derived_from_count() {
        let metrics = raw(json!({"umUhCount": 5, "wordCount": 200}));
        assert_eq!(metrics.filler_rate, Some(0.025));
    }

    #[test]
    fn test_filler_rate_needs_word_count() {
        let metrics = raw(json!({"fillerCount": 5}));
        assert_eq!(metrics.filler_rate, None);

        let metrics = raw(json!({"fillerCount": 5, "wordCount": 0}));
        assert_eq!(metrics.filler_rate, None);
    }

    #[test]
    fn test_volume_and_sentiment_any_type() {
        let metrics = raw(json!({"loudness": "high", "polarity": -0.5}));
        assert_eq!(metrics.volume, Some(json!("high")));
        assert_eq!(metrics.sentiment, Some(json!(-0.5)));
    }

    #[test]
    fn test_metrics_key_that_is_not_an_object() {
        let metrics = raw(json!({"metrics": [1, 2, 3]}));
        assert!(metrics.is_empty());
    }
}
