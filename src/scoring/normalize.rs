use serde_json::Value;

/// Closed vocabulary of qualitative ratings the analysis service may return
/// instead of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
    VeryPoor,
    High,
    Medium,
    Low,
    Positive,
    Neutral,
    Negative,
}

impl Rating {
    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Some(Rating::Excellent),
            "very good" => Some(Rating::VeryGood),
            "good" => Some(Rating::Good),
            "fair" => Some(Rating::Fair),
            "poor" => Some(Rating::Poor),
            "very poor" => Some(Rating::VeryPoor),
            "high" => Some(Rating::High),
            "medium" => Some(Rating::Medium),
            "low" => Some(Rating::Low),
            "positive" => Some(Rating::Positive),
            "neutral" => Some(Rating::Neutral),
            "negative" => Some(Rating::Negative),
            _ => None,
        }
    }

    pub fn score(self) -> f64 {
        match self {
            Rating::Excellent => 95.0,
            Rating::VeryGood => 88.0,
            Rating::Good => 78.0,
            Rating::Fair => 65.0,
            Rating::Poor => 45.0,
            Rating::VeryPoor => 25.0,
            Rating::High => 85.0,
            Rating::Medium => 65.0,
            Rating::Low => 45.0,
            Rating::Positive => 80.0,
            Rating::Neutral => 60.0,
            Rating::Negative => 40.0,
        }
    }
}

/// Sentiment string that isn't in the vocabulary.
const UNKNOWN_SENTIMENT_SCORE: f64 = 60.0;

/// Normalize a direct metric to 0-100.
///
/// Strings go through the rating vocabulary. Numbers have their scale guessed
/// from their magnitude: `<=1` is a fraction, `(1,5]` a five-point scale,
/// `(5,10]` a ten-point scale, anything larger is taken as already 0-100.
pub fn direct_score(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Rating::parse(s).map(Rating::score),
        Value::Number(n) => n.as_f64().and_then(scale_to_percent),
        _ => None,
    }
}

fn scale_to_percent(v: f64) -> Option<f64> {
    if !v.is_finite() {
        return None;
    }
    let scaled = if v <= 1.0 {
        v * 100.0
    } else if v <= 5.0 {
        v / 5.0 * 100.0
    } else if v <= 10.0 {
        v / 10.0 * 100.0
    } else {
        v
    };
    Some(scaled.clamp(0.0, 100.0))
}

/// Peaks at 100 when `value == target`, falls linearly to 0 at `tolerance`
/// away from it. Rounded to a whole point.
pub fn triangular_score(value: f64, target: f64, tolerance: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    if tolerance <= 0.0 {
        return Some(if value == target { 100.0 } else { 0.0 });
    }
    let closeness = (1.0 - (value - target).abs() / tolerance).clamp(0.0, 1.0);
    Some((closeness * 100.0).round())
}

/// Volume: a direct score when the value reads as one, otherwise the
/// triangular curve over whatever number the value coerces to.
pub fn volume_score(value: &Value, target: f64, tolerance: f64) -> Option<f64> {
    direct_score(value).or_else(|| coerce_number(value).and_then(|v| triangular_score(v, target, tolerance)))
}

/// 0% fillers scores 100, 5% or more scores 0.
pub fn filler_score(rate: f64) -> Option<f64> {
    if !rate.is_finite() {
        return None;
    }
    let pct = (rate * 100.0).clamp(0.0, 100.0);
    Some((100.0 - pct / 5.0 * 100.0).clamp(0.0, 100.0))
}

/// Strings use the rating vocabulary (unknown words count as neutral),
/// numbers are read as polarity in [-1, 1].
pub fn sentiment_score(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(Rating::parse(s).map_or(UNKNOWN_SENTIMENT_SCORE, Rating::score)),
        Value::Number(n) => n
            .as_f64()
            .filter(|s| s.is_finite())
            .map(|s| ((s + 1.0) / 2.0 * 100.0).clamp(0.0, 100.0)),
        _ => None,
    }
}

/// Lenient numeric reading used only by the volume fallback.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}
