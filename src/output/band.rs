use serde::Serialize;

/// Qualitative band a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    GoodProgress,
    KeepPracticing,
}

impl Band {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Band::Excellent
        } else if score >= 60 {
            Band::GoodProgress
        } else {
            Band::KeepPracticing
        }
    }

    /// Short name used in TSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            Band::Excellent => "excellent",
            Band::GoodProgress => "good progress",
            Band::KeepPracticing => "keep practicing",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent communication!",
            Band::GoodProgress => "Good progress, keep it up.",
            Band::KeepPracticing => "Keep practicing, you're getting there.",
        }
    }
}
