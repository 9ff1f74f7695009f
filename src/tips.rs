use serde::Serialize;

use crate::scoring::{Metric, MetricScore, ScoreResult};

/// Sub-scores below this get a tip.
const TIP_THRESHOLD: f64 = 60.0;
const MAX_TIPS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    /// `None` for general advice not tied to one metric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    pub text: String,
}

/// Canned improvement tips for a scored analysis, most important first.
pub fn suggest(result: &ScoreResult) -> Vec<Tip> {
    let contributions = &result.breakdown.contributions;

    if contributions.is_empty() {
        return vec![Tip {
            metric: None,
            text: "We couldn't find usable speech metrics. Try a longer recording in a quiet room."
                .to_string(),
        }];
    }

    let mut weak: Vec<&MetricScore> = contributions
        .iter()
        .filter(|c| c.score < TIP_THRESHOLD)
        .collect();
    // Heavier metrics first, then the lower score
    weak.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
    });

    let tips: Vec<Tip> = weak
        .into_iter()
        .take(MAX_TIPS)
        .map(|c| Tip {
            metric: Some(c.metric),
            text: tip_text(c).to_string(),
        })
        .collect();

    if tips.is_empty() && result.score >= 80 {
        return vec![Tip {
            metric: None,
            text: "Great delivery. Try a more challenging topic next time.".to_string(),
        }];
    }

    tips
}

fn tip_text(contribution: &MetricScore) -> &'static str {
    match contribution.metric {
        Metric::Clarity => "Finish each word before starting the next; avoid trailing off at the end of sentences.",
        Metric::Confidence => "Keep your voice steady and avoid rising intonation on statements.",
        Metric::Fluency => "Rehearse the transitions between your main points so you don't stall.",
        Metric::Articulation => "Open your mouth a little wider and hit consonants cleanly.",
        Metric::Coherence => "Outline three main points and signpost them as you go.",
        Metric::Engagement => "Ask a question or tell a short story to draw listeners in.",
        Metric::Pronunciation => "Slow down on difficult words and practice them in isolation.",
        Metric::Intonation => "Vary your pitch to stress key words instead of speaking in a monotone.",
        Metric::Pace => match contribution.measured {
            Some(wpm) if wpm > 150.0 => "You're speaking quickly. Aim for about 150 words per minute.",
            _ => "You're speaking slowly. Pick up the pace toward about 150 words per minute.",
        },
        Metric::Pauses => match contribution.measured {
            Some(ppm) if ppm > 6.0 => "You pause often. Try linking related phrases into one breath.",
            _ => "Add short pauses after key points to let them land.",
        },
        Metric::Filler => "Replace \"um\" and \"uh\" with a silent pause.",
        Metric::Volume => "Project your voice so you're clearly heard without shouting.",
        Metric::Sentiment => "Frame your message positively and show enthusiasm for the topic.",
    }
}
