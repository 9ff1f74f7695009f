use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use super::band::Band;
use crate::scoring::{Fallback, ScoreBreakdown, ScoreResult};
use crate::tips::{suggest, Tip};

/// Bar width when stdout isn't a terminal
const DEFAULT_BAR_WIDTH: usize = 30;
const MAX_BAR_WIDTH: usize = 50;

/// A scored input (JSON file, stdin or uploaded recording) for display
pub struct ScoredInput<'a> {
    pub source: &'a str,
    pub result: &'a ScoreResult,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn bar_width() -> usize {
    match get_terminal_width() {
        Some(width) if width > 30 => (width - 20).min(MAX_BAR_WIDTH),
        Some(_) => 10,
        None => DEFAULT_BAR_WIDTH,
    }
}

/// Render a score as a fixed-width bar, e.g. "[######----]"
pub fn format_progress_bar(score: u8, width: usize) -> String {
    let filled = (usize::from(score.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Format the headline line: "Score: 85/100  Excellent communication!"
pub fn format_score_line(score: u8, use_colors: bool) -> String {
    let band = Band::from_score(score);
    let number = format!("{}/100", score);
    if use_colors {
        let number = match band {
            Band::Excellent => number.green().bold().to_string(),
            Band::GoodProgress => number.yellow().bold().to_string(),
            Band::KeepPracticing => number.red().bold().to_string(),
        };
        format!("Score: {}  {}", number, band.message())
    } else {
        format!("Score: {}  {}", number, band.message())
    }
}

/// Per-metric breakdown, one line per contributing metric
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    if let Some(fallback) = breakdown.fallback {
        let note = match fallback {
            Fallback::NotARecord => "  No metrics: input is not a JSON object".to_string(),
            Fallback::Structural { keys } => format!(
                "  No recognized metrics: estimated from {} top-level field{}",
                keys,
                if keys == 1 { "" } else { "s" }
            ),
        };
        return if use_colors { note.dimmed().to_string() } else { note };
    }

    let mut lines: Vec<String> = breakdown
        .contributions
        .iter()
        .map(|c| {
            let measured = c
                .measured
                .map(|m| format!("  ({:.1})", m))
                .unwrap_or_default();
            let line = format!(
                "  {:<14}{:>5.0}  x{:.2}{}",
                c.metric.label(),
                c.score,
                c.weight,
                measured
            );
            if use_colors && c.score < 60.0 {
                line.red().to_string()
            } else {
                line
            }
        })
        .collect();

    if breakdown.blend > 0.0 {
        let note = format!(
            "  Few metrics available: blended {:.0}% toward neutral",
            breakdown.blend * 100.0
        );
        lines.push(if use_colors { note.dimmed().to_string() } else { note });
    }

    lines.join("\n")
}

fn format_tips(tips: &[Tip], use_colors: bool) -> String {
    tips.iter()
        .map(|tip| {
            if use_colors {
                format!("  {} {}", "*".cyan(), tip.text)
            } else {
                format!("  * {}", tip.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one scored input as a multi-line report.
/// The breakdown is only included in verbose mode.
pub fn format_report(scored: &ScoredInput, verbose: bool, use_colors: bool) -> String {
    let score = scored.result.score;
    let mut sections = Vec::new();

    let title = if use_colors {
        scored.source.bold().to_string()
    } else {
        scored.source.to_string()
    };
    sections.push(title);
    sections.push(format_score_line(score, use_colors));
    sections.push(format_progress_bar(score, bar_width()));

    if verbose {
        sections.push(format_breakdown(&scored.result.breakdown, use_colors));
    }

    let tips = suggest(scored.result);
    if !tips.is_empty() {
        sections.push("Tips:".to_string());
        sections.push(format_tips(&tips, use_colors));
    }

    sections.join("\n")
}

/// Format several reports separated by blank lines
pub fn format_reports(inputs: &[ScoredInput], verbose: bool, use_colors: bool) -> String {
    if inputs.is_empty() {
        return "No results.".to_string();
    }

    inputs
        .iter()
        .map(|scored| format_report(scored, verbose, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format results as tab-separated values for scripting
/// Columns: score, band, source (no headers, no colors)
pub fn format_tsv(inputs: &[ScoredInput]) -> String {
    inputs
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}",
                scored.result.score,
                Band::from_score(scored.result.score).as_str(),
                scored.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    score: u8,
    band: Band,
    breakdown: &'a ScoreBreakdown,
    tips: Vec<Tip>,
}

/// Format results as a pretty-printed JSON array
pub fn format_json(inputs: &[ScoredInput]) -> anyhow::Result<String> {
    let reports: Vec<JsonReport> = inputs
        .iter()
        .map(|scored| JsonReport {
            source: scored.source,
            score: scored.result.score,
            band: Band::from_score(scored.result.score),
            breakdown: &scored.result.breakdown,
            tips: suggest(scored.result),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}
