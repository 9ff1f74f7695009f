pub mod band;
pub mod formatter;

pub use band::Band;
pub use formatter::{
    format_breakdown, format_json, format_progress_bar, format_report, format_reports,
    format_score_line, format_tsv, should_use_colors, ScoredInput,
};
