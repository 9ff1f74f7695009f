pub mod config;
pub mod engine;
pub mod extract;
pub mod metrics;
pub mod normalize;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, score, Fallback, MetricScore, ScoreBreakdown, ScoreResult};
pub use metrics::Metric;
pub use normalize::Rating;
pub use validation::validate_scoring;
