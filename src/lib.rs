pub mod analysis;
pub mod config;
pub mod fetch;
pub mod input;
pub mod output;
pub mod scoring;
pub mod tips;
