//! Recruiting automation: workspace rules that turn scored candidates into action
//! decisions, and shortlists ranked from upstream scores.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
