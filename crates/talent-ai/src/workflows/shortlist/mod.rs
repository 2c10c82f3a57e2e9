//! Shortlist generation: filter, order, and cap the candidates the scoring step has
//! already scored for a gig or vacancy.
//!
//! Scores are read through a [`ScoringEngine`]; nothing here writes them back.

pub mod config;
pub mod domain;
pub mod export;
pub mod ranking;
pub mod router;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use config::ShortlistDefaults;
pub use domain::{
    CandidateId, EntityId, EntityKind, Recommendation, ResolvedShortlistOptions,
    ScoredCandidate, Shortlist, ShortlistOptions, ShortlistSummary,
};
pub use export::ScoreExport;
pub use ranking::{budget_fit_order, default_order, rank_candidates};
pub use router::shortlist_router;
pub use service::{ShortlistError, ShortlistGenerator};
pub use source::{ScoreSourceError, ScoringEngine};
