use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::config::ShortlistDefaults;
use super::domain::{EntityId, Shortlist, ShortlistOptions};
use super::ranking::rank_candidates;
use super::source::{ScoreSourceError, ScoringEngine};

/// Builds shortlists from the candidates an upstream [`ScoringEngine`] has scored.
pub struct ShortlistGenerator<S> {
    source: Arc<S>,
    defaults: ShortlistDefaults,
}

impl<S> ShortlistGenerator<S>
where
    S: ScoringEngine + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self::with_defaults(source, ShortlistDefaults::default())
    }

    pub fn with_defaults(source: Arc<S>, defaults: ShortlistDefaults) -> Self {
        Self { source, defaults }
    }

    pub fn defaults(&self) -> &ShortlistDefaults {
        &self.defaults
    }

    pub fn generate_shortlist(
        &self,
        entity_id: &EntityId,
        options: &ShortlistOptions,
    ) -> Result<Shortlist, ShortlistError> {
        self.generate_shortlist_at(entity_id, options, Utc::now())
    }

    /// Same as [`Self::generate_shortlist`] with an explicit generation timestamp.
    pub fn generate_shortlist_at(
        &self,
        entity_id: &EntityId,
        options: &ShortlistOptions,
        generated_at: DateTime<Utc>,
    ) -> Result<Shortlist, ShortlistError> {
        let resolved = options.resolve(&self.defaults)?;
        let scored = self.source.scored_candidates(entity_id)?;
        let scored_count = scored.len();

        let (candidates, total_candidates) = rank_candidates(scored, &resolved);
        debug!(
            %entity_id,
            scored = scored_count,
            qualified = total_candidates,
            "candidates ranked"
        );
        info!(
            %entity_id,
            kind = resolved.kind.label(),
            showing = candidates.len(),
            total = total_candidates,
            budget_fit = resolved.prioritize_budget_fit,
            "shortlist generated"
        );

        Ok(Shortlist {
            entity_id: entity_id.clone(),
            candidates,
            total_candidates,
            generated_at,
            options: resolved,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
    #[error("invalid shortlist options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Source(#[from] ScoreSourceError),
}
