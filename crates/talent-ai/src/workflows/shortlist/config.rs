use serde::{Deserialize, Serialize};

use super::domain::{EntityKind, ResolvedShortlistOptions, ShortlistOptions};
use super::service::ShortlistError;

const MAX_SCORE: u8 = 100;

/// Defaults applied to options the caller leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistDefaults {
    pub min_score: u8,
    pub gig_max_candidates: usize,
    pub vacancy_max_candidates: usize,
}

impl Default for ShortlistDefaults {
    fn default() -> Self {
        Self {
            min_score: 70,
            gig_max_candidates: 8,
            vacancy_max_candidates: 20,
        }
    }
}

impl ShortlistDefaults {
    pub fn max_candidates_for(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Gig => self.gig_max_candidates,
            EntityKind::Vacancy => self.vacancy_max_candidates,
        }
    }
}

impl ShortlistOptions {
    pub fn resolve(
        &self,
        defaults: &ShortlistDefaults,
    ) -> Result<ResolvedShortlistOptions, ShortlistError> {
        let min_score = self.min_score.unwrap_or(defaults.min_score);
        if min_score > MAX_SCORE {
            return Err(ShortlistError::InvalidOptions(format!(
                "minScore must be between 0 and {MAX_SCORE}, got {min_score}"
            )));
        }

        Ok(ResolvedShortlistOptions {
            kind: self.kind,
            min_score,
            max_candidates: self
                .max_candidates
                .unwrap_or_else(|| defaults.max_candidates_for(self.kind)),
            include_only_highly_recommended: self.include_only_highly_recommended.unwrap_or(false),
            prioritize_budget_fit: self.prioritize_budget_fit.unwrap_or(false),
        })
    }
}
