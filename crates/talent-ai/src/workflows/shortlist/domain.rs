use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for scored candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Vacancy or gig the candidates were scored against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categorical bucket assigned by the scoring step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    Neutral,
    NotRecommended,
}

impl Recommendation {
    /// Tie-break weight, higher is better.
    pub const fn rank(self) -> u8 {
        match self {
            Recommendation::HighlyRecommended => 4,
            Recommendation::Recommended => 3,
            Recommendation::Neutral => 2,
            Recommendation::NotRecommended => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "HIGHLY_RECOMMENDED",
            Recommendation::Recommended => "RECOMMENDED",
            Recommendation::Neutral => "NEUTRAL",
            Recommendation::NotRecommended => "NOT_RECOMMENDED",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        [
            Recommendation::HighlyRecommended,
            Recommendation::Recommended,
            Recommendation::Neutral,
            Recommendation::NotRecommended,
        ]
        .into_iter()
        .find(|recommendation| recommendation.label() == normalized)
    }
}

/// Candidate record as persisted by the scoring step. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub id: CandidateId,
    pub composite_score: Option<u8>,
    pub price_score: Option<u8>,
    pub delivery_score: Option<u8>,
    pub skills_match_score: Option<u8>,
    pub experience_score: Option<u8>,
    pub recommendation: Option<Recommendation>,
    #[serde(default)]
    pub ranking_analysis: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub ranked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Shape of the entity being staffed; picks the default shortlist size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Gig,
    #[default]
    Vacancy,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Gig => "gig",
            EntityKind::Vacancy => "vacancy",
        }
    }
}

/// Caller-supplied shortlist options; unset values fall back to configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistOptions {
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default)]
    pub min_score: Option<u8>,
    #[serde(default)]
    pub max_candidates: Option<usize>,
    #[serde(default)]
    pub include_only_highly_recommended: Option<bool>,
    #[serde(default)]
    pub prioritize_budget_fit: Option<bool>,
}

/// Options after defaults are applied; echoed back on the shortlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedShortlistOptions {
    pub kind: EntityKind,
    pub min_score: u8,
    pub max_candidates: usize,
    pub include_only_highly_recommended: bool,
    pub prioritize_budget_fit: bool,
}

/// Ranked, size-capped view of an entity's candidates. Recomputable, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortlist {
    pub entity_id: EntityId,
    pub candidates: Vec<ScoredCandidate>,
    /// Qualifying candidates before truncation.
    pub total_candidates: usize,
    pub generated_at: DateTime<Utc>,
    pub options: ResolvedShortlistOptions,
}

impl Shortlist {
    pub fn summary(&self) -> ShortlistSummary {
        let scores: Vec<u32> = self
            .candidates
            .iter()
            .filter_map(|candidate| candidate.composite_score.map(u32::from))
            .collect();
        let average_composite_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<u32>() as f32 / scores.len() as f32)
        };

        let count = |bucket: Recommendation| {
            self.candidates
                .iter()
                .filter(|candidate| candidate.recommendation == Some(bucket))
                .count()
        };

        ShortlistSummary {
            showing: self.candidates.len(),
            total: self.total_candidates,
            average_composite_score,
            highly_recommended: count(Recommendation::HighlyRecommended),
            recommended: count(Recommendation::Recommended),
            neutral: count(Recommendation::Neutral),
        }
    }
}

/// Headline figures for rendering "showing N of M".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistSummary {
    pub showing: usize,
    pub total: usize,
    pub average_composite_score: Option<f32>,
    pub highly_recommended: usize,
    pub recommended: usize,
    pub neutral: usize,
}

impl ShortlistSummary {
    pub fn headline(&self) -> String {
        format!("showing {} of {}", self.showing, self.total)
    }
}
