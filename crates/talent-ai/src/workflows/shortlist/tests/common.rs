use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::shortlist::domain::{
    CandidateId, EntityId, Recommendation, ScoredCandidate,
};
use crate::workflows::shortlist::service::ShortlistGenerator;
use crate::workflows::shortlist::source::{ScoreSourceError, ScoringEngine};

pub(super) fn entity() -> EntityId {
    EntityId("gig-42".to_string())
}

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn scored(
    id: &str,
    composite: Option<u8>,
    recommendation: Option<Recommendation>,
) -> ScoredCandidate {
    ScoredCandidate {
        id: CandidateId(id.to_string()),
        composite_score: composite,
        price_score: None,
        delivery_score: None,
        skills_match_score: None,
        experience_score: None,
        recommendation,
        ranking_analysis: None,
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        ranked_at: None,
        created_at: epoch(),
    }
}

pub(super) fn created_days_later(mut candidate: ScoredCandidate, days: i64) -> ScoredCandidate {
    candidate.created_at = epoch() + Duration::days(days);
    candidate
}

pub(super) fn priced(
    mut candidate: ScoredCandidate,
    price: Option<u8>,
    delivery: Option<u8>,
) -> ScoredCandidate {
    candidate.price_score = price;
    candidate.delivery_score = delivery;
    candidate
}

pub(super) fn ids(candidates: &[ScoredCandidate]) -> Vec<&str> {
    candidates
        .iter()
        .map(|candidate| candidate.id.0.as_str())
        .collect()
}

/// Scoring store fake that also counts reads.
#[derive(Default)]
pub(super) struct MemoryScores {
    by_entity: BTreeMap<EntityId, Vec<ScoredCandidate>>,
    reads: Mutex<usize>,
}

impl MemoryScores {
    pub(super) fn with(entity_id: EntityId, candidates: Vec<ScoredCandidate>) -> Self {
        let mut by_entity = BTreeMap::new();
        by_entity.insert(entity_id, candidates);
        Self {
            by_entity,
            reads: Mutex::new(0),
        }
    }

    pub(super) fn reads(&self) -> usize {
        *self.reads.lock().expect("reads mutex poisoned")
    }
}

impl ScoringEngine for MemoryScores {
    fn scored_candidates(
        &self,
        entity_id: &EntityId,
    ) -> Result<Vec<ScoredCandidate>, ScoreSourceError> {
        *self.reads.lock().expect("reads mutex poisoned") += 1;
        Ok(self.by_entity.get(entity_id).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableScores;

impl ScoringEngine for UnavailableScores {
    fn scored_candidates(
        &self,
        _entity_id: &EntityId,
    ) -> Result<Vec<ScoredCandidate>, ScoreSourceError> {
        Err(ScoreSourceError::Unavailable("scoring store offline".to_string()))
    }
}

pub(super) fn generator_with(
    candidates: Vec<ScoredCandidate>,
) -> (ShortlistGenerator<MemoryScores>, Arc<MemoryScores>) {
    let scores = Arc::new(MemoryScores::with(entity(), candidates));
    (ShortlistGenerator::new(scores.clone()), scores)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
