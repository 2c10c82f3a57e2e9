use super::domain::{EntityId, ScoredCandidate};

/// Read access to the scores persisted by the upstream scoring step.
pub trait ScoringEngine: Send + Sync {
    /// All scored candidates for an entity. Unknown entities yield an empty list.
    fn scored_candidates(&self, entity_id: &EntityId)
        -> Result<Vec<ScoredCandidate>, ScoreSourceError>;
}

/// Failure reading or importing scored candidates.
#[derive(Debug, thiserror::Error)]
pub enum ScoreSourceError {
    #[error("scoring store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read score export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score export data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid score export row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}
