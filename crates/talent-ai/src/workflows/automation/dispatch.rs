use super::domain::Decision;

/// Outbound hook that carries out emitted decisions, honoring their autonomy level.
pub trait ActionDispatcher: Send + Sync {
    fn apply(&self, decision: &Decision) -> Result<(), DispatchError>;
}

/// Decision dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch transport unavailable: {0}")]
    Transport(String),
}
