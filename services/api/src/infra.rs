use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use talent_ai::error::AppError;
use talent_ai::workflows::automation::{ActionDispatcher, AutonomyLevel, Decision, DispatchError};
use talent_ai::workflows::shortlist::EntityKind;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dispatcher: Arc<InMemoryDispatcher>,
}

/// Decisions grouped by how far the host may act on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DispatchLog {
    pub(crate) suggestions: Vec<Decision>,
    pub(crate) pending_approval: Vec<Decision>,
    pub(crate) executed: Vec<Decision>,
}

/// Dispatcher that records decisions in memory, bucketed by autonomy level.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDispatcher {
    log: Arc<Mutex<DispatchLog>>,
}

impl InMemoryDispatcher {
    fn lock(&self) -> Result<MutexGuard<'_, DispatchLog>, DispatchError> {
        self.log
            .lock()
            .map_err(|_| DispatchError::Transport("dispatch log lock poisoned".to_string()))
    }

    pub(crate) fn snapshot(&self) -> Result<DispatchLog, DispatchError> {
        Ok(self.lock()?.clone())
    }
}

impl ActionDispatcher for InMemoryDispatcher {
    fn apply(&self, decision: &Decision) -> Result<(), DispatchError> {
        let mut log = self.lock()?;
        match decision.autonomy_level {
            AutonomyLevel::Advise => log.suggestions.push(decision.clone()),
            AutonomyLevel::Confirm => log.pending_approval.push(decision.clone()),
            AutonomyLevel::Autonomous => {
                info!(
                    rule_id = %decision.rule_id,
                    action = decision.action.kind.label(),
                    "executing autonomous decision"
                );
                log.executed.push(decision.clone());
            }
        }
        Ok(())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub(crate) fn parse_entity_kind(raw: &str) -> Result<EntityKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "gig" => Ok(EntityKind::Gig),
        "vacancy" => Ok(EntityKind::Vacancy),
        other => Err(format!("unknown entity kind '{other}', expected gig or vacancy")),
    }
}
