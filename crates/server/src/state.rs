use std::path::PathBuf;

use tokio::sync::RwLock;

use decoywatch_bus::EventBus;
use decoywatch_enrich::Orchestrator;
use decoywatch_rules::Corpus;

pub struct AppState {
    pub bus: EventBus,
    pub orchestrator: Orchestrator,
    /// Directory re-scanned by `POST /api/v1/rules/reload`.
    pub rules_dir: PathBuf,
    /// Loaded rule corpus; swapped atomically on reload.
    pub corpus: RwLock<Corpus>,
}
