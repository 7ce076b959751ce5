//! Supervision of detached enrichment runs.
//!
//! Every spawned run is tracked here so the host can observe in-flight work
//! and drain it on shutdown instead of abandoning tasks mid-pipeline.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Registry mapping run id to the join handle of its detached task.
#[derive(Default)]
pub struct RunRegistry {
    runs: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly spawned run. Finished runs are reaped opportunistically
    /// so the map does not grow unbounded.
    pub fn register(&self, run_id: Uuid, handle: JoinHandle<()>) {
        let mut runs = self.runs.lock().expect("run registry poisoned");
        runs.retain(|_, h| !h.is_finished());
        runs.insert(run_id, handle);
        debug!(%run_id, in_flight = runs.len(), "run registered");
    }

    /// Number of runs not yet finished.
    pub fn in_flight(&self) -> usize {
        let mut runs = self.runs.lock().expect("run registry poisoned");
        runs.retain(|_, h| !h.is_finished());
        runs.len()
    }

    /// Await every in-flight run. Used for graceful shutdown; runs spawned
    /// after the handles were taken are not waited on.
    pub async fn drain(&self) {
        let handles: Vec<(Uuid, JoinHandle<()>)> = {
            let mut runs = self.runs.lock().expect("run registry poisoned");
            runs.drain().collect()
        };
        for (run_id, handle) in handles {
            if let Err(e) = handle.await {
                warn!(%run_id, error = %e, "enrichment run panicked");
            }
        }
    }
}
