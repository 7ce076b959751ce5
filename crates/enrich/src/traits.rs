//! Capability seams the orchestrator depends on.
//!
//! Classification, correlation, and ticket generation are remote calls in
//! production; the orchestrator only sees these traits so tests can inject
//! canned capabilities.

use async_trait::async_trait;

use decoywatch_core::Event;

use crate::types::{AttackChain, ClassificationResult, Ticket};

/// Errors surfaced by injected capabilities.
///
/// The orchestrator never retries; a capability error fails the run and is
/// carried into the terminal completion event.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// The capability is not configured or its backend is unreachable.
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// The upstream call itself failed or timed out.
    #[error("upstream call failed: {0}")]
    Upstream(String),

    /// The capability returned output the contract cannot parse.
    #[error("malformed capability output: {0}")]
    Malformed(String),
}

/// Produces zero or more risk classifications for an event batch.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// `Ok(None)` and `Ok(Some(vec![]))` both mean "nothing to report" and
    /// are not errors.
    async fn classify(
        &self,
        batch: &[Event],
    ) -> Result<Option<Vec<ClassificationResult>>, CapabilityError>;
}

/// Correlates a batch into a single multi-stage attack narrative.
#[async_trait]
pub trait Correlator: Send + Sync {
    /// Absence of a chain is not an error.
    async fn correlate(&self, batch: &[Event]) -> Result<Option<AttackChain>, CapabilityError>;
}

/// Generates a remediation ticket from one qualifying classification.
#[async_trait]
pub trait TicketGenerator: Send + Sync {
    async fn generate(
        &self,
        result: &ClassificationResult,
    ) -> Result<Option<Ticket>, CapabilityError>;
}

/// Hands a finished ticket to an external ticketing system.
///
/// Optional: when unavailable, or when submission fails or returns `false`,
/// the orchestrator falls back to emitting the ticket on the bus.
#[async_trait]
pub trait TicketSubmitter: Send + Sync {
    async fn submit(&self, ticket: &Ticket) -> Result<bool, CapabilityError>;
}
