//! Stand-in enrichment used when no LLM backend is configured.
//!
//! Ingest and raw broadcast keep working; runs complete with nothing
//! enriched, matching a deployment that only wants rule matching and the
//! live event feed.

use async_trait::async_trait;

use decoywatch_core::Event;
use decoywatch_enrich::{
    AttackChain, CapabilityError, ClassificationResult, Classifier, Correlator, Ticket,
    TicketGenerator,
};

pub struct NoopEnrichment;

#[async_trait]
impl Classifier for NoopEnrichment {
    async fn classify(
        &self,
        _batch: &[Event],
    ) -> Result<Option<Vec<ClassificationResult>>, CapabilityError> {
        Ok(None)
    }
}

#[async_trait]
impl Correlator for NoopEnrichment {
    async fn correlate(&self, _batch: &[Event]) -> Result<Option<AttackChain>, CapabilityError> {
        Ok(None)
    }
}

#[async_trait]
impl TicketGenerator for NoopEnrichment {
    async fn generate(
        &self,
        _result: &ClassificationResult,
    ) -> Result<Option<Ticket>, CapabilityError> {
        Ok(None)
    }
}
