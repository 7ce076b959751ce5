//! Background enrichment pipeline for ingested event batches.
//!
//! This crate provides:
//! - Capability traits the orchestrator consumes ([`Classifier`],
//!   [`Correlator`], [`TicketGenerator`], [`TicketSubmitter`])
//! - Typed enrichment results (risk classifications, attack chains, tickets)
//! - The [`Orchestrator`] state machine with exactly-once completion
//!   signaling per run, and a [`RunRegistry`] supervising detached runs

pub mod orchestrator;
pub mod registry;
pub mod traits;
pub mod types;

pub use orchestrator::{IngestReceipt, Orchestrator};
pub use registry::RunRegistry;
pub use traits::{CapabilityError, Classifier, Correlator, TicketGenerator, TicketSubmitter};
pub use types::{AttackChain, ChainStage, ClassificationResult, Mitigation, TechniqueRef, Ticket};
