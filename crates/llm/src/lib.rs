//! LLM-backed enrichment capabilities.
//!
//! A [`LlmProvider`] abstracts the completion backend; [`LlmEnrichment`]
//! implements the classify / correlate / generate-ticket capability traits
//! on top of it, with the ATT&CK dataset injected as an [`AttackKnowledge`]
//! handle owned by the caller.

pub mod enrichment;
pub mod knowledge;
pub mod prompts;
pub mod provider;
pub mod providers;

pub use enrichment::LlmEnrichment;
pub use knowledge::{AttackKnowledge, KnowledgeError};
pub use provider::{LlmError, LlmProvider};
pub use providers::gemini::GeminiProvider;
