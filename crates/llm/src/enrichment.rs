//! Capability implementations over an LLM provider.
//!
//! `LlmEnrichment` turns raw model output into the typed records the
//! orchestrator expects: fences stripped, batch `items` unwrapped, the
//! attacker address injected from the first batch event.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use decoywatch_core::Event;
use decoywatch_enrich::{
    AttackChain, CapabilityError, ClassificationResult, Classifier, Correlator, Ticket,
    TicketGenerator,
};

use crate::knowledge::AttackKnowledge;
use crate::prompts;
use crate::provider::{LlmError, LlmProvider};

/// Strip markdown code-fence wrappers models add despite instructions.
pub fn clean_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_start()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Unwrap a classification response: either `{"items": [...]}` or a single
/// bare result object.
fn unwrap_items(value: serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Object(mut map) => match map.remove("items") {
            Some(serde_json::Value::Array(items)) => items,
            Some(other) => vec![other],
            None => vec![serde_json::Value::Object(map)],
        },
        serde_json::Value::Array(items) => items,
        other => vec![other],
    }
}

fn capability_error(e: LlmError) -> CapabilityError {
    match e {
        LlmError::NotConfigured(msg) => CapabilityError::Unavailable(msg),
        LlmError::Parse(msg) => CapabilityError::Malformed(msg),
        other => CapabilityError::Upstream(other.to_string()),
    }
}

fn batch_source_address(batch: &[Event]) -> Option<String> {
    batch.first().and_then(|e| e.source_address.clone())
}

/// LLM-backed classify / correlate / generate-ticket capabilities.
pub struct LlmEnrichment {
    provider: Arc<dyn LlmProvider>,
    knowledge: AttackKnowledge,
}

impl LlmEnrichment {
    pub fn new(provider: Arc<dyn LlmProvider>, knowledge: AttackKnowledge) -> Self {
        Self {
            provider,
            knowledge,
        }
    }

    async fn complete_json(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, CapabilityError> {
        let raw = self
            .provider
            .complete(system, prompt)
            .await
            .map_err(capability_error)?;
        let cleaned = clean_json_fences(&raw);
        serde_json::from_str(cleaned).map_err(|e| {
            CapabilityError::Malformed(format!("model returned invalid JSON: {}", e))
        })
    }
}

#[async_trait]
impl Classifier for LlmEnrichment {
    async fn classify(
        &self,
        batch: &[Event],
    ) -> Result<Option<Vec<ClassificationResult>>, CapabilityError> {
        let logs = serde_json::to_string(batch)
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;
        let prompt = format!(
            "{}\nLOGS:\n{}\n\nMITRE ATT&CK DATA:\n{}",
            prompts::CLASSIFICATION_SCHEMA,
            logs,
            self.knowledge.as_json(),
        );

        debug!(batch = batch.len(), "classifying batch");
        let value = self
            .complete_json(prompts::CLASSIFICATION_SYSTEM, &prompt)
            .await?;
        if value.is_null() {
            return Ok(None);
        }

        let attacker_ip = batch_source_address(batch);
        let mut results = Vec::new();
        for item in unwrap_items(value) {
            match serde_json::from_value::<ClassificationResult>(item) {
                Ok(mut result) => {
                    if result.attacker_ip.is_none() {
                        result.attacker_ip = attacker_ip.clone();
                    }
                    results.push(result);
                }
                Err(e) => {
                    // One bad item should not void the rest of the batch.
                    warn!(error = %e, "skipping malformed classification item");
                }
            }
        }

        if results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(results))
        }
    }
}

#[async_trait]
impl Correlator for LlmEnrichment {
    async fn correlate(&self, batch: &[Event]) -> Result<Option<AttackChain>, CapabilityError> {
        let logs = serde_json::to_string(batch)
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;
        let prompt = format!("{}\nLOGS:\n{}", prompts::CORRELATION_SCHEMA, logs);

        debug!(batch = batch.len(), "correlating batch");
        let value = self
            .complete_json(prompts::CORRELATION_SYSTEM, &prompt)
            .await?;
        if value.is_null() {
            return Ok(None);
        }

        let mut chain: AttackChain = serde_json::from_value(value)
            .map_err(|e| CapabilityError::Malformed(format!("bad attack chain: {}", e)))?;
        if chain.attacker_ip.is_none() {
            chain.attacker_ip = batch_source_address(batch);
        }
        Ok(Some(chain))
    }
}

#[async_trait]
impl TicketGenerator for LlmEnrichment {
    async fn generate(
        &self,
        result: &ClassificationResult,
    ) -> Result<Option<Ticket>, CapabilityError> {
        let context = serde_json::json!({
            "severity": result.severity,
            "summary": result.summary,
            "mitigations": result.mitigations,
            "mitre": result.mitre_attack,
        });
        let prompt = format!("{}\nCONTEXT:\n{}", prompts::TICKET_SCHEMA, context);

        let value = self.complete_json(prompts::TICKET_SYSTEM, &prompt).await?;
        if value.is_null() {
            return Ok(None);
        }

        let ticket: Ticket = serde_json::from_value(value)
            .map_err(|e| CapabilityError::Malformed(format!("bad ticket: {}", e)))?;
        Ok(Some(ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use decoywatch_core::Severity;

    struct CannedProvider {
        responses: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn returning(responses: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().rev().map(String::from).collect()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| LlmError::Parse("no canned response left".to_string()))
        }
    }

    fn enrichment(responses: Vec<&str>) -> LlmEnrichment {
        LlmEnrichment::new(
            CannedProvider::returning(responses),
            AttackKnowledge::from_value(serde_json::json!({"techniques": []})),
        )
    }

    fn batch() -> Vec<Event> {
        vec![serde_json::from_value(serde_json::json!({
            "event_kind": "cowrie.login.failed",
            "source_address": "203.0.113.7",
        }))
        .unwrap()]
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(clean_json_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_json_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_json_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn items_unwrapping_handles_batch_and_single() {
        let batch = serde_json::json!({"items": [{"a": 1}, {"a": 2}]});
        assert_eq!(unwrap_items(batch).len(), 2);

        let single = serde_json::json!({"score": 10});
        let items = unwrap_items(single);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["score"], 10);
    }

    #[tokio::test]
    async fn classify_parses_items_and_injects_attacker_ip() {
        let agent = enrichment(vec![
            r#"```json
{"items": [
  {"event_kind": "cowrie.login.failed", "score": 72, "severity": "HIGH",
   "summary": "Brute force against the decoy"}
]}
```"#,
        ]);

        let results = agent.classify(&batch()).await.unwrap().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::High);
        assert_eq!(results[0].attacker_ip.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn classify_skips_malformed_items() {
        let agent = enrichment(vec![
            r#"{"items": [
  {"score": "not a number", "severity": "HIGH", "summary": "bad"},
  {"score": 10, "severity": "LOW", "summary": "good"}
]}"#,
        ]);

        let results = agent.classify(&batch()).await.unwrap().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].summary, "good");
    }

    #[tokio::test]
    async fn classify_invalid_json_is_malformed_error() {
        let agent = enrichment(vec!["the model rambled instead of emitting JSON"]);
        let err = agent.classify(&batch()).await.unwrap_err();
        assert!(matches!(err, CapabilityError::Malformed(_)));
    }

    #[tokio::test]
    async fn correlate_null_means_no_chain() {
        let agent = enrichment(vec!["null"]);
        assert!(agent.correlate(&batch()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn correlate_parses_chain_and_injects_attacker_ip() {
        let agent = enrichment(vec![
            r#"{"chain_id": "AC-9", "technique": "Recon then entry",
                "stages": [{"name": "Reconnaissance", "desc": "Port scan"}]}"#,
        ]);

        let chain = agent.correlate(&batch()).await.unwrap().unwrap();
        assert_eq!(chain.chain_id, "AC-9");
        assert_eq!(chain.attacker_ip.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn generate_parses_ticket() {
        let agent = enrichment(vec![
            r#"{"title": "Harden SSH", "description": "Disable password auth",
                "priority": "HIGH", "affected_files": ["sshd_config"],
                "suggested_patch": "-yes\n+no",
                "patch_instructions": "Apply and restart"}"#,
        ]);

        let result = ClassificationResult {
            event_kind: None,
            score: 90.0,
            severity: Severity::Critical,
            summary: "Brute force".to_string(),
            confidence: None,
            attacker_ip: None,
            mitre_attack: Vec::new(),
            mitigations: Vec::new(),
            timestamp: None,
        };
        let ticket = agent.generate(&result).await.unwrap().unwrap();
        assert_eq!(ticket.title, "Harden SSH");
        assert_eq!(ticket.affected_files, vec!["sshd_config"]);
    }
}
