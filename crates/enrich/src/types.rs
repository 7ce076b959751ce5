//! Enrichment result records.
//!
//! These are the contracts between the orchestrator and whatever computes
//! risk scores, attack chains, and remediation tickets. How the values are
//! produced is the capability's business; the shapes here are what flows
//! over the bus.

use serde::{Deserialize, Serialize};

use decoywatch_core::Severity;

/// Reference to one ATT&CK technique supporting a classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactic_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactic_name: Option<String>,
    pub technique_id: String,
    pub technique_name: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// One suggested mitigation attached to a classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mitigation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation_id: Option<String>,
    pub mitigation_name: String,
    #[serde(default)]
    pub description: String,
}

/// Risk classification for one event of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Kind of the event this result covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_kind: Option<String>,

    /// Numeric risk value, 0–100.
    pub score: f64,

    pub severity: Severity,

    /// Human-readable analysis summary.
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,

    /// Source address of the batch the result belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacker_ip: Option<String>,

    #[serde(default)]
    pub mitre_attack: Vec<TechniqueRef>,

    #[serde(default)]
    pub mitigations: Vec<Mitigation>,

    /// Stamped by the orchestrator when the result is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One named stage of a reconstructed attack chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStage {
    /// Stage name, e.g. `Initial Access`.
    pub name: String,
    /// Short description of what happened in this stage.
    pub desc: String,
}

/// Multi-stage attack narrative correlated from a whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackChain {
    pub chain_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacker_ip: Option<String>,

    /// One-line summary of the multi-stage path.
    pub technique: String,

    pub stages: Vec<ChainStage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Actionable remediation record generated for one qualifying result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub title: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default)]
    pub affected_files: Vec<String>,

    /// Unified diff or patch text.
    #[serde(default)]
    pub suggested_patch: String,

    /// Step-by-step instructions for applying the patch.
    #[serde(default)]
    pub patch_instructions: String,

    /// Synthetic id, filled by the orchestrator before submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Source address of the first event of the originating batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_result_parses_capability_output() {
        let raw = serde_json::json!({
            "event_kind": "cowrie.login.failed",
            "score": 72.0,
            "severity": "HIGH",
            "summary": "Brute-force attempt against the decoy",
            "confidence": "high",
            "mitre_attack": [{
                "technique_id": "T1110",
                "technique_name": "Brute Force",
                "evidence": ["repeated login failures"],
            }],
            "mitigations": [{
                "mitigation_name": "Account lockout",
                "description": "Lock accounts after repeated failures",
            }],
        });
        let result: ClassificationResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.mitre_attack[0].technique_id, "T1110");
        assert!(result.timestamp.is_none());
    }

    #[test]
    fn attack_chain_stages_preserve_order() {
        let raw = serde_json::json!({
            "chain_id": "AC-1234",
            "technique": "Recon then entry",
            "stages": [
                {"name": "Reconnaissance", "desc": "Port scan"},
                {"name": "Initial Access", "desc": "Password guessing"},
            ],
        });
        let chain: AttackChain = serde_json::from_value(raw).unwrap();
        assert_eq!(chain.stages[0].name, "Reconnaissance");
        assert_eq!(chain.stages[1].name, "Initial Access");
    }
}
