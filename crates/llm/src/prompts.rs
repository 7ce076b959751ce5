//! Prompt and output-schema text for the enrichment capabilities.
//!
//! The schemas mirror the typed records in `decoywatch-enrich`; changing a
//! field there means changing it here too.

pub const CLASSIFICATION_SYSTEM: &str = "\
You are a MITRE ATT&CK classifier.\n\
Analyze the security logs below and map attacker behavior to ATT&CK \
tactics and techniques.\n\
Output rules:\n\
- Return STRICT JSON only, no markdown, no code fences, no prose outside JSON\n\
- Produce one analysis item for EVERY input log entry\n\
- Include a concrete, actionable mitigation for each item";

pub const CLASSIFICATION_SCHEMA: &str = r#"
Return a JSON object with an 'items' array; each item covers one input log:
{
  "items": [
    {
      "event_kind": "string (kind of the log being analyzed)",
      "score": 0,
      "severity": "LOW | MEDIUM | HIGH | CRITICAL",
      "summary": "string",
      "confidence": "low | medium | high",
      "mitre_attack": [
        {
          "tactic_id": "string",
          "tactic_name": "string",
          "technique_id": "string",
          "technique_name": "string",
          "evidence": ["string"]
        }
      ],
      "mitigations": [
        {
          "mitigation_id": "string",
          "mitigation_name": "string",
          "description": "string"
        }
      ]
    }
  ]
}
"#;

pub const CORRELATION_SYSTEM: &str = "\
You are an attack correlation engine.\n\
Look at the ENTIRE sequence of logs and reconstruct the attack timeline as \
a multi-stage chain (e.g. Reconnaissance -> Entry -> Discovery -> Impact).\n\
Return STRICT JSON only, no markdown or prose outside JSON. \
Return null when the logs do not form a coherent chain.";

pub const CORRELATION_SCHEMA: &str = r#"
Return JSON structure:
{
  "chain_id": "string (e.g. AC-1234)",
  "technique": "string (one-line summary of the multi-stage path)",
  "stages": [
    {
      "name": "string (e.g. Initial Access)",
      "desc": "string (short description of what happened)"
    }
  ]
}
"#;

pub const TICKET_SYSTEM: &str = "\
You are a senior security engineer.\n\
Generate a remediation ticket with a concrete code or configuration fix for \
the detected threat, based on its classification and suggested mitigations.\n\
The ticket must name the affected files, contain a suggested patch (unified \
diff or patch text), and give clear step-by-step patch instructions.\n\
Return STRICT JSON only.";

pub const TICKET_SCHEMA: &str = r#"
Return STRICT JSON structure:
{
  "title": "string (short descriptive title)",
  "description": "string (concise description of the problem and fix)",
  "priority": "HIGH | MEDIUM | LOW",
  "affected_files": ["string (file paths to modify)"],
  "suggested_patch": "string (unified diff or patch content)",
  "patch_instructions": "string (step-by-step instructions for applying the patch)"
}
"#;
