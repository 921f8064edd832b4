// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Extraction and Reasoning Prompts
// ─────────────────────────────────────────────────────────────────────

use serde_json::{json, Value};

use arbiter_types::Manifest;

const EXTRACTION_RULES: &str = "Return JSON only that matches the schema. \
Normalize tokens to lowercase and underscores. \
Include confidence between 0 and 1 and optional source_span indices.";

/// JSON schema of an atom manifest as requested from providers.
pub fn atom_manifest_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "atoms": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "subject": {"type": "string"},
                        "predicate": {"type": "string"},
                        "obj": {"type": "string"},
                        "is_true": {"type": "boolean"},
                        "confidence": {"type": "number", "minimum": 0, "maximum": 1},
                        "type": {"type": "string", "enum": ["fact", "norm", "assumption"]},
                        "source_span": {
                            "type": "object",
                            "properties": {
                                "start": {"type": "integer", "minimum": 0},
                                "end": {"type": "integer", "minimum": 0}
                            },
                            "required": ["start", "end"]
                        }
                    },
                    "required": ["subject", "predicate", "obj", "is_true", "confidence"]
                }
            }
        },
        "required": ["atoms"]
    })
}

fn schema_block() -> String {
    serde_json::to_string_pretty(&atom_manifest_schema()).unwrap_or_default()
}

pub fn build_evidence_prompt(text: &str) -> String {
    format!(
        "You are an extraction agent. Extract evidence atoms from the user text. {EXTRACTION_RULES}\n\n\
         User text:\n{text}\n\n\
         Schema:\n{}",
        schema_block()
    )
}

pub fn build_claim_prompt(answer: &str) -> String {
    format!(
        "You are an extraction agent. Extract claim atoms from the answer text. {EXTRACTION_RULES}\n\n\
         Answer text:\n{answer}\n\n\
         Schema:\n{}",
        schema_block()
    )
}

/// One `- (subject, predicate, object, is_true)` line per atom.
pub fn evidence_block(evidence: &Manifest) -> String {
    evidence
        .iter()
        .map(|atom| format!("- {atom}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_reasoner_prompt(
    user_text: &str,
    evidence_block: Option<&str>,
    feedback_block: Option<&str>,
) -> String {
    let mut parts = vec![
        "You are a careful reasoning assistant.",
        "Answer the user query directly and concisely.",
        "Use the evidence atoms if provided.",
        "Do not include JSON.",
        "",
        "User query:",
        user_text,
    ];
    if let Some(block) = evidence_block.filter(|b| !b.is_empty()) {
        parts.extend(["", "Evidence atoms:", block]);
    }
    if let Some(block) = feedback_block.filter(|b| !b.is_empty()) {
        parts.extend(["", "Verifier feedback:", block]);
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_types::Atom;

    #[test]
    fn test_schema_requires_core_fields() {
        let schema = atom_manifest_schema();
        let required = &schema["properties"]["atoms"]["items"]["required"];
        assert!(required.as_array().unwrap().contains(&json!("obj")));
    }

    #[test]
    fn test_extraction_prompts_embed_text_and_schema() {
        let prompt = build_evidence_prompt("The door is open.");
        assert!(prompt.contains("User text:\nThe door is open."));
        assert!(prompt.contains("\"atoms\""));
        let prompt = build_claim_prompt("It is open.");
        assert!(prompt.contains("Answer text:\nIt is open."));
    }

    #[test]
    fn test_reasoner_prompt_blocks() {
        let evidence = Manifest::new(vec![Atom::new("door", "state", "open")]);
        let block = evidence_block(&evidence);
        assert_eq!(block, "- (door, state, open, true)");

        let bare = build_reasoner_prompt("Is the door open?", None, None);
        assert!(!bare.contains("Evidence atoms:"));
        assert!(!bare.contains("Verifier feedback:"));

        let full = build_reasoner_prompt("Is the door open?", Some(&block), Some("MUST REMOVE:"));
        let evidence_at = full.find("Evidence atoms:").unwrap();
        let feedback_at = full.find("Verifier feedback:").unwrap();
        assert!(evidence_at < feedback_at);
    }
}
