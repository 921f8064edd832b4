// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Perceiver and Reasoner Agents
// ─────────────────────────────────────────────────────────────────────
//! Capability traits consumed by the orchestrator, and implementations
//! backed by an [`LlmProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use arbiter_core::PackModel;
use arbiter_types::canonical::canonicalize_atom;
use arbiter_types::{ArbiterError, ArbiterResult, Manifest, RetryPolicy};

use crate::prompts::{
    atom_manifest_schema, build_claim_prompt, build_evidence_prompt, build_reasoner_prompt,
    evidence_block,
};
use crate::provider::LlmProvider;
use crate::retry::run_with_retry;

/// Turns text into canonical atom manifests.
#[async_trait]
pub trait Perceiver: Send + Sync {
    async fn extract_evidence_atoms(&self, text: &str, pack: &PackModel) -> ArbiterResult<Manifest>;

    async fn extract_claim_atoms(&self, answer: &str, pack: &PackModel) -> ArbiterResult<Manifest>;
}

/// Produces candidate answers, optionally grounded in evidence and
/// steered by verifier feedback.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn generate_answer(
        &self,
        user_text: &str,
        pack: &PackModel,
        evidence: Option<&Manifest>,
        feedback: Option<&str>,
    ) -> ArbiterResult<String>;
}

pub struct LlmPerceiver {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
    schema: Value,
}

impl LlmPerceiver {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            retry,
            schema: atom_manifest_schema(),
        }
    }

    async fn extract(&self, operation: &str, prompt: String, pack: &PackModel) -> ArbiterResult<Manifest> {
        let provider = &*self.provider;
        let prompt = prompt.as_str();
        let schema = &self.schema;
        let payload = run_with_retry(&self.retry, operation, move || {
            provider.complete_json(prompt, schema)
        })
        .await?;
        validate_manifest(payload, pack)
    }
}

#[async_trait]
impl Perceiver for LlmPerceiver {
    async fn extract_evidence_atoms(&self, text: &str, pack: &PackModel) -> ArbiterResult<Manifest> {
        self.extract("extract_evidence_atoms", build_evidence_prompt(text), pack)
            .await
    }

    async fn extract_claim_atoms(&self, answer: &str, pack: &PackModel) -> ArbiterResult<Manifest> {
        self.extract("extract_claim_atoms", build_claim_prompt(answer), pack)
            .await
    }
}

/// Parse a provider payload into a canonical, sorted manifest.
///
/// Malformed payloads and invalid atoms are schema errors.
pub fn validate_manifest(payload: Value, pack: &PackModel) -> ArbiterResult<Manifest> {
    let manifest: Manifest = serde_json::from_value(payload)
        .map_err(|e| ArbiterError::Schema(format!("atom manifest: {e}")))?;
    for atom in manifest.iter() {
        atom.validate()
            .map_err(|e| ArbiterError::Schema(format!("atom {atom}: {e}")))?;
    }
    Ok(manifest
        .iter()
        .map(|atom| canonicalize_atom(atom, &pack.ontology.aliases))
        .collect())
}

pub struct LlmReasoner {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl LlmReasoner {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }
}

#[async_trait]
impl Reasoner for LlmReasoner {
    async fn generate_answer(
        &self,
        user_text: &str,
        _pack: &PackModel,
        evidence: Option<&Manifest>,
        feedback: Option<&str>,
    ) -> ArbiterResult<String> {
        let block = evidence.map(evidence_block);
        let prompt = build_reasoner_prompt(user_text, block.as_deref(), feedback);
        let provider = &*self.provider;
        let prompt = prompt.as_str();
        let answer = run_with_retry(&self.retry, "generate_answer", move || {
            provider.complete_text(prompt)
        })
        .await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::{InMemoryPackLoader, PackLoader, VectorMemory};
    use arbiter_types::{Atom, ProviderError};
    use serde_json::json;

    use crate::provider::ReplayProvider;

    fn general_pack() -> PackModel {
        InMemoryPackLoader::new()
            .load("general", &VectorMemory::new(256, 1337))
            .unwrap()
    }

    #[tokio::test]
    async fn test_perceiver_canonicalizes_and_sorts() {
        let provider = Arc::new(ReplayProvider::new().with_json(json!({
            "atoms": [
                {"subject": "Bridge", "predicate": "status", "obj": "Hazardous", "is_true": true, "confidence": 0.9},
                {"subject": "Back Door", "predicate": "state", "obj": "shut", "is_true": true, "confidence": 1.0}
            ]
        })));
        let perceiver = LlmPerceiver::new(provider, RetryPolicy::no_retry());
        let manifest = perceiver
            .extract_evidence_atoms("text", &general_pack())
            .await
            .unwrap();
        assert_eq!(
            manifest.atoms(),
            &[
                Atom::new("back_door", "state", "closed"),
                Atom::new("bridge", "status", "unsafe"),
            ]
        );
        assert_eq!(manifest.atoms()[1].confidence, 0.9);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_schema_error() {
        let provider = Arc::new(ReplayProvider::new().with_json(json!({"facts": []})));
        let perceiver = LlmPerceiver::new(provider, RetryPolicy::default());
        let err = perceiver
            .extract_claim_atoms("answer", &general_pack())
            .await
            .unwrap_err();
        assert!(matches!(err, ArbiterError::Schema(_)));
    }

    #[tokio::test]
    async fn test_invalid_confidence_is_schema_error() {
        let provider = Arc::new(ReplayProvider::new().with_json(json!({
            "atoms": [{"subject": "a", "predicate": "b", "obj": "c", "is_true": true, "confidence": 3.0}]
        })));
        let perceiver = LlmPerceiver::new(provider, RetryPolicy::default());
        let err = perceiver
            .extract_claim_atoms("answer", &general_pack())
            .await
            .unwrap_err();
        assert!(matches!(err, ArbiterError::Schema(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_perceiver_retries_transient_failures() {
        let provider = Arc::new(
            ReplayProvider::new()
                .with_json_error(ProviderError::RateLimited("429".into()))
                .with_json(json!({"atoms": []})),
        );
        let perceiver = LlmPerceiver::new(provider.clone(), RetryPolicy::default());
        let manifest = perceiver
            .extract_evidence_atoms("text", &general_pack())
            .await
            .unwrap();
        assert!(manifest.is_empty());
        assert_eq!(provider.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_reasoner_prompt_carries_evidence_and_feedback() {
        let provider = Arc::new(ReplayProvider::new().with_text("The door is open."));
        let reasoner = LlmReasoner::new(provider.clone(), RetryPolicy::no_retry());
        let evidence = Manifest::new(vec![Atom::new("door", "state", "open")]);
        let answer = reasoner
            .generate_answer("Is the door open?", &general_pack(), Some(&evidence), Some("MUST ADD:"))
            .await
            .unwrap();
        assert_eq!(answer, "The door is open.");
        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("Evidence atoms:\n- (door, state, open, true)"));
        assert!(prompt.contains("Verifier feedback:\nMUST ADD:"));
    }

    #[tokio::test]
    async fn test_reasoner_surfaces_provider_error() {
        let provider = Arc::new(ReplayProvider::new().with_text_error(ProviderError::Schema("x".into())));
        let reasoner = LlmReasoner::new(provider, RetryPolicy::default());
        let err = reasoner
            .generate_answer("q", &general_pack(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ArbiterError::Provider(ProviderError::Schema(_))));
    }
}
