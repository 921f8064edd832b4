// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Arbiter Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ArbiterError, ArbiterResult};

/// Bounded retry policy for provider calls.
///
/// Exponential backoff capped at `max_backoff_ms`, randomized by
/// `±jitter` of the capped value at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first call.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Ceiling on any single delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Jitter fraction in [0, 1].
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 4000,
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Capped delay before retry number `attempt` (0-based), without jitter.
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let base = self.initial_backoff_ms as f64 * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_backoff_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Validate retry parameters.
    pub fn validate(&self) -> ArbiterResult<()> {
        if self.max_attempts == 0 {
            return Err(ArbiterError::Config(
                "retry.max_attempts must be >= 1".to_string(),
            ));
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ArbiterError::Config(format!(
                "retry.max_backoff_ms ({}) must be >= retry.initial_backoff_ms ({})",
                self.max_backoff_ms, self.initial_backoff_ms
            )));
        }
        if self.multiplier < 1.0 {
            return Err(ArbiterError::Config(format!(
                "retry.multiplier must be >= 1.0, got {}",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(ArbiterError::Config(format!(
                "retry.jitter must be in [0, 1], got {}",
                self.jitter
            )));
        }
        Ok(())
    }
}

/// Runtime configuration for a verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Hypervector dimension.
    /// Default: 10000.
    pub dim: usize,

    /// Base seed combined with each token's FNV-1a hash.
    /// Default: 1337.
    pub seed: u32,

    /// Acceptance threshold: evidence/claim cosine must be >= this.
    /// Default: 0.92.
    pub score_threshold: f64,

    /// Per-claim support floor; claims below it are reported unsupported.
    /// Default: 0.2.
    pub claim_support_threshold: f64,

    /// Iteration budget of the verify-and-fix loop.
    /// Default: 5.
    pub max_iters: usize,

    /// Extract evidence concurrently with an initial draft answer.
    /// Default: false.
    pub parallel_prepass: bool,

    /// Regenerate the first answer with the evidence block when the
    /// prepass produced a draft and evidence is non-empty.
    /// Default: false.
    pub regenerate_with_evidence: bool,

    /// Characters of each answer retained in the iteration trace.
    /// Default: 200.
    pub answer_preview_chars: usize,

    /// Maximum entries in an iteration's `top_conflicts`.
    /// Default: 5.
    pub top_conflicts_limit: usize,

    /// Retry policy for perceiver/reasoner provider calls.
    pub retry: RetryPolicy,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            dim: 10_000,
            seed: 1337,
            score_threshold: 0.92,
            claim_support_threshold: 0.2,
            max_iters: 5,
            parallel_prepass: false,
            regenerate_with_evidence: false,
            answer_preview_chars: 200,
            top_conflicts_limit: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl ArbiterConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> ArbiterResult<()> {
        if self.dim == 0 {
            return Err(ArbiterError::Config("dim must be >= 1".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.score_threshold) {
            return Err(ArbiterError::Config(format!(
                "score_threshold must be in [-1, 1], got {}",
                self.score_threshold
            )));
        }
        if !(-1.0..=1.0).contains(&self.claim_support_threshold) {
            return Err(ArbiterError::Config(format!(
                "claim_support_threshold must be in [-1, 1], got {}",
                self.claim_support_threshold
            )));
        }
        if self.max_iters == 0 {
            return Err(ArbiterError::Config("max_iters must be >= 1".to_string()));
        }
        self.retry.validate()
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ArbiterResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ArbiterError::Config(format!("JSON parse error: {e}")))
    }

    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> ArbiterResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ArbiterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = ArbiterConfig {
            score_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ArbiterError::Config(_))));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = ArbiterConfig {
            max_iters: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ArbiterConfig::from_json(r#"{"max_iters": 3, "dim": 2048}"#).unwrap();
        assert_eq!(config.max_iters, 3);
        assert_eq!(config.dim, 2048);
        assert_eq!(config.seed, 1337);
        assert!((config.score_threshold - 0.92).abs() < 1e-12);
    }

    #[test]
    fn test_from_json_garbage() {
        assert!(ArbiterConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_backoff_growth_and_cap() {
        let policy = RetryPolicy {
            initial_backoff_ms: 100,
            max_backoff_ms: 500,
            ..Default::default()
        };
        assert_eq!(policy.base_backoff(0).as_millis(), 100);
        assert_eq!(policy.base_backoff(1).as_millis(), 200);
        assert_eq!(policy.base_backoff(2).as_millis(), 400);
        assert_eq!(policy.base_backoff(8).as_millis(), 500);
    }

    #[test]
    fn test_retry_validation() {
        assert!(RetryPolicy {
            max_attempts: 0,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(RetryPolicy {
            jitter: 1.5,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(RetryPolicy {
            initial_backoff_ms: 10,
            max_backoff_ms: 5,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(RetryPolicy::no_retry().validate().is_ok());
    }
}
