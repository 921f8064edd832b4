// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Arbiter Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Failure taxonomy of an answer/extraction provider.
///
/// Only the first three variants are transient; a schema failure means the
/// provider answered with malformed structured output and is never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Generic transient failure (connection reset, 5xx, ...).
    #[error("provider failure: {0}")]
    Transient(String),

    /// Provider rejected the request due to rate limiting.
    #[error("provider rate limited: {0}")]
    RateLimited(String),

    /// Provider call exceeded its deadline.
    #[error("provider timed out: {0}")]
    TimedOut(String),

    /// Provider returned output that does not match the requested schema.
    #[error("provider schema violation: {0}")]
    Schema(String),
}

impl ProviderError {
    /// Whether a retry policy may re-issue the call.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Transient(_) | ProviderError::RateLimited(_) | ProviderError::TimedOut(_)
        )
    }
}

/// Root error type for all Arbiter Kernel failures.
///
/// Running out of iterations is deliberately absent: that is the `Failed`
/// verification outcome, not an error.
#[derive(Error, Debug)]
pub enum ArbiterError {
    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid input (atoms, manifests, parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Extraction output failed schema validation.
    #[error("schema error: {0}")]
    Schema(String),

    /// Pack could not be found or parsed.
    #[error("pack error: {0}")]
    Pack(String),

    /// Provider failed terminally (non-transient, or retries exhausted).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Canonical serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ArbiterError {
    fn from(err: serde_json::Error) -> Self {
        ArbiterError::Serialization(err.to_string())
    }
}

pub type ArbiterResult<T> = Result<T, ArbiterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classes() {
        assert!(ProviderError::Transient("x".into()).is_transient());
        assert!(ProviderError::RateLimited("x".into()).is_transient());
        assert!(ProviderError::TimedOut("x".into()).is_transient());
        assert!(!ProviderError::Schema("x".into()).is_transient());
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: ArbiterError = ProviderError::TimedOut("30s".into()).into();
        assert_eq!(err.to_string(), "provider timed out: 30s");
    }
}
