use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use upstream::RetryConfig;

/// Dimension of the default embedding model, also used for fallback vectors.
pub const DEFAULT_DIMENSION: usize = 768;

/// Settings for the remote embedding service.
///
/// The endpoint must speak the OpenAI embeddings shape:
/// `{ model, input }` in, `{ data: [ { embedding: [...] } ] }` out.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Full URL of the embeddings endpoint.
    pub api_url: String,
    /// Bearer token. Required before any request is made.
    pub api_key: Option<String>,
    /// Model name sent with every request.
    pub model: String,
    /// Length of the zero vector substituted for failed keywords.
    pub dimension: usize,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retry transient failures before falling back to a zero vector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta/openai/embeddings".into(),
            api_key: None,
            model: "text-embedding-004".into(),
            dimension: DEFAULT_DIMENSION,
            timeout_secs: 30,
            retry: Some(RetryConfig::default()),
        }
    }
}

impl EmbeddingConfig {
    /// True when a non-blank API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EmbeddingConfig::default();
        assert_eq!(cfg.dimension, 768);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert!(cfg.api_key.is_none());
        assert!(!cfg.has_credentials());
    }

    #[test]
    fn blank_key_is_not_a_credential() {
        let cfg = EmbeddingConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(!cfg.has_credentials());

        let cfg = EmbeddingConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert!(cfg.has_credentials());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let cfg = EmbeddingConfig {
            api_key: Some("sk-very-secret".into()),
            ..Default::default()
        };
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EmbeddingConfig =
            serde_json::from_str(r#"{"api_key": "k", "dimension": 1536}"#).unwrap();
        assert_eq!(cfg.dimension, 1536);
        assert_eq!(cfg.model, "text-embedding-004");
        assert!(cfg.has_credentials());
    }
}
