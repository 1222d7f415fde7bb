use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use upstream::RetryConfig;

/// Settings for the remote chat-completion service used for labels.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelerConfig {
    /// Full URL of the chat completions endpoint.
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Labels are a few words; keep completions short.
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
                .into(),
            api_key: None,
            model: "gemini-2.0-flash".into(),
            max_tokens: 20,
            temperature: 0.3,
            timeout_secs: 30,
            retry: Some(RetryConfig::default()),
        }
    }
}

impl LabelerConfig {
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

impl fmt::Debug for LabelerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelerConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}
