use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use upstream::{UpstreamClient, UpstreamError};

use crate::label::clean_label;
use crate::{LabelError, Labeler, LabelerConfig};

const SYSTEM_PROMPT: &str = "You name groups of search keywords. \
Reply with a short descriptive label of 2 to 4 words and nothing else.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// [`Labeler`] backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone, Debug)]
pub struct ChatLabeler {
    client: UpstreamClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatLabeler {
    pub fn new(cfg: &LabelerConfig) -> Result<Self, LabelError> {
        let client = UpstreamClient::new(
            "labeler",
            cfg.api_url.clone(),
            cfg.api_key.clone(),
            cfg.timeout(),
        )?
        .with_retry(cfg.retry);

        Ok(Self {
            client,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        })
    }
}

fn user_prompt(keywords: &[String]) -> String {
    format!(
        "Generate a short, descriptive label (2-4 words) for this group of keywords: {}",
        keywords.join(", ")
    )
}

#[async_trait]
impl Labeler for ChatLabeler {
    async fn label(&self, keywords: &[String]) -> Result<String, LabelError> {
        let prompt = user_prompt(keywords);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response: ChatResponse = self.client.post_json(&request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::Format("response contained no message content".into()))?;

        clean_label(&content).ok_or(LabelError::EmptyLabel)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_keyword() {
        let prompt = user_prompt(&["seo tools".into(), "seo software".into()]);
        assert!(prompt.ends_with("seo tools, seo software"));
    }

    #[test]
    fn request_has_chat_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            max_tokens: 20,
            temperature: 0.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "u");
        assert_eq!(value["max_tokens"], 20);
        assert_eq!(value["temperature"], 0.5);
    }
}
