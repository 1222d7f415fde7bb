use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use upstream::{UpstreamClient, UpstreamError};

use crate::{Embedder, EmbeddingConfig, EmbeddingError};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// [`Embedder`] backed by an OpenAI-compatible embeddings endpoint.
#[derive(Clone, Debug)]
pub struct HttpEmbedder {
    client: UpstreamClient,
    model: String,
}

impl HttpEmbedder {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = UpstreamClient::new(
            "embedding",
            cfg.api_url.clone(),
            cfg.api_key.clone(),
            cfg.timeout(),
        )?
        .with_retry(cfg.retry);

        Ok(Self {
            client,
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("empty text".into()));
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let response: EmbeddingResponse = self.client.post_json(&request).await?;

        let vector = response
            .data
            .into_iter()
            .next()
            .map(|datum| datum.embedding)
            .ok_or_else(|| UpstreamError::Format("response contained no embeddings".into()))?;

        if vector.is_empty() {
            return Err(UpstreamError::Format("embedding vector is empty".into()).into());
        }

        Ok(vector)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
