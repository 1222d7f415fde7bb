use futures::stream::{self, StreamExt};

use crate::Embedder;

/// Embeddings for a keyword batch, parallel to the input keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingBatch {
    /// One vector per keyword, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Input positions that received a zero vector because their call failed.
    pub fallback_indices: Vec<usize>,
}

impl EmbeddingBatch {
    pub fn fallback_count(&self) -> usize {
        self.fallback_indices.len()
    }
}

/// Placeholder substituted for a keyword whose embedding could not be fetched.
pub fn zero_vector(dimension: usize) -> Vec<f32> {
    vec![0.0; dimension]
}

/// Fetch one embedding per keyword, keeping input order.
///
/// At most `concurrency` calls are in flight (values below 1 are treated as
/// 1, which issues calls strictly one after another). Completion order does
/// not matter: results are tagged with their input position and sorted
/// before returning.
///
/// Failures never abort the batch; the keyword gets [`zero_vector`] instead.
pub async fn fetch_embeddings<E>(
    embedder: &E,
    keywords: &[String],
    dimension: usize,
    concurrency: usize,
) -> EmbeddingBatch
where
    E: Embedder + ?Sized,
{
    let concurrency = concurrency.max(1);

    let mut tagged: Vec<(usize, Option<Vec<f32>>)> =
        stream::iter(keywords.iter().cloned().enumerate())
            .map(|(idx, keyword)| async move {
                match embedder.embed(&keyword).await {
                    Ok(vector) => (idx, Some(vector)),
                    Err(err) => {
                        tracing::warn!(
                            keyword = %keyword,
                            model = embedder.model_name(),
                            error = %err,
                            "embedding failed, substituting zero vector"
                        );
                        metrics::counter!("kwcluster_embedding_fallbacks_total").increment(1);
                        (idx, None)
                    }
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

    tagged.sort_by_key(|(idx, _)| *idx);

    let mut fallback_indices = Vec::new();
    let embeddings = tagged
        .into_iter()
        .map(|(idx, vector)| {
            vector.unwrap_or_else(|| {
                fallback_indices.push(idx);
                zero_vector(dimension)
            })
        })
        .collect();

    EmbeddingBatch {
        embeddings,
        fallback_indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmbeddingError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use upstream::UpstreamError;

    /// Returns `[len, 1.0]` for each keyword, failing the ones listed in
    /// `failing` and sleeping `delay_ms` per keyword to shuffle completion.
    #[derive(Default)]
    struct FakeEmbedder {
        failing: Vec<&'static str>,
        delay_ms: HashMap<&'static str, u64>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(ms) = self.delay_ms.get(text) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&text) {
                return Err(UpstreamError::Status {
                    status: 500,
                    body: "boom".into(),
                }
                .into());
            }
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn preserves_input_order_when_responses_arrive_out_of_order() {
        let embedder = FakeEmbedder {
            delay_ms: HashMap::from([("a", 40), ("bb", 20), ("ccc", 0)]),
            ..Default::default()
        };
        let input = keywords(&["a", "bb", "ccc"]);

        let batch = fetch_embeddings(&embedder, &input, 2, 3).await;

        assert_eq!(
            batch.embeddings,
            vec![vec![1.0, 1.0], vec![2.0, 1.0], vec![3.0, 1.0]]
        );
        assert!(batch.fallback_indices.is_empty());
    }

    #[tokio::test]
    async fn failed_keyword_gets_zero_vector_of_configured_dimension() {
        let embedder = FakeEmbedder {
            failing: vec!["bb"],
            ..Default::default()
        };
        let input = keywords(&["a", "bb", "ccc"]);

        let batch = fetch_embeddings(&embedder, &input, 768, 2).await;

        assert_eq!(batch.embeddings.len(), 3);
        assert_eq!(batch.embeddings[1], zero_vector(768));
        assert_eq!(batch.embeddings[0], vec![1.0, 1.0]);
        assert_eq!(batch.embeddings[2], vec![3.0, 1.0]);
        assert_eq!(batch.fallback_indices, vec![1]);
        assert_eq!(batch.fallback_count(), 1);
    }

    #[tokio::test]
    async fn all_failures_still_yield_one_vector_per_keyword() {
        let embedder = FakeEmbedder {
            failing: vec!["a", "bb"],
            ..Default::default()
        };
        let input = keywords(&["a", "bb"]);

        let batch = fetch_embeddings(&embedder, &input, 4, 1).await;

        assert_eq!(batch.embeddings, vec![vec![0.0; 4], vec![0.0; 4]]);
        assert_eq!(batch.fallback_indices, vec![0, 1]);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let embedder = FakeEmbedder {
            delay_ms: (["a", "bb", "ccc", "dddd", "eeeee", "ffffff"])
                .into_iter()
                .map(|k| (k, 10))
                .collect(),
            ..Default::default()
        };
        let input = keywords(&["a", "bb", "ccc", "dddd", "eeeee", "ffffff"]);

        fetch_embeddings(&embedder, &input, 2, 2).await;

        assert!(embedder.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn zero_concurrency_runs_sequentially() {
        let embedder = FakeEmbedder {
            delay_ms: HashMap::from([("a", 5), ("bb", 5)]),
            ..Default::default()
        };
        let input = keywords(&["a", "bb"]);

        let batch = fetch_embeddings(&embedder, &input, 2, 0).await;

        assert_eq!(batch.embeddings.len(), 2);
        assert_eq!(embedder.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_batch() {
        let embedder = FakeEmbedder::default();
        let batch = fetch_embeddings(&embedder, &[], 768, 4).await;
        assert!(batch.embeddings.is_empty());
        assert!(batch.fallback_indices.is_empty());
    }
}
