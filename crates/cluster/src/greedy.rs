use serde::{Deserialize, Serialize};

use crate::error::ClusterError;
use crate::similarity::cosine_similarity;

/// A group of keywords that are all similar to the group's seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCluster {
    /// Seed keyword: the first keyword assigned to this cluster.
    pub center: String,
    /// Members in input order; `keywords[0] == center`.
    pub keywords: Vec<String>,
}

impl KeywordCluster {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Partition `keywords` into clusters by cosine similarity to each
/// cluster's seed.
///
/// `embeddings[i]` must belong to `keywords[i]`. Every keyword ends up in
/// exactly one cluster; clusters are returned in the order their seeds
/// appear in the input. A keyword whose similarity to the seed is exactly
/// `threshold` joins the cluster.
pub fn cluster_keywords(
    keywords: &[String],
    embeddings: &[Vec<f32>],
    threshold: f32,
) -> Result<Vec<KeywordCluster>, ClusterError> {
    if keywords.len() != embeddings.len() {
        return Err(ClusterError::LengthMismatch {
            keywords: keywords.len(),
            embeddings: embeddings.len(),
        });
    }
    if !threshold.is_finite() {
        return Err(ClusterError::InvalidThreshold(threshold));
    }

    let mut assigned = vec![false; keywords.len()];
    let mut clusters = Vec::new();

    for seed in 0..keywords.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;

        let mut members = vec![keywords[seed].clone()];
        for candidate in (seed + 1)..keywords.len() {
            if assigned[candidate] {
                continue;
            }
            let similarity = cosine_similarity(&embeddings[seed], &embeddings[candidate]);
            if similarity >= threshold {
                assigned[candidate] = true;
                members.push(keywords[candidate].clone());
            }
        }

        clusters.push(KeywordCluster {
            center: keywords[seed].clone(),
            keywords: members,
        });
    }

    tracing::debug!(
        keywords = keywords.len(),
        clusters = clusters.len(),
        threshold,
        "clustered keywords"
    );

    Ok(clusters)
}
