use cluster::KeywordCluster;
use futures::stream::{self, StreamExt};

use crate::Labeler;

/// Labels for a cluster list, parallel to the input clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBatch {
    /// One non-empty label per cluster, in cluster order.
    pub labels: Vec<String>,
    /// Cluster positions that fell back to their center keyword.
    pub fallback_indices: Vec<usize>,
}

impl LabelBatch {
    pub fn fallback_count(&self) -> usize {
        self.fallback_indices.len()
    }
}

/// Normalize a raw completion into a label.
///
/// Trims whitespace, surrounding quotes and a trailing period, and keeps only
/// the first line. Returns `None` when nothing is left.
pub fn clean_label(raw: &str) -> Option<String> {
    let line = raw.trim().lines().next().unwrap_or_default().trim();
    let line = line.trim_matches(|c| matches!(c, '"' | '\'' | '`')).trim();
    let line = line.strip_suffix('.').unwrap_or(line).trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// Label every cluster, keeping cluster order.
///
/// At most `concurrency` calls are in flight (minimum 1). A failed call
/// labels the cluster with its center keyword.
pub async fn label_clusters<L>(
    labeler: &L,
    clusters: &[KeywordCluster],
    concurrency: usize,
) -> LabelBatch
where
    L: Labeler + ?Sized,
{
    let concurrency = concurrency.max(1);

    let mut tagged: Vec<(usize, Option<String>)> =
        stream::iter(clusters.iter().cloned().enumerate())
            .map(|(idx, cluster)| async move {
                match labeler.label(&cluster.keywords).await {
                    Ok(label) => (idx, Some(label)),
                    Err(err) => {
                        tracing::warn!(
                            center = %cluster.center,
                            size = cluster.len(),
                            model = labeler.model_name(),
                            error = %err,
                            "labeling failed, using center keyword"
                        );
                        metrics::counter!("kwcluster_label_fallbacks_total").increment(1);
                        (idx, None)
                    }
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

    tagged.sort_by_key(|(idx, _)| *idx);

    let mut fallback_indices = Vec::new();
    let labels = tagged
        .into_iter()
        .map(|(idx, label)| {
            label.unwrap_or_else(|| {
                fallback_indices.push(idx);
                clusters[idx].center.clone()
            })
        })
        .collect();

    LabelBatch {
        labels,
        fallback_indices,
    }
}
