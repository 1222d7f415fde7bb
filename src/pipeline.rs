use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cluster::cluster_keywords;
use embedding::{Embedder, HttpEmbedder, fetch_embeddings};
use labeler::{ChatLabeler, Labeler, label_clusters};
use serde::{Deserialize, Serialize};
use store::{ClusterRecord, ClusterStore};
use tracing::Instrument;
use uuid::Uuid;

use crate::{PipelineConfig, PipelineError};

/// Input of one clustering run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRequest {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// When present and non-blank, results are persisted under this project.
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ClusterRequest {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: Some(keywords.into_iter().map(Into::into).collect()),
            project_id: None,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// A cluster with its label, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledCluster {
    /// Same as `label`.
    pub name: String,
    pub label: String,
    pub keywords: Vec<String>,
    pub center_keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterOutcome {
    pub run_id: Uuid,
    pub clusters: Vec<LabeledCluster>,
    /// Records written, or `None` when no project id was given.
    pub persisted: Option<usize>,
    pub persist_failures: usize,
}

/// Drop blank keywords and exact duplicates, first occurrence wins.
///
/// Keywords are kept byte-for-byte; `"seo tools "` and `"seo tools"` are
/// distinct.
pub fn normalize_keywords(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .filter(|keyword| !keyword.trim().is_empty())
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

fn record_stage(stage: &'static str, started: Instant) {
    metrics::histogram!("kwcluster_stage_duration_seconds", "stage" => stage)
        .record(started.elapsed().as_secs_f64());
}

/// Embed, cluster, label and persist keyword lists.
///
/// Cheap to share behind an `Arc`; runs are independent of each other.
pub struct ClusterPipeline {
    config: PipelineConfig,
    embedder: Arc<dyn Embedder>,
    labeler: Arc<dyn Labeler>,
    store: Arc<dyn ClusterStore>,
}

impl std::fmt::Debug for ClusterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterPipeline")
            .field("config", &self.config)
            .field("embedder", &self.embedder.model_name())
            .field("labeler", &self.labeler.model_name())
            .field("store", &self.store.name())
            .finish()
    }
}

impl ClusterPipeline {
    /// Build a pipeline that talks to the configured HTTP services.
    ///
    /// Missing API keys are not an error here; they fail each run instead.
    pub fn from_config(
        config: PipelineConfig,
        store: Arc<dyn ClusterStore>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let embedder = Arc::new(HttpEmbedder::new(&config.embedding)?);
        let labeler = Arc::new(ChatLabeler::new(&config.labeler)?);
        Ok(Self::with_components(config, embedder, labeler, store))
    }

    pub fn with_components(
        config: PipelineConfig,
        embedder: Arc<dyn Embedder>,
        labeler: Arc<dyn Labeler>,
        store: Arc<dyn ClusterStore>,
    ) -> Self {
        Self {
            config,
            embedder,
            labeler,
            store,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ClusterStore> {
        &self.store
    }

    /// Run the whole pipeline for one request.
    ///
    /// Input is checked before credentials, and credentials before any
    /// network call.
    pub async fn run(&self, request: ClusterRequest) -> Result<ClusterOutcome, PipelineError> {
        let keywords = normalize_keywords(request.keywords.unwrap_or_default());
        if keywords.is_empty() {
            return Err(PipelineError::NoKeywords);
        }
        if keywords.len() > self.config.max_keywords {
            return Err(PipelineError::TooManyKeywords {
                count: keywords.len(),
                max: self.config.max_keywords,
            });
        }
        self.config.ensure_credentials()?;

        let project_id = request
            .project_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "cluster_run",
            %run_id,
            keywords = keywords.len(),
            project_id = project_id.as_deref().unwrap_or("-")
        );

        self.run_stages(run_id, keywords, project_id)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        run_id: Uuid,
        keywords: Vec<String>,
        project_id: Option<String>,
    ) -> Result<ClusterOutcome, PipelineError> {
        let concurrency = self.config.concurrency;
        let run_started = Instant::now();

        let started = Instant::now();
        let batch = fetch_embeddings(
            self.embedder.as_ref(),
            &keywords,
            self.config.embedding.dimension,
            concurrency,
        )
        .await;
        record_stage("embed", started);
        tracing::info!(
            fallbacks = batch.fallback_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embeddings fetched"
        );

        let started = Instant::now();
        let clusters = cluster_keywords(
            &keywords,
            &batch.embeddings,
            self.config.similarity_threshold,
        )?;
        record_stage("cluster", started);
        tracing::info!(
            clusters = clusters.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "keywords clustered"
        );

        let started = Instant::now();
        let labels = label_clusters(self.labeler.as_ref(), &clusters, concurrency).await;
        record_stage("label", started);
        tracing::info!(
            fallbacks = labels.fallback_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "clusters labeled"
        );

        let labeled: Vec<LabeledCluster> = clusters
            .into_iter()
            .zip(labels.labels)
            .map(|(cluster, label)| LabeledCluster {
                name: label.clone(),
                label,
                keywords: cluster.keywords,
                center_keyword: cluster.center,
            })
            .collect();

        let (persisted, persist_failures) = match project_id {
            Some(project_id) => {
                let started = Instant::now();
                let (ok, failed) = self.persist(run_id, &project_id, &labeled).await;
                record_stage("persist", started);
                (Some(ok), failed)
            }
            None => (None, 0),
        };

        metrics::counter!("kwcluster_runs_total").increment(1);
        metrics::histogram!("kwcluster_clusters_per_run").record(labeled.len() as f64);
        tracing::info!(
            clusters = labeled.len(),
            persisted = persisted.unwrap_or(0),
            persist_failures,
            elapsed_ms = run_started.elapsed().as_millis() as u64,
            "cluster run finished"
        );

        Ok(ClusterOutcome {
            run_id,
            clusters: labeled,
            persisted,
            persist_failures,
        })
    }

    /// Insert one record per cluster. Failed inserts are logged and counted;
    /// successful ones are kept.
    async fn persist(
        &self,
        run_id: Uuid,
        project_id: &str,
        clusters: &[LabeledCluster],
    ) -> (usize, usize) {
        let created_at = Utc::now();
        let mut ok = 0;
        let mut failed = 0;

        for (position, cluster) in clusters.iter().enumerate() {
            let record = ClusterRecord::new(
                run_id,
                project_id,
                position as u32,
                cluster.label.clone(),
                cluster.keywords.clone(),
                cluster.center_keyword.clone(),
                created_at,
            );
            match self.store.insert(&record).await {
                Ok(()) => ok += 1,
                Err(err) => {
                    failed += 1;
                    metrics::counter!("kwcluster_persist_failures_total").increment(1);
                    tracing::warn!(
                        store = self.store.name(),
                        position,
                        center = %cluster.center_keyword,
                        error = %err,
                        "failed to persist cluster"
                    );
                }
            }
        }

        (ok, failed)
    }
}
