use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use kwcluster::ClusterPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use subtle::ConstantTimeEq;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,

    /// Rate limit tracking: API key -> (count, window_start)
    pub rate_limiter: Arc<DashMap<String, (u32, Instant)>>,

    /// Clustering pipeline (shared across requests)
    pub pipeline: Arc<ClusterPipeline>,

    /// Renders `/metrics` when a Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Build the store and pipeline described by `config`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = config.store.build()?;
        let pipeline = ClusterPipeline::from_config(config.pipeline.clone(), store)?;
        tracing::info!(store = pipeline.store().name(), "pipeline ready");
        Ok(Self::with_pipeline(config, Arc::new(pipeline)))
    }

    /// Use an already-built pipeline.
    pub fn with_pipeline(config: ServerConfig, pipeline: Arc<ClusterPipeline>) -> Self {
        Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            pipeline,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Check if API key is valid. Compares against every configured key in
    /// constant time per key.
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        let mut matched = subtle::Choice::from(0u8);
        for candidate in &self.config.api_keys {
            matched |= candidate.as_bytes().ct_eq(key.as_bytes());
        }
        matched.into()
    }

    /// Fixed one-minute window per API key.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(60);
        let limit = self.config.rate_limit_per_minute;

        let mut entry = self.rate_limiter.entry(key.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
