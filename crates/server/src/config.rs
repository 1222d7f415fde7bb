use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use kwcluster::PipelineConfig;
use serde::{Deserialize, Serialize};
use store::StoreConfig;

/// Development key used when no API keys are configured.
pub const DEMO_API_KEY: &str = "demo-key-12345";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds. Covers the whole pipeline run. A run that
    /// outlives it answers 408 but keeps going in the background, so its
    /// records are still persisted. Large keyword lists against slow
    /// upstreams need roughly `max_keywords / concurrency` upstream timeouts.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Rate limit: requests per minute per API key
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// Keys accepted on protected routes
    #[serde(default)]
    pub api_keys: HashSet<String>,

    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Install the Prometheus recorder and serve it at `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            api_keys: HashSet::new(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            pipeline: PipelineConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `kwcluster.{toml,yaml,json}` (optional) and
    /// `KWCLUSTER__*` environment variables, e.g.
    /// `KWCLUSTER__PIPELINE__EMBEDDING__API_KEY` or
    /// `KWCLUSTER__API_KEYS=key-a,key-b`.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("kwcluster").required(false))
            .add_source(
                config::Environment::with_prefix("KWCLUSTER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api_keys")
                    .try_parsing(true),
            );

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.api_keys.is_empty() {
            tracing::warn!("No API keys configured, using demo key '{DEMO_API_KEY}'");
            config.api_keys.insert(DEMO_API_KEY.to_string());
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_body_size_mb() -> usize {
    2
}

fn default_rate_limit_per_minute() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout(), Duration::from_secs(120));
        assert_eq!(cfg.max_body_size(), 2 * 1024 * 1024);
        assert_eq!(cfg.rate_limit_per_minute, 60);
        assert!(cfg.enable_cors);
        assert!(cfg.metrics_enabled);
        assert_eq!(cfg.store, StoreConfig::InMemory);
        assert_eq!(cfg.pipeline.concurrency, 4);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn nested_sections_deserialize() {
        let cfg: ServerConfig = serde_json::from_str(
            r#"{
                "port": 9000,
                "api_keys": ["a"],
                "store": {"backend": "redb", "path": "/tmp/k.redb"},
                "pipeline": {"max_keywords": 50, "labeler": {"api_key": "l"}}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert!(cfg.api_keys.contains("a"));
        assert_eq!(cfg.store, StoreConfig::redb("/tmp/k.redb"));
        assert_eq!(cfg.pipeline.max_keywords, 50);
        assert!(cfg.pipeline.labeler.has_credentials());
        assert!(!cfg.pipeline.embedding.has_credentials());
    }
}
