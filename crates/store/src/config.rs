use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ClusterStore, InMemoryStore, RestStore, StoreError};

fn default_table() -> String {
    "keyword_clusters".into()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Selects and configures a [`ClusterStore`] backend.
///
/// ```
/// use store::StoreConfig;
///
/// let cfg: StoreConfig = serde_json::from_str(r#"{"backend": "in_memory"}"#).unwrap();
/// assert_eq!(cfg, StoreConfig::InMemory);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    InMemory,
    /// Embedded file store at `path`.
    Redb { path: String },
    /// PostgREST-compatible HTTP table.
    Rest {
        url: String,
        api_key: String,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => f.write_str("InMemory"),
            Self::Redb { path } => f.debug_struct("Redb").field("path", path).finish(),
            Self::Rest {
                url,
                table,
                timeout_secs,
                ..
            } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("api_key", &"<redacted>")
                .field("table", table)
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn redb<P: Into<String>>(path: P) -> Self {
        Self::Redb { path: path.into() }
    }

    /// Build the configured backend.
    pub fn build(&self) -> Result<Arc<dyn ClusterStore>, StoreError> {
        match self {
            Self::InMemory => Ok(Arc::new(InMemoryStore::new())),
            Self::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Arc::new(crate::RedbStore::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::InvalidConfig(
                        "redb backend disabled at compile time".into(),
                    ))
                }
            }
            Self::Rest {
                url,
                api_key,
                table,
                timeout_secs,
            } => Ok(Arc::new(RestStore::new(
                url,
                api_key.clone(),
                table,
                Duration::from_secs(*timeout_secs),
            )?)),
        }
    }
}
