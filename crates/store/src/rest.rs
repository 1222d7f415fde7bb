use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::{sort_records, ClusterRecord, ClusterStore, StoreError};

const MAX_ERROR_BODY: usize = 512;

/// [`ClusterStore`] over a PostgREST-compatible table.
///
/// Inserts are `POST {url}/rest/v1/{table}` with `Prefer: return=minimal`;
/// listing is `GET {url}/rest/v1/{table}?project_id=eq.<id>&select=*`.
/// Both send the key as `apikey` and as a bearer token.
#[derive(Clone)]
pub struct RestStore {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for RestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RestStore {
    pub fn new(
        url: &str,
        api_key: impl Into<String>,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() || table.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "rest store needs both url and table".into(),
            ));
        }
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StoreError::InvalidConfig("rest store api_key is empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StoreError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{url}/rest/v1/{table}"),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(StoreError::RemoteStatus {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ClusterStore for RestStore {
    async fn insert(&self, record: &ClusterRecord) -> Result<(), StoreError> {
        let response = self
            .authorized(self.http.post(&self.endpoint))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    async fn list(&self, project_id: &str) -> Result<Vec<ClusterRecord>, StoreError> {
        let filter = format!("eq.{project_id}");
        let response = self
            .authorized(self.http.get(&self.endpoint))
            .query(&[("project_id", filter.as_str()), ("select", "*")])
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        let mut records: Vec<ClusterRecord> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        sort_records(&mut records);
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_url_and_table() {
        let store = RestStore::new(
            "https://db.example.com/",
            "anon",
            "keyword_clusters",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            store.endpoint(),
            "https://db.example.com/rest/v1/keyword_clusters"
        );
        assert!(!format!("{store:?}").contains("anon"));
    }

    #[test]
    fn rejects_incomplete_settings() {
        for (url, key, table) in [("", "k", "t"), ("https://x", "", "t"), ("https://x", "k", " ")] {
            let err = RestStore::new(url, key, table, Duration::from_secs(1)).unwrap_err();
            assert!(matches!(err, StoreError::InvalidConfig(_)), "{url} {key} {table}");
        }
    }
}
