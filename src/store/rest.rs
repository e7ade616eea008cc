use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::error::ConfigError;
use crate::models::{ART_SUBMISSIONS_TABLE, ArtSubmission, ArtSubmissionInput};

use super::{ArtStore, StoreError};

/// PostgREST-dialect client for the hosted store.
pub struct RestStore {
    client: reqwest::Client,
    insert_url: Url,
    list_url: Url,
    access_key: String,
}

/// Error body the store sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default, alias = "msg")]
    message: Option<String>,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("store client: {e}")))?;

        let insert_url = table_url(&config.endpoint, ART_SUBMISSIONS_TABLE)?;
        let mut list_url = insert_url.clone();
        list_url
            .query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        Ok(Self {
            client,
            insert_url,
            list_url,
            access_key: config.access_key.clone(),
        })
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
    }
}

#[async_trait]
impl ArtStore for RestStore {
    async fn insert(&self, record: &ArtSubmissionInput) -> Result<(), StoreError> {
        tracing::debug!("Inserting artwork into {}", self.insert_url.path());

        let resp = self
            .authorized(self.client.post(self.insert_url.clone()))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| StoreError::transport(e.to_string()))?;

        check_status(resp).await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<ArtSubmission>, StoreError> {
        tracing::debug!("Fetching artworks from {}", self.insert_url.path());

        let resp = self
            .authorized(self.client.get(self.list_url.clone()))
            .send()
            .await
            .map_err(|e| StoreError::transport(e.to_string()))?;

        check_status(resp)
            .await?
            .json::<Vec<ArtSubmission>>()
            .await
            .map_err(|e| StoreError::decode(e.to_string()))
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<StoreErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    Err(StoreError::rejected(status.as_u16(), message))
}

/// `{endpoint}/rest/v1/{table}`, keeping any path prefix on the endpoint.
fn table_url(endpoint: &Url, table: &str) -> Result<Url, ConfigError> {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| ConfigError::Invalid("STORE_ENDPOINT_URL: not a base URL".to_string()))?
        .pop_if_empty()
        .extend(["rest", "v1", table]);
    Ok(url)
}
