//! Hosted Database Backend
//!
//! Talks to a PostgREST-style hosted database over HTTPS: table inserts under
//! `/rest/v1/{table}`, stored procedures under `/rest/v1/rpc/{name}` and edge
//! functions under `/functions/v1/{name}`.

use super::{CatalogItem, CatalogService, Notifier, RecordId, RecordStore};
use crate::error::{ServiceError, ServiceResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// Edge function invoked for notifications unless overridden
pub const DEFAULT_NOTIFY_FUNCTION: &str = "send-form-notification";

/// HTTP client for the hosted record store, catalog RPC and notification function
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    notify_function: String,
}

impl RestBackend {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            notify_function: DEFAULT_NOTIFY_FUNCTION.to_string(),
        })
    }

    /// Use a different edge function for notifications
    pub fn with_notify_function(mut self, name: impl Into<String>) -> Self {
        self.notify_function = name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check_status(response: Response) -> ServiceResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pull the row id out of a `return=representation` insert response
fn extract_record_id(body: &Value) -> ServiceResult<RecordId> {
    let row = match body {
        Value::Array(rows) => rows.first(),
        Value::Object(_) => Some(body),
        _ => None,
    };

    match row.and_then(|r| r.get("id")) {
        Some(Value::String(id)) => Ok(RecordId(id.clone())),
        Some(Value::Number(n)) => Ok(RecordId(n.to_string())),
        _ => Err(ServiceError::Decode(
            "insert response did not contain an id".to_string(),
        )),
    }
}

#[async_trait]
impl RecordStore for RestBackend {
    async fn insert(&self, collection: &str, record: Value) -> ServiceResult<RecordId> {
        let response = self
            .post(&format!("/rest/v1/{}", collection))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        let id = extract_record_id(&body)?;

        tracing::debug!(collection, record_id = %id, "Inserted record");
        Ok(id)
    }
}

#[async_trait]
impl CatalogService for RestBackend {
    async fn fetch_all(&self, catalog: &str) -> ServiceResult<Vec<CatalogItem>> {
        let response = self
            .post(&format!("/rest/v1/rpc/{}", catalog))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        // A procedure returning no rows may answer with `null`
        let items: Option<Vec<CatalogItem>> = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        let items = items.unwrap_or_default();

        tracing::debug!(catalog, count = items.len(), "Fetched catalog");
        Ok(items)
    }
}

#[async_trait]
impl Notifier for RestBackend {
    async fn notify(&self, event_type: &str, payload: Value) -> ServiceResult<()> {
        let body = serde_json::json!({
            "formType": event_type,
            "formData": payload,
        });

        let response = self
            .post(&format!("/functions/v1/{}", self.notify_function))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::debug!(event_type, function = %self.notify_function, "Notification dispatched");
        Ok(())
    }
}
