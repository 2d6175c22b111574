//! In-Memory Backend
//!
//! Keeps records, catalog and notifications in process memory. Backs the
//! `--offline` mode and the integration tests; individual collections,
//! the catalog or the notifier can be switched to fail on demand.

use super::{CatalogItem, CatalogService, Notifier, RecordId, RecordStore};
use crate::error::{ServiceError, ServiceResult};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Coupons offered when running offline
fn sample_catalog() -> Vec<CatalogItem> {
    [
        ("coupon-dog-walk", "Dog walk", "One neighborhood stroll with your pup", "🐕"),
        ("coupon-ladder", "Borrow a ladder", "Eight-foot ladder, pick up and drop off", "🪜"),
        ("coupon-plants", "Plant sitting", "Watering while you're away for a week", "🪴"),
        ("coupon-soup", "Soup night", "A pot of homemade soup, delivered", "🍲"),
        ("coupon-bike", "Bike tune-up", "Brakes, gears and a fresh chain lube", "🚲"),
    ]
    .into_iter()
    .map(|(id, title, description, icon)| CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, Vec<(RecordId, Value)>>,
    notifications: Vec<(String, Value)>,
    failing_collections: HashSet<String>,
    catalog_fails: bool,
    notify_fails: bool,
}

/// Record store, catalog and notifier held entirely in memory
pub struct InMemoryBackend {
    catalog: Vec<CatalogItem>,
    inner: Mutex<Inner>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Backend seeded with the sample coupon catalog
    pub fn new() -> Self {
        Self::with_catalog(sample_catalog())
    }

    pub fn with_catalog(catalog: Vec<CatalogItem>) -> Self {
        Self {
            catalog,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every insert into `collection` fail
    pub fn fail_collection(&self, collection: &str) {
        self.lock().failing_collections.insert(collection.to_string());
    }

    pub fn fail_catalog(&self) {
        self.lock().catalog_fails = true;
    }

    pub fn fail_notifications(&self) {
        self.lock().notify_fails = true;
    }

    /// Records inserted into `collection`, oldest first
    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.lock()
            .records
            .get(collection)
            .map(|rows| rows.iter().map(|(_, v)| v.clone()).collect())
            .unwrap_or_default()
    }

    /// Notifications dispatched so far as `(event_type, payload)`
    pub fn notifications(&self) -> Vec<(String, Value)> {
        self.lock().notifications.clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryBackend {
    async fn insert(&self, collection: &str, mut record: Value) -> ServiceResult<RecordId> {
        let mut inner = self.lock();
        if inner.failing_collections.contains(collection) {
            return Err(ServiceError::Unavailable(format!(
                "collection '{}' rejected the write",
                collection
            )));
        }

        let id = RecordId(Uuid::new_v4().to_string());
        // Columns the hosted store fills in itself
        if let Value::Object(ref mut row) = record {
            row.insert("id".to_string(), Value::String(id.0.clone()));
            row.insert("created_at".to_string(), Value::String(Utc::now().to_rfc3339()));
        }
        inner
            .records
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), record));
        Ok(id)
    }
}

#[async_trait]
impl CatalogService for InMemoryBackend {
    async fn fetch_all(&self, catalog: &str) -> ServiceResult<Vec<CatalogItem>> {
        if self.lock().catalog_fails {
            return Err(ServiceError::Unavailable(format!(
                "catalog '{}' unavailable",
                catalog
            )));
        }
        Ok(self.catalog.clone())
    }
}

#[async_trait]
impl Notifier for InMemoryBackend {
    async fn notify(&self, event_type: &str, payload: Value) -> ServiceResult<()> {
        let mut inner = self.lock();
        if inner.notify_fails {
            return Err(ServiceError::Unavailable("notifier offline".to_string()));
        }
        inner.notifications.push((event_type.to_string(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let backend = InMemoryBackend::new();
        let a = backend.insert("signups", serde_json::json!({"n": 1})).await.unwrap();
        let b = backend.insert("signups", serde_json::json!({"n": 2})).await.unwrap();

        assert_ne!(a, b);
        let rows = backend.records("signups");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], a.0.as_str());
        assert_eq!(rows[1]["n"], 2);
        assert!(rows[0]["created_at"].is_string());
        assert!(backend.records("claims").is_empty());
    }

    #[tokio::test]
    async fn test_failing_collection_is_isolated() {
        let backend = InMemoryBackend::new();
        backend.fail_collection("claims");

        assert!(backend.insert("claims", serde_json::json!({})).await.is_err());
        assert!(backend.insert("signups", serde_json::json!({})).await.is_ok());
        assert!(backend.records("claims").is_empty());
    }

    #[tokio::test]
    async fn test_sample_catalog_ids_unique() {
        let backend = InMemoryBackend::new();
        let items = backend.fetch_all("get_public_coupons").await.unwrap();
        let ids: HashSet<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        assert!(!items.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_failure() {
        let backend = InMemoryBackend::new();
        backend.fail_catalog();
        assert!(backend.fetch_all("get_public_coupons").await.is_err());
    }

    #[tokio::test]
    async fn test_notifications_recorded_until_failing() {
        let backend = InMemoryBackend::new();
        backend
            .notify("new_neighbor_signup", serde_json::json!({"name": "Asha"}))
            .await
            .unwrap();
        backend.fail_notifications();
        assert!(backend.notify("new_neighbor_signup", serde_json::json!({})).await.is_err());

        let sent = backend.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "new_neighbor_signup");
    }
}
