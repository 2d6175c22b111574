//! External Collaborators
//!
//! The wizard talks to three outside services, each behind a small async
//! trait: a structured-record store, a catalog read service and a
//! notification dispatcher. `RestBackend` implements all three against the
//! hosted database; `InMemoryBackend` implements them locally.

pub mod memory;
pub mod rest;

pub use memory::InMemoryBackend;
pub use rest::RestBackend;

use crate::error::ServiceResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identifier assigned by the record store to an inserted row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable item offered by the catalog service (e.g. a neighbor coupon)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Structured-record store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one record into a logical collection
    async fn insert(&self, collection: &str, record: Value) -> ServiceResult<RecordId>;
}

/// Catalog read service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch every item of a named catalog
    async fn fetch_all(&self, catalog: &str) -> ServiceResult<Vec<CatalogItem>>;
}

/// Outbound notification dispatcher (email etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event_type: &str, payload: Value) -> ServiceResult<()>;
}

/// The three collaborators bundled together, as handed to the TUI
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn RecordStore>,
    pub catalog: Arc<dyn CatalogService>,
    pub notifier: Arc<dyn Notifier>,
}

impl Services {
    /// Use one backend for all three roles
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RecordStore + CatalogService + Notifier + 'static,
    {
        Self {
            store: backend.clone(),
            catalog: backend.clone(),
            notifier: backend,
        }
    }
}
