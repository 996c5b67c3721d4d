use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::Destination;

pub mod loader;

pub use loader::{load, parse_catalog, CatalogSource};

/// Immutable catalog snapshot
///
/// Built once per load and never mutated; a reload produces a new snapshot.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    destinations: Vec<Destination>,
    loaded_at: DateTime<Utc>,
}

impl CatalogStore {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self {
            destinations,
            loaded_at: Utc::now(),
        }
    }

    /// Read-only view of every destination, in source order
    pub fn all(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Shared pointer to the current catalog snapshot
///
/// Readers take an `Arc` to one snapshot and keep matching against it even if a reload
/// publishes a newer one in the meantime.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<CatalogStore>>>,
}

impl CatalogHandle {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    /// Returns the snapshot current at the time of the call
    pub async fn snapshot(&self) -> Arc<CatalogStore> {
        self.current.read().await.clone()
    }

    /// Publishes a new snapshot, returning the one it replaced
    pub async fn replace(&self, store: CatalogStore) -> Arc<CatalogStore> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(store))
    }
}
