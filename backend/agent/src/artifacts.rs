//! Keyed store of per-response artifact bundles.
//!
//! Append-only for the process lifetime. Keys come from an atomic counter and are
//! never reused.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use eteon_core::ResponseArtifacts;

#[derive(Default)]
pub struct ArtifactStore {
    items: RwLock<HashMap<String, Arc<ResponseArtifacts>>>,
    counter: AtomicU64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bundle under a fresh key. An absent bundle stores nothing and yields
    /// no key.
    pub async fn store(&self, bundle: Option<ResponseArtifacts>) -> Option<String> {
        let bundle = bundle?;
        let key = (self.counter.fetch_add(1, Ordering::Relaxed) + 1).to_string();
        self.items.write().await.insert(key.clone(), Arc::new(bundle));
        Some(key)
    }

    pub async fn lookup(&self, key: &str) -> Option<Arc<ResponseArtifacts>> {
        self.items.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}
