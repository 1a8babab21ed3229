use super::backend::{StorageBackend, Tables};
use super::{LocalStore, Transaction};
use crate::error::Result;
use crate::model::{BeanId, JellyBean, RemoteKey};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

/// [`LocalStore`] over any [`StorageBackend`].
///
/// The whole table set is kept in memory behind a `RwLock`. A transaction
/// applies its mutations to a copy, persists the copy through the backend and
/// only then swaps it in, so a failed write leaves both the backend and the
/// in-memory view untouched.
///
/// Each commit hands the full table set to the backend and does so
/// synchronously while holding the write lock. For [`super::fs::FileStore`]
/// that is a rewrite of the whole JSON document, O(cache size) per page.
pub struct BeanStore<B: StorageBackend> {
    pub(crate) backend: B,
    tables: RwLock<Tables>,
    version: watch::Sender<u64>,
}

impl<B: StorageBackend> BeanStore<B> {
    /// Open a store, loading whatever the backend already holds.
    pub fn with_backend(backend: B) -> Result<Self> {
        let tables = backend.load_tables()?;
        debug!(
            location = %backend.location(),
            beans = tables.beans.len(),
            pages = tables.remote_keys.len(),
            "opened bean store"
        );
        Ok(Self::from_tables(backend, tables))
    }

    pub(crate) fn from_tables(backend: B, tables: Tables) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            backend,
            tables: RwLock::new(tables),
            version,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: StorageBackend> LocalStore for BeanStore<B> {
    async fn run_transaction(&self, tx: Transaction) -> Result<()> {
        if tx.is_empty() {
            return Ok(());
        }

        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        for mutation in tx.mutations() {
            next.apply(mutation);
        }

        // No await between persisting and publishing: a cancelled caller can
        // never leave the backend ahead of the in-memory view.
        if let Err(e) = self.backend.save_tables(&next) {
            warn!(location = %self.backend.location(), error = %e, "transaction rolled back");
            return Err(e);
        }
        *tables = next;
        let (beans, pages) = (tables.beans.len(), tables.remote_keys.len());
        drop(tables);

        self.version.send_modify(|v| *v += 1);
        debug!(
            mutations = tx.mutations().len(),
            beans, pages, "transaction committed"
        );
        Ok(())
    }

    async fn get_bean(&self, bean_id: BeanId) -> Result<Option<JellyBean>> {
        Ok(self.tables.read().await.beans.get(&bean_id).cloned())
    }

    async fn beans_page(&self, offset: usize, limit: usize) -> Result<Vec<JellyBean>> {
        let tables = self.tables.read().await;
        Ok(tables
            .beans
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn bean_count(&self) -> Result<usize> {
        Ok(self.tables.read().await.beans.len())
    }

    async fn remote_key_for_page(&self, page: u32) -> Result<Option<RemoteKey>> {
        Ok(self.tables.read().await.remote_keys.get(&page).cloned())
    }

    async fn remote_keys(&self) -> Result<Vec<RemoteKey>> {
        Ok(self
            .tables
            .read()
            .await
            .remote_keys
            .values()
            .cloned()
            .collect())
    }

    async fn most_recent_creation_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .tables
            .read()
            .await
            .remote_keys
            .values()
            .map(|key| key.created_at)
            .max())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
