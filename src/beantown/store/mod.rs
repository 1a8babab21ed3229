//! # Storage Layer
//!
//! The local store is the single source of truth for everything the UI shows.
//! The [`LocalStore`] trait is what the sync engine and the paging facade talk
//! to. It holds two tables:
//!
//! - **beans**: [`JellyBean`] rows keyed by `bean_id`, read back in ascending
//!   id order
//! - **remote keys**: one [`RemoteKey`] per fetched page, keyed by
//!   `current_page`
//!
//! ## Transactions
//!
//! Every mutation goes through a [`Transaction`]: an ordered batch of
//! mutations that is applied all-or-nothing by [`LocalStore::run_transaction`].
//! Readers see either the state before the batch or the state after it, never
//! a page of beans without its remote key, and never the empty cache between
//! a refresh's clear and its re-insert.
//!
//! The single-mutation helpers (`insert_all_beans`, `clear_all_beans`, ...) are
//! one-entry transactions.
//!
//! ## Change notification
//!
//! [`LocalStore::subscribe`] hands out a `watch` receiver whose value is bumped
//! after every committed transaction. Paging sessions use it to re-read their
//! window.
//!
//! ## Implementations
//!
//! - [`bean_store::BeanStore`] over a [`backend::StorageBackend`]:
//!   - [`fs::FileStore`]: production, one JSON document on disk
//!   - [`memory::InMemoryStore`]: tests, optional write-failure simulation
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── jellybean.json      # {"beans": {...}, "remote_keys": {...}}
//! └── config.json         # BeanTownConfig
//! ```

use crate::error::Result;
use crate::model::{BeanId, JellyBean, RemoteKey};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

pub mod backend;
pub mod bean_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ClearBeans,
    ClearRemoteKeys,
    /// Insert or replace by `bean_id`
    InsertBeans(Vec<JellyBean>),
    /// Insert or replace by `current_page`
    InsertRemoteKey(RemoteKey),
}

/// An ordered batch of mutations committed atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    mutations: Vec<Mutation>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all_beans(mut self) -> Self {
        self.mutations.push(Mutation::ClearBeans);
        self
    }

    pub fn clear_all_remote_keys(mut self) -> Self {
        self.mutations.push(Mutation::ClearRemoteKeys);
        self
    }

    pub fn insert_all_beans(mut self, beans: Vec<JellyBean>) -> Self {
        self.mutations.push(Mutation::InsertBeans(beans));
        self
    }

    pub fn insert_remote_key(mut self, key: RemoteKey) -> Self {
        self.mutations.push(Mutation::InsertRemoteKey(key));
        self
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Abstract interface for the local bean cache.
///
/// Implementations are shared between paging sessions and point lookups, so
/// every method takes `&self` and must be safe to call concurrently.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Apply all mutations of `tx`, or none of them.
    async fn run_transaction(&self, tx: Transaction) -> Result<()>;

    async fn get_bean(&self, bean_id: BeanId) -> Result<Option<JellyBean>>;

    /// Ordered read cursor: up to `limit` beans starting at `offset`, by
    /// ascending `bean_id`.
    async fn beans_page(&self, offset: usize, limit: usize) -> Result<Vec<JellyBean>>;

    async fn bean_count(&self) -> Result<usize>;

    async fn remote_key_for_page(&self, page: u32) -> Result<Option<RemoteKey>>;

    /// All remote keys by ascending page.
    async fn remote_keys(&self) -> Result<Vec<RemoteKey>>;

    /// Latest `created_at` across all remote keys.
    async fn most_recent_creation_time(&self) -> Result<Option<DateTime<Utc>>>;

    /// Receiver bumped after every committed transaction.
    fn subscribe(&self) -> watch::Receiver<u64>;

    async fn insert_all_beans(&self, beans: Vec<JellyBean>) -> Result<()> {
        self.run_transaction(Transaction::new().insert_all_beans(beans))
            .await
    }

    async fn clear_all_beans(&self) -> Result<()> {
        self.run_transaction(Transaction::new().clear_all_beans())
            .await
    }

    async fn insert_remote_key(&self, key: RemoteKey) -> Result<()> {
        self.run_transaction(Transaction::new().insert_remote_key(key))
            .await
    }

    async fn clear_all_remote_keys(&self) -> Result<()> {
        self.run_transaction(Transaction::new().clear_all_remote_keys())
            .await
    }
}
