//! # API Facade
//!
//! The API layer is a **thin facade** over the paging engine and the command
//! layer. It is the single entry point for all beantown operations, whatever
//! the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Hands out paging sessions** (`jelly_beans`) and point lookups
//!   (`get_jelly_bean`)
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no I/O of its own beyond what the store and the data source do,
//! and never formats output.
//!
//! ## Generic Over Source and Store
//!
//! `BeanTownApi<N, L>` is generic over the remote data source and the local
//! store:
//! - Production: `BeanTownApi<HttpJellyBeanSource, FileStore>`
//! - Testing: `BeanTownApi<FakeJellyBeanSource, InMemoryStore>`
//!
//! Both are held in `Arc`s and shared by every session the API creates.

use crate::commands;
use crate::config::BeanTownConfig;
use crate::error::Result;
use crate::model::{BeanId, JellyBean};
use crate::network::JellyBeanNetworkSource;
use crate::paging::mediator::RemoteMediator;
use crate::paging::pager::{Pager, PagingSession};
use crate::paging::PagingConfig;
use crate::store::LocalStore;
use std::sync::Arc;

pub struct BeanTownApi<N: ?Sized, L: ?Sized> {
    source: Arc<N>,
    store: Arc<L>,
    config: BeanTownConfig,
    paths: commands::BeanTownPaths,
}

impl<N, L> BeanTownApi<N, L>
where
    N: JellyBeanNetworkSource + ?Sized,
    L: LocalStore + ?Sized,
{
    pub fn new(
        source: Arc<N>,
        store: Arc<L>,
        config: BeanTownConfig,
        paths: commands::BeanTownPaths,
    ) -> Self {
        Self {
            source,
            store,
            config,
            paths,
        }
    }

    pub fn pager(&self, paging: PagingConfig) -> Pager<N, L> {
        let mediator = RemoteMediator::with_freshness(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            self.config.freshness(),
        );
        Pager::new(paging, mediator, Arc::clone(&self.store))
    }

    /// An ordered, lazily paged view of the catalog. Call
    /// [`PagingSession::start`] before reading.
    pub fn jelly_beans(&self, paging: PagingConfig) -> PagingSession<N, L> {
        self.pager(paging).session()
    }

    /// Cached bean by id. `None` when absent or when the store cannot be read.
    pub async fn get_jelly_bean(&self, bean_id: BeanId) -> Option<JellyBean> {
        commands::show::lookup(self.store.as_ref(), bean_id).await
    }

    pub async fn refresh(&self, page_size: Option<u32>) -> Result<commands::CmdResult> {
        commands::refresh::run(&self.pager(self.config.paging_config(page_size))).await
    }

    pub async fn list_beans(
        &self,
        page_size: Option<u32>,
        limit: Option<usize>,
    ) -> Result<commands::CmdResult> {
        commands::list::run(&self.pager(self.config.paging_config(page_size)), limit).await
    }

    pub async fn show_bean(&self, bean_id: BeanId) -> Result<commands::CmdResult> {
        Ok(commands::show::run(self.store.as_ref(), bean_id).await)
    }

    pub async fn status(&self) -> Result<commands::CmdResult> {
        commands::status::run(self.store.as_ref(), self.config.freshness()).await
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::BeanTownPaths {
        &self.paths
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::status::CacheStatus;
pub use commands::{BeanTownPaths, CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fake::{network_beans, FakeJellyBeanSource};
    use crate::paging::freshness::InitializeAction;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    struct Harness {
        source: Arc<FakeJellyBeanSource>,
        api: BeanTownApi<FakeJellyBeanSource, InMemoryStore>,
        _dir: TempDir,
    }

    fn harness(count: usize) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(FakeJellyBeanSource::with_beans(network_beans(count)));
        let mut config = BeanTownConfig::default();
        config.page_size = 10;
        let api = BeanTownApi::new(
            Arc::clone(&source),
            Arc::new(InMemoryStore::new()),
            config,
            BeanTownPaths::new(dir.path().to_path_buf()),
        );
        Harness {
            source,
            api,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn get_jelly_bean_reads_only_the_cache() {
        let h = harness(12);
        assert_eq!(h.api.get_jelly_bean(1).await, None);
        assert!(h.source.requests().is_empty());

        let mut session = h.api.jelly_beans(PagingConfig::new(10));
        session.start().await.unwrap();
        assert_eq!(
            h.api.get_jelly_bean(3).await.map(|b| b.flavor_name),
            Some("Flavor 3".to_string())
        );
        assert_eq!(h.api.get_jelly_bean(11).await, None);
    }

    struct UnreadableStore;

    #[async_trait::async_trait]
    impl LocalStore for UnreadableStore {
        async fn run_transaction(&self, _tx: crate::store::Transaction) -> Result<()> {
            Err(crate::error::BeanError::Store("read-only".into()))
        }
        async fn get_bean(&self, _bean_id: BeanId) -> Result<Option<JellyBean>> {
            Err(crate::error::BeanError::Store("unreadable".into()))
        }
        async fn beans_page(&self, _offset: usize, _limit: usize) -> Result<Vec<JellyBean>> {
            Ok(Vec::new())
        }
        async fn bean_count(&self) -> Result<usize> {
            Ok(0)
        }
        async fn remote_key_for_page(&self, _page: u32) -> Result<Option<crate::model::RemoteKey>> {
            Ok(None)
        }
        async fn remote_keys(&self) -> Result<Vec<crate::model::RemoteKey>> {
            Ok(Vec::new())
        }
        async fn most_recent_creation_time(&self) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
            Ok(None)
        }
        fn subscribe(&self) -> tokio::sync::watch::Receiver<u64> {
            tokio::sync::watch::channel(0).1
        }
    }

    #[tokio::test]
    async fn get_jelly_bean_swallows_store_errors() {
        let dir = tempfile::tempdir().unwrap();
        let api = BeanTownApi::new(
            Arc::new(FakeJellyBeanSource::new()),
            Arc::new(UnreadableStore),
            BeanTownConfig::default(),
            BeanTownPaths::new(dir.path().to_path_buf()),
        );
        assert_eq!(api.get_jelly_bean(1).await, None);
    }

    #[tokio::test]
    async fn list_uses_configured_page_size() {
        let h = harness(25);
        let res = h.api.list_beans(None, None).await.unwrap();
        assert_eq!(res.listed_beans.len(), 25);
        assert_eq!(h.source.requests()[0], (1, 10));

        let h = harness(25);
        h.api.list_beans(Some(5), Some(5)).await.unwrap();
        assert_eq!(h.source.requests(), vec![(1, 5)]);
    }

    #[tokio::test]
    async fn status_after_refresh_skips_next_refresh() {
        let h = harness(25);
        h.api.refresh(None).await.unwrap();

        let status = h.api.status().await.unwrap().status.unwrap();
        assert_eq!(status.bean_count, 10);
        assert!(status.more_pages);
        assert_eq!(status.next_action, InitializeAction::SkipInitialRefresh);
    }

    #[tokio::test]
    async fn show_dispatches_to_lookup() {
        let h = harness(3);
        let res = h.api.show_bean(2).await.unwrap();
        assert!(res.bean.is_none());
        assert_eq!(res.messages.len(), 1);
    }

    #[test]
    fn config_dispatches_to_paths() {
        let h = harness(0);
        h.api
            .config(ConfigAction::Set("cache-timeout".into(), "60".into()))
            .unwrap();
        assert!(h.api.paths().data_dir.join("config.json").exists());
    }
}
