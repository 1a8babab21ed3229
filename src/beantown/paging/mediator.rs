use super::freshness::{CacheFreshness, InitializeAction};
use super::{LoadType, MediatorResult, PagingState};
use crate::error::{BeanError, Result};
use crate::model::{JellyBean, RemoteKey, FIRST_PAGE};
use crate::network::JellyBeanNetworkSource;
use crate::store::{LocalStore, Transaction};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reconciles the local store with the remote catalog one page at a time.
///
/// Holds no state of its own between calls: which page comes next is read
/// from the remote key of the item at the edge of the consumer's window.
pub struct RemoteMediator<N: ?Sized, L: ?Sized> {
    source: Arc<N>,
    store: Arc<L>,
    freshness: CacheFreshness,
}

impl<N: ?Sized, L: ?Sized> Clone for RemoteMediator<N, L> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            freshness: self.freshness,
        }
    }
}

/// Where a load should go after looking at the consumer's window.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    Fetch(u32),
    /// Nothing to fetch. `key_existed` becomes the end-of-pagination flag.
    Stop { key_existed: bool },
}

impl<N, L> RemoteMediator<N, L>
where
    N: JellyBeanNetworkSource + ?Sized,
    L: LocalStore + ?Sized,
{
    pub fn new(source: Arc<N>, store: Arc<L>) -> Self {
        Self::with_freshness(source, store, CacheFreshness::default())
    }

    pub fn with_freshness(source: Arc<N>, store: Arc<L>, freshness: CacheFreshness) -> Self {
        Self {
            source,
            store,
            freshness,
        }
    }

    /// Decide whether a new session may be served from the cache.
    ///
    /// A failed store read counts as "never fetched".
    pub async fn initialize(&self) -> InitializeAction {
        let last_created = match self.store.most_recent_creation_time().await {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, "could not read cache age, treating cache as stale");
                None
            }
        };
        let action = self.freshness.evaluate(last_created, Utc::now());
        debug!(?last_created, ?action, "cache freshness evaluated");
        action
    }

    /// Run one reconciliation step. Never returns `Err`: every failure is
    /// reported as [`MediatorResult::Error`].
    pub async fn load(&self, load_type: LoadType, state: &PagingState) -> MediatorResult {
        match self.try_load(load_type, state).await {
            Ok(end_of_pagination_reached) => MediatorResult::Success {
                end_of_pagination_reached,
            },
            Err(e) => {
                warn!(?load_type, error = %e, "load failed");
                MediatorResult::Error(e)
            }
        }
    }

    async fn try_load(&self, load_type: LoadType, state: &PagingState) -> Result<bool> {
        let page = match self.resolve_target(load_type, state).await? {
            Target::Fetch(page) => page,
            Target::Stop { key_existed } => {
                debug!(?load_type, key_existed, "no neighbor page to fetch");
                return Ok(key_existed);
            }
        };

        let page_size = state.config.page_size();
        debug!(?load_type, page, page_size, "fetching page");
        let envelope = self.source.get_jelly_beans(page, page_size).await?;
        if envelope.is_error() {
            return Err(BeanError::PageFetch(page));
        }

        let end_of_pagination_reached = envelope.has_reached_end();
        let beans: Vec<JellyBean> = envelope
            .items
            .iter()
            .map(|bean| bean.to_entity(page))
            .collect();
        let fetched = beans.len();
        let key = RemoteKey::for_page(page, envelope.total_pages, Utc::now());

        let mut tx = Transaction::new();
        if load_type == LoadType::Refresh {
            tx = tx.clear_all_remote_keys().clear_all_beans();
        }
        tx = tx.insert_all_beans(beans).insert_remote_key(key);
        self.store.run_transaction(tx).await?;

        debug!(
            ?load_type,
            page,
            fetched,
            end_of_pagination_reached,
            "page committed"
        );
        Ok(end_of_pagination_reached)
    }

    async fn resolve_target(&self, load_type: LoadType, state: &PagingState) -> Result<Target> {
        let (edge, backwards) = match load_type {
            LoadType::Refresh => return Ok(Target::Fetch(FIRST_PAGE)),
            LoadType::Prepend => (state.first_item(), true),
            LoadType::Append => (state.last_item(), false),
        };

        let key = match edge {
            Some(bean) => self.store.remote_key_for_page(bean.page).await?,
            None => None,
        };
        let neighbor = key.as_ref().and_then(|key| {
            if backwards {
                key.prev_page
            } else {
                key.next_page
            }
        });

        Ok(match neighbor {
            Some(page) => Target::Fetch(page),
            None => Target::Stop {
                key_existed: key.is_some(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fake::{network_beans, FakeJellyBeanSource};
    use crate::paging::PagingConfig;
    use crate::store::memory::fixtures::{seed_pages, stored_beans};
    use crate::store::memory::InMemoryStore;
    use chrono::Duration;

    fn setup(count: usize) -> (
        Arc<FakeJellyBeanSource>,
        Arc<InMemoryStore>,
        RemoteMediator<FakeJellyBeanSource, InMemoryStore>,
    ) {
        let source = Arc::new(FakeJellyBeanSource::with_beans(network_beans(count)));
        let store = Arc::new(InMemoryStore::new());
        let mediator = RemoteMediator::new(Arc::clone(&source), Arc::clone(&store));
        (source, store, mediator)
    }

    fn empty_state(page_size: u32) -> PagingState {
        PagingState::empty(PagingConfig::new(page_size))
    }

    async fn window(store: &InMemoryStore, page_size: u32) -> PagingState {
        let beans = store.beans_page(0, usize::MAX).await.unwrap();
        PagingState::new(vec![beans], PagingConfig::new(page_size))
    }

    async fn ids(store: &InMemoryStore) -> Vec<i64> {
        store
            .beans_page(0, usize::MAX)
            .await
            .unwrap()
            .iter()
            .map(|b| b.bean_id)
            .collect()
    }

    #[tokio::test]
    async fn refresh_with_more_data_is_not_end() {
        let (_, _, mediator) = setup(12);
        let result = mediator.load(LoadType::Refresh, &empty_state(10)).await;
        assert_eq!(result.end_of_pagination_reached(), Some(false));
    }

    #[tokio::test]
    async fn refresh_of_whole_data_set_is_end() {
        let (_, _, mediator) = setup(12);
        let result = mediator.load(LoadType::Refresh, &empty_state(12)).await;
        assert_eq!(result.end_of_pagination_reached(), Some(true));
    }

    #[tokio::test]
    async fn refresh_of_empty_data_set_is_end() {
        let (_, store, mediator) = setup(0);
        let result = mediator.load(LoadType::Refresh, &empty_state(10)).await;
        assert_eq!(result.end_of_pagination_reached(), Some(true));

        assert_eq!(store.bean_count().await.unwrap(), 0);
        let key = store.remote_key_for_page(1).await.unwrap().unwrap();
        assert_eq!((key.prev_page, key.next_page), (None, None));
    }

    #[tokio::test]
    async fn refresh_replaces_cache_with_first_page() {
        let (source, store, mediator) = setup(12);
        seed_pages(&store, 30, 10, Utc::now() - Duration::days(1)).await;

        let result = mediator.load(LoadType::Refresh, &empty_state(10)).await;
        assert!(result.is_success());

        assert_eq!(ids(&store).await, (1..=10).collect::<Vec<_>>());
        let keys = store.remote_keys().await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].current_page, 1);
        assert_eq!(keys[0].prev_page, None);
        assert_eq!(keys[0].next_page, Some(2));
        assert_eq!(source.requests(), vec![(1, 10)]);
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let (_, store, mediator) = setup(12);
        mediator.load(LoadType::Refresh, &empty_state(10)).await;
        let first = store.beans_page(0, usize::MAX).await.unwrap();

        mediator.load(LoadType::Refresh, &empty_state(10)).await;
        assert_eq!(store.beans_page(0, usize::MAX).await.unwrap(), first);
        assert_eq!(store.remote_keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_reported_as_error() {
        let (source, store, mediator) = setup(12);
        source.set_simulate_exception(true);

        let result = mediator.load(LoadType::Refresh, &empty_state(10)).await;
        match result {
            MediatorResult::Error(BeanError::Io(e)) => assert_eq!(
                e.to_string(),
                "Simulated exception while trying to fetch page: 1 of size 10 Jelly Beans!"
            ),
            other => panic!("expected io error, got {:?}", other),
        }
        assert_eq!(store.bean_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_response_names_the_page() {
        let (source, store, mediator) = setup(12);
        source.set_simulate_network_error(true);

        let result = mediator.load(LoadType::Refresh, &empty_state(10)).await;
        match result {
            MediatorResult::Error(e) => {
                assert_eq!(e.to_string(), "Failed to fetch page: 1 of Jelly Beans")
            }
            other => panic!("expected error, got {:?}", other),
        }
        assert!(store.remote_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_chains_through_remote_keys() {
        let (source, store, mediator) = setup(25);
        mediator.load(LoadType::Refresh, &empty_state(10)).await;

        let second = mediator.load(LoadType::Append, &window(&store, 10).await).await;
        assert_eq!(second.end_of_pagination_reached(), Some(false));
        let third = mediator.load(LoadType::Append, &window(&store, 10).await).await;
        assert_eq!(third.end_of_pagination_reached(), Some(true));

        assert_eq!(ids(&store).await, (1..=25).collect::<Vec<_>>());
        let keys = store.remote_keys().await.unwrap();
        let links: Vec<_> = keys
            .iter()
            .map(|k| (k.prev_page, k.current_page, k.next_page))
            .collect();
        assert_eq!(
            links,
            vec![(None, 1, Some(2)), (Some(1), 2, Some(3)), (Some(2), 3, None)]
        );
        for pair in keys.windows(2) {
            assert_eq!(pair[0].next_page, Some(pair[1].current_page));
            assert_eq!(pair[1].prev_page, Some(pair[0].current_page));
        }
        assert_eq!(source.requests(), vec![(1, 10), (2, 10), (3, 10)]);

        let beans = store.beans_page(20, 5).await.unwrap();
        assert!(beans.iter().all(|b| b.page == 3));
    }

    #[tokio::test]
    async fn append_after_last_page_stops_with_end() {
        let (source, store, mediator) = setup(12);
        mediator.load(LoadType::Refresh, &empty_state(12)).await;

        let result = mediator.load(LoadType::Append, &window(&store, 12).await).await;
        assert_eq!(result.end_of_pagination_reached(), Some(true));
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn prepend_at_first_page_is_end() {
        let (source, store, mediator) = setup(12);
        mediator.load(LoadType::Refresh, &empty_state(10)).await;

        let result = mediator.load(LoadType::Prepend, &window(&store, 10).await).await;
        assert_eq!(result.end_of_pagination_reached(), Some(true));
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn prepend_fetches_previous_page() {
        let (source, store, mediator) = setup(30);
        let now = Utc::now();
        let page_two = stored_beans(20, 10).split_off(10);
        store
            .run_transaction(
                Transaction::new()
                    .insert_all_beans(page_two.clone())
                    .insert_remote_key(RemoteKey::for_page(2, 3, now)),
            )
            .await
            .unwrap();

        let state = PagingState::new(vec![page_two], PagingConfig::new(10));
        let result = mediator.load(LoadType::Prepend, &state).await;
        assert_eq!(result.end_of_pagination_reached(), Some(false));
        assert_eq!(source.requests(), vec![(1, 10)]);
        assert_eq!(ids(&store).await, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn empty_window_is_not_end() {
        let (source, _, mediator) = setup(12);
        for load_type in [LoadType::Prepend, LoadType::Append] {
            let result = mediator.load(load_type, &empty_state(10)).await;
            assert_eq!(result.end_of_pagination_reached(), Some(false));
        }
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn edge_item_without_key_is_not_end() {
        let (source, store, mediator) = setup(12);
        store.insert_all_beans(stored_beans(3, 10)).await.unwrap();

        let result = mediator.load(LoadType::Append, &window(&store, 10).await).await;
        assert_eq!(result.end_of_pagination_reached(), Some(false));
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn page_beyond_range_is_empty_success() {
        let (_, store, mediator) = setup(12);
        let now = Utc::now();
        let stale = stored_beans(12, 12);
        store
            .run_transaction(
                Transaction::new()
                    .insert_all_beans(stale.clone())
                    .insert_remote_key(RemoteKey {
                        prev_page: None,
                        current_page: 1,
                        next_page: Some(2),
                        created_at: now,
                    }),
            )
            .await
            .unwrap();

        let state = PagingState::new(vec![stale], PagingConfig::new(12));
        let result = mediator.load(LoadType::Append, &state).await;
        assert_eq!(result.end_of_pagination_reached(), Some(true));
        assert_eq!(store.bean_count().await.unwrap(), 12);
        let key = store.remote_key_for_page(2).await.unwrap().unwrap();
        assert_eq!(key.next_page, None);
    }

    #[tokio::test]
    async fn persistence_failure_commits_nothing() {
        let (_, store, mediator) = setup(12);
        seed_pages(&store, 5, 10, Utc::now()).await;
        store.backend().set_simulate_write_error(true);

        let result = mediator.load(LoadType::Refresh, &empty_state(10)).await;
        assert!(matches!(result, MediatorResult::Error(BeanError::Store(_))));
        assert_eq!(ids(&store).await, (1..=5).collect::<Vec<_>>());
        assert_eq!(store.remote_keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn initialize_follows_cache_age() {
        let (_, store, mediator) = setup(12);
        assert_eq!(
            mediator.initialize().await,
            InitializeAction::LaunchInitialRefresh
        );

        seed_pages(&store, 5, 10, Utc::now() - Duration::hours(2)).await;
        assert_eq!(
            mediator.initialize().await,
            InitializeAction::LaunchInitialRefresh
        );

        mediator.load(LoadType::Refresh, &empty_state(10)).await;
        assert_eq!(
            mediator.initialize().await,
            InitializeAction::SkipInitialRefresh
        );
    }
}
