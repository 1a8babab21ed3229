use super::freshness::InitializeAction;
use super::mediator::RemoteMediator;
use super::{LoadState, LoadStates, LoadType, MediatorResult, PagingConfig, PagingState};
use crate::error::{BeanError, Result};
use crate::model::{JellyBean, FIRST_PAGE};
use crate::network::JellyBeanNetworkSource;
use crate::store::LocalStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Factory for paging sessions over one store and one mediator.
pub struct Pager<N: ?Sized, L: ?Sized> {
    config: PagingConfig,
    mediator: RemoteMediator<N, L>,
    store: Arc<L>,
}

impl<N: ?Sized, L: ?Sized> Clone for Pager<N, L> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            mediator: self.mediator.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<N, L> Pager<N, L>
where
    N: JellyBeanNetworkSource + ?Sized,
    L: LocalStore + ?Sized,
{
    pub fn new(config: PagingConfig, mediator: RemoteMediator<N, L>, store: Arc<L>) -> Self {
        Self {
            config,
            mediator,
            store,
        }
    }

    /// A fresh, not yet started session. Call [`PagingSession::start`] before
    /// reading from it.
    pub fn session(&self) -> PagingSession<N, L> {
        PagingSession {
            config: self.config,
            mediator: self.mediator.clone(),
            changes: self.store.subscribe(),
            store: Arc::clone(&self.store),
            items: Vec::new(),
            load_states: LoadStates::default(),
            last_accessed: None,
        }
    }
}

/// An ordered, lazily extended window over the local store.
///
/// The window always starts at the first bean (ascending `bean_id`) and grows
/// a page at a time, first from rows already cached, then by asking the
/// mediator to append the next remote page.
pub struct PagingSession<N: ?Sized, L: ?Sized> {
    config: PagingConfig,
    mediator: RemoteMediator<N, L>,
    store: Arc<L>,
    changes: watch::Receiver<u64>,
    items: Vec<JellyBean>,
    load_states: LoadStates,
    last_accessed: Option<usize>,
}

impl<N, L> PagingSession<N, L>
where
    N: JellyBeanNetworkSource + ?Sized,
    L: LocalStore + ?Sized,
{
    pub fn items(&self) -> &[JellyBean] {
        &self.items
    }

    pub fn load_states(&self) -> &LoadStates {
        &self.load_states
    }

    /// The loaded window split into pages, as handed to the mediator.
    pub fn paging_state(&self) -> PagingState {
        let pages = self
            .items
            .chunks(self.config.page_size() as usize)
            .map(|chunk| chunk.to_vec())
            .collect();
        PagingState {
            pages,
            anchor_position: self.last_accessed,
            config: self.config,
        }
    }

    /// Consult the freshness gate, refresh if it asks for it, then open the
    /// window. A fresh cache whose first page was fetched at another page
    /// size is refreshed as well.
    pub async fn start(&mut self) -> Result<()> {
        if self.mediator.initialize().await == InitializeAction::LaunchInitialRefresh {
            return self.refresh().await;
        }
        if !self.cached_page_size_matches().await? {
            debug!(page_size = self.config.page_size(), "cached pages use another page size");
            return self.refresh().await;
        }
        debug!("serving cached beans");
        self.reload(self.config.initial_load_size() as usize).await
    }

    /// Re-anchor from the first remote page. A failed fetch is recorded in
    /// [`LoadStates::refresh`] and leaves the window as it was.
    pub async fn refresh(&mut self) -> Result<()> {
        self.load_states.refresh = LoadState::Loading;
        let result = self
            .mediator
            .load(LoadType::Refresh, &self.paging_state())
            .await;

        if let MediatorResult::Success {
            end_of_pagination_reached,
        } = result
        {
            self.load_states.prepend = LoadState::NotLoading {
                end_of_pagination_reached,
            };
            self.load_states.append = LoadState::NotLoading {
                end_of_pagination_reached,
            };
            self.items.clear();
        }
        self.record(LoadType::Refresh, result);
        self.reload(self.config.initial_load_size() as usize).await
    }

    /// Grow the window by one page. Returns `true` if new items arrived.
    pub async fn load_next(&mut self) -> Result<bool> {
        let before = self.items.len();
        let target = before + self.config.page_size() as usize;

        if self.store.bean_count().await? > before {
            self.reload(target).await?;
            return Ok(self.items.len() > before);
        }
        if self.load_states.append.is_end() {
            return Ok(false);
        }

        self.load_states.append = LoadState::Loading;
        let result = self
            .mediator
            .load(LoadType::Append, &self.paging_state())
            .await;
        let succeeded = result.is_success();
        self.record(LoadType::Append, result);
        if !succeeded {
            return Ok(false);
        }

        self.reload(target).await?;
        Ok(self.items.len() > before)
    }

    /// Ask the mediator for the page before the first loaded item. Returns
    /// `true` if the store gained rows.
    pub async fn load_previous(&mut self) -> Result<bool> {
        if self.load_states.prepend.is_end() {
            return Ok(false);
        }
        let before = self.store.bean_count().await?;

        self.load_states.prepend = LoadState::Loading;
        let result = self
            .mediator
            .load(LoadType::Prepend, &self.paging_state())
            .await;
        self.record(LoadType::Prepend, result);

        let target = self.items.len().max(self.config.initial_load_size() as usize);
        self.reload(target).await?;
        Ok(self.store.bean_count().await? > before)
    }

    /// Item at `index`, fetching ahead when the access comes within the
    /// prefetch distance of the loaded end.
    pub async fn get(&mut self, index: usize) -> Result<Option<JellyBean>> {
        self.last_accessed = Some(index);
        if index.saturating_add(self.config.prefetch_distance() as usize) >= self.items.len() {
            self.load_next().await?;
        }
        Ok(self.items.get(index).cloned())
    }

    /// Load every remaining page and return the full ordered list.
    pub async fn snapshot(&mut self) -> Result<Vec<JellyBean>> {
        while self.load_next().await? {}
        Ok(self.items.clone())
    }

    /// Wait for the next committed store change, then re-read the window.
    pub async fn changed(&mut self) -> Result<()> {
        self.changes
            .changed()
            .await
            .map_err(|_| BeanError::Store("Store closed".to_string()))?;
        let target = self.items.len().max(self.config.initial_load_size() as usize);
        self.reload(target).await
    }

    /// A first page with more pages behind it must hold exactly one page of
    /// rows, otherwise the cached `page` stamps do not line up with this
    /// session's page numbers.
    async fn cached_page_size_matches(&self) -> Result<bool> {
        let has_next = self
            .store
            .remote_key_for_page(FIRST_PAGE)
            .await?
            .is_some_and(|key| key.next_page.is_some());
        if !has_next {
            return Ok(true);
        }
        let page_size = self.config.page_size() as usize;
        let first_page = self
            .store
            .beans_page(0, page_size + 1)
            .await?
            .iter()
            .filter(|bean| bean.page == FIRST_PAGE)
            .count();
        Ok(first_page == page_size)
    }

    async fn reload(&mut self, len: usize) -> Result<()> {
        self.changes.borrow_and_update();
        self.items = self.store.beans_page(0, len).await?;
        debug!(loaded = self.items.len(), "window reloaded");
        Ok(())
    }

    fn record(&mut self, load_type: LoadType, result: MediatorResult) {
        *self.load_states.get_mut(load_type) = match result {
            MediatorResult::Success {
                end_of_pagination_reached,
            } => LoadState::NotLoading {
                end_of_pagination_reached: load_type != LoadType::Refresh
                    && end_of_pagination_reached,
            },
            MediatorResult::Error(e) => LoadState::Error(Arc::new(e)),
        };
    }
}
