//! # Paging
//!
//! The sync engine that keeps the local cache in step with the remote, paged
//! catalog.
//!
//! ```text
//!   PagingSession ──reads──▶ LocalStore ◀──commits── RemoteMediator ──fetches──▶ network
//!        │                                                ▲
//!        └──────────── load(LoadType, PagingState) ───────┘
//! ```
//!
//! - [`mediator::RemoteMediator`]: resolves which remote page a load needs,
//!   fetches it and commits beans plus remote key in one transaction
//! - [`freshness::CacheFreshness`]: decides at session start whether the
//!   cache is recent enough to skip the initial refresh
//! - [`pager::Pager`] / [`pager::PagingSession`]: the ordered, lazily paged
//!   view over the store that calls the mediator when it runs out of rows
//!
//! The mediator never keeps state between calls. Everything it needs to
//! resume (the page chain) lives in the store's remote key table.

use crate::error::BeanError;
use crate::model::JellyBean;
use std::sync::Arc;

pub mod freshness;
pub mod mediator;
pub mod pager;

pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Direction of one reconciliation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadType {
    /// Re-anchor from the first page, replacing the cache.
    Refresh,
    /// Extend before the first loaded item.
    Prepend,
    /// Extend past the last loaded item.
    Append,
}

/// Page geometry for a session. Built through [`PagingConfig::new`], which
/// keeps `page_size` at one or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    page_size: u32,
    enable_placeholders: bool,
    prefetch_distance: u32,
    initial_load_size: u32,
}

impl PagingConfig {
    pub fn new(page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            enable_placeholders: false,
            prefetch_distance: page_size,
            initial_load_size: page_size.saturating_mul(3),
        }
    }

    pub fn with_prefetch_distance(mut self, distance: u32) -> Self {
        self.prefetch_distance = distance;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Always `false` for this catalog; kept so callers can see the contract.
    pub fn enable_placeholders(&self) -> bool {
        self.enable_placeholders
    }

    /// How close to the end of the loaded window an access must come before
    /// the next page is requested.
    pub fn prefetch_distance(&self) -> u32 {
        self.prefetch_distance
    }

    /// Rows read from the store when a session (re)opens its window.
    pub fn initial_load_size(&self) -> u32 {
        self.initial_load_size
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// What the consumer currently has loaded, as seen by the mediator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingState {
    pub pages: Vec<Vec<JellyBean>>,
    pub anchor_position: Option<usize>,
    pub config: PagingConfig,
}

impl PagingState {
    pub fn new(pages: Vec<Vec<JellyBean>>, config: PagingConfig) -> Self {
        Self {
            pages,
            anchor_position: None,
            config,
        }
    }

    pub fn empty(config: PagingConfig) -> Self {
        Self::new(Vec::new(), config)
    }

    pub fn first_item(&self) -> Option<&JellyBean> {
        self.pages.iter().find_map(|page| page.first())
    }

    pub fn last_item(&self) -> Option<&JellyBean> {
        self.pages.iter().rev().find_map(|page| page.last())
    }
}

/// Outcome of [`mediator::RemoteMediator::load`].
#[derive(Debug)]
pub enum MediatorResult {
    Success { end_of_pagination_reached: bool },
    Error(BeanError),
}

impl MediatorResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MediatorResult::Success { .. })
    }

    pub fn end_of_pagination_reached(&self) -> Option<bool> {
        match self {
            MediatorResult::Success {
                end_of_pagination_reached,
            } => Some(*end_of_pagination_reached),
            MediatorResult::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadState {
    NotLoading { end_of_pagination_reached: bool },
    Loading,
    Error(Arc<BeanError>),
}

impl LoadState {
    pub fn is_end(&self) -> bool {
        matches!(
            self,
            LoadState::NotLoading {
                end_of_pagination_reached: true
            }
        )
    }

    pub fn error(&self) -> Option<&BeanError> {
        match self {
            LoadState::Error(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::NotLoading {
            end_of_pagination_reached: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl LoadStates {
    pub fn get_mut(&mut self, load_type: LoadType) -> &mut LoadState {
        match load_type {
            LoadType::Refresh => &mut self.refresh,
            LoadType::Prepend => &mut self.prepend,
            LoadType::Append => &mut self.append,
        }
    }
}
