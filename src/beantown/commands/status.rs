use crate::commands::CmdResult;
use crate::error::Result;
use crate::paging::freshness::{CacheFreshness, InitializeAction};
use crate::store::LocalStore;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub bean_count: usize,
    /// Remote pages with a stored key, ascending
    pub pages: Vec<u32>,
    /// The highest cached page still links to a next page
    pub more_pages: bool,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub cache_timeout: Duration,
    /// What the next paging session would do on start
    pub next_action: InitializeAction,
}

pub async fn run<L: LocalStore + ?Sized>(store: &L, freshness: CacheFreshness) -> Result<CmdResult> {
    let keys = store.remote_keys().await?;
    let last_refreshed = store.most_recent_creation_time().await?;
    let status = CacheStatus {
        bean_count: store.bean_count().await?,
        pages: keys.iter().map(|k| k.current_page).collect(),
        more_pages: keys.last().is_some_and(|k| k.next_page.is_some()),
        last_refreshed,
        cache_timeout: freshness.timeout(),
        next_action: freshness.evaluate(last_refreshed, Utc::now()),
    };
    Ok(CmdResult::default().with_status(status))
}
