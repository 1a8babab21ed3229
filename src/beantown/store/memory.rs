use super::backend::Tables;
use super::bean_store::BeanStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = BeanStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        BeanStore::from_tables(MemBackend::new(), Tables::default())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{JellyBean, RemoteKey};
    use crate::network::fake::network_beans;
    use crate::store::{LocalStore, Transaction};
    use chrono::{DateTime, Utc};

    /// Beans `1..=count` as stored entities, stamped with their page at
    /// `page_size`.
    pub fn stored_beans(count: usize, page_size: usize) -> Vec<JellyBean> {
        network_beans(count)
            .iter()
            .enumerate()
            .map(|(i, bean)| bean.to_entity((i / page_size) as u32 + 1))
            .collect()
    }

    /// Populate `store` as if every page of a `count`-bean data set had been
    /// fetched at `created_at`.
    pub async fn seed_pages(
        store: &InMemoryStore,
        count: usize,
        page_size: usize,
        created_at: DateTime<Utc>,
    ) {
        let total_pages = count.div_ceil(page_size) as u32;
        let mut tx = Transaction::new().insert_all_beans(stored_beans(count, page_size));
        for page in 1..=total_pages {
            tx = tx.insert_remote_key(RemoteKey::for_page(page, total_pages, created_at));
        }
        store.run_transaction(tx).await.unwrap();
    }
}
