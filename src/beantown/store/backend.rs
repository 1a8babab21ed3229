use super::Mutation;
use crate::error::Result;
use crate::model::{BeanId, JellyBean, RemoteKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full contents of the local store.
///
/// `BTreeMap` keeps beans ordered by id and keys ordered by page, which is the
/// order every reader wants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub beans: BTreeMap<BeanId, JellyBean>,
    #[serde(default)]
    pub remote_keys: BTreeMap<u32, RemoteKey>,
}

impl Tables {
    pub fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::ClearBeans => self.beans.clear(),
            Mutation::ClearRemoteKeys => self.remote_keys.clear(),
            Mutation::InsertBeans(beans) => {
                for bean in beans {
                    self.beans.insert(bean.bean_id, bean.clone());
                }
            }
            Mutation::InsertRemoteKey(key) => {
                self.remote_keys.insert(key.current_page, key.clone());
            }
        }
    }
}

/// Abstract interface for raw storage I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `BeanStore` handles the "what" (transactions, ordering, notification).
/// Calls are synchronous: `BeanStore` relies on there being no suspension
/// point between persisting a snapshot and publishing it.
pub trait StorageBackend: Send + Sync {
    /// Load the persisted tables. A store that was never written loads empty.
    fn load_tables(&self) -> Result<Tables>;

    /// Replace the persisted tables.
    /// MUST be atomic: after a failure the previous snapshot stays intact.
    fn save_tables(&self, tables: &Tables) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}
