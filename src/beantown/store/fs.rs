use super::bean_store::BeanStore;
use super::fs_backend::FsBackend;
use crate::error::Result;
use std::path::PathBuf;

pub type FileStore = BeanStore<FsBackend>;

impl FileStore {
    /// Open (or lazily create) the store under `root`.
    pub fn open(root: PathBuf) -> Result<Self> {
        BeanStore::with_backend(FsBackend::new(root))
    }
}
