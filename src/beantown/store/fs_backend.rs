use super::backend::{StorageBackend, Tables};
use crate::error::{BeanError, Result};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub const DB_FILENAME: &str = "jellybean.json";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BeanError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_tables(&self) -> Result<Tables> {
        let db_file = self.db_path();
        if !db_file.exists() {
            return Ok(Tables::default());
        }
        let content = fs::read_to_string(db_file).map_err(BeanError::Io)?;
        let tables: Tables = serde_json::from_str(&content).map_err(BeanError::Serialization)?;
        Ok(tables)
    }

    fn save_tables(&self, tables: &Tables) -> Result<()> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(tables).map_err(BeanError::Serialization)?;

        // Atomic write
        let tmp_file = self.root.join(format!(".jellybean-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(BeanError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, self.db_path()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(BeanError::Io(e));
        }

        Ok(())
    }

    fn location(&self) -> String {
        self.db_path().display().to_string()
    }
}
