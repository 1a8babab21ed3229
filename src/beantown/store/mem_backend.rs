use super::backend::{StorageBackend, Tables};
use crate::error::{BeanError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory storage backend for testing.
#[derive(Default)]
pub struct MemBackend {
    tables: Mutex<Tables>,
    simulate_write_error: AtomicBool,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemBackend {
    fn load_tables(&self) -> Result<Tables> {
        Ok(self.lock().clone())
    }

    fn save_tables(&self, tables: &Tables) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(BeanError::Store("Simulated write error".to_string()));
        }
        *self.lock() = tables.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory://jellybean".to_string()
    }
}
