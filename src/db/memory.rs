use super::PersistentStore;
use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, serde_json::Value>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::Internal("memory store mutex poisoned".to_string()))
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<serde_json::Value>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> AppResult<()> {
        self.entries()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
