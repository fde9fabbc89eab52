mod memory;

pub use memory::MemoryStore;

use crate::errors::{AppError, AppResult};
use crate::models::DashboardSettings;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

pub const SETTINGS_KEY: &str = "settings";

pub trait PersistentStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<serde_json::Value>>;
    fn set(&self, key: &str, value: &serde_json::Value) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }
}

impl PersistentStore for SqliteStore {
    fn get(&self, key: &str) -> AppResult<Option<serde_json::Value>> {
        let conn = self.lock()?;
        let raw = conn
            .query_row("SELECT value_json FROM kv_store WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_store (key, value_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json, updated_at = excluded.updated_at",
            params![key, serde_json::to_string(value)?, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Reads `key` as `T`. Absent values and values that no longer decode as `T`
/// both yield `T::default()`; only store failures are errors.
pub fn load_or_default<T>(store: &dyn PersistentStore, key: &str) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_value::<T>(raw) {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::warn!(key, error = %error, "stored value is not decodable, using default");
            Ok(T::default())
        }
    }
}

pub fn save<T: Serialize + ?Sized>(store: &dyn PersistentStore, key: &str, value: &T) -> AppResult<()> {
    let encoded = serde_json::to_value(value)?;
    store.set(key, &encoded)
}

pub fn get_settings(store: &dyn PersistentStore) -> AppResult<DashboardSettings> {
    load_or_default(store, SETTINGS_KEY)
}

pub fn update_settings(store: &dyn PersistentStore, update: serde_json::Value) -> AppResult<DashboardSettings> {
    let current = get_settings(store)?;
    let mut merged = serde_json::to_value(current)?;
    merge_json(&mut merged, update);
    let settings: DashboardSettings =
        serde_json::from_value(merged).map_err(|error| AppError::Config(error.to_string()))?;
    if settings.page_size == 0 {
        return Err(AppError::Config("pageSize must be at least 1".to_string()));
    }

    save(store, SETTINGS_KEY, &settings)?;
    Ok(settings)
}

fn merge_json(target: &mut serde_json::Value, update: serde_json::Value) {
    match (target, update) {
        (serde_json::Value::Object(target_map), serde_json::Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_json(target_map.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (target, update) => {
            *target = update;
        }
    }
}
