//! Persistence.
//!
//! All state lives in a flat string-keyed store. Callers serialize their
//! own data; the store enforces no schema. Each list is written as a whole
//! JSON array under its own key (last write wins).

mod config;
pub mod database;
mod memory;

pub use config::{Config, NotificationsConfig, StatsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{CoreError, Result};

/// Key holding the serialized task list.
pub const TASKS_KEY: &str = "pomodoro-tasks";
/// Key holding the serialized session list.
pub const SESSIONS_KEY: &str = "pomodoro-sessions";

/// Synchronous string-keyed storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Read a JSON array stored under `key`.
///
/// A missing key, a failing store or malformed JSON all yield an empty list.
pub fn load_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read stored list, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(key, error = %e, "stored list is malformed, starting empty");
            Vec::new()
        }
    }
}

/// Overwrite `key` with the full list.
///
/// Failures are logged; the caller's in-memory copy stays authoritative.
pub fn save_list<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    let result = serde_json::to_string(items)
        .map_err(CoreError::from)
        .and_then(|json| store.set(key, &json));
    if let Err(e) = result {
        error!(key, error = %e, "failed to persist list");
    }
}

/// Returns `~/.config/pomofocus[-dev]/` based on POMOFOCUS_ENV.
///
/// Set POMOFOCUS_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomofocus-dev")
    } else {
        base_dir.join("pomofocus")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
