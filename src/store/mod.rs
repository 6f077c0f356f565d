//! Phase Store
//!
//! Key/value persistence for wizard slots (answers, generated payloads, phase
//! progress). Values are opaque JSON documents; a stored value that no longer decodes
//! reads back as absent rather than failing the caller.

pub mod persistence;

pub use persistence::SledPhaseStore;

use crate::error::StorageError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Phase store interface
pub trait PhaseStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Keys currently holding a value, in ascending order
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Read a typed value. Entries that don't match `T` are treated as absent.
pub fn load_typed<T: DeserializeOwned>(
    store: &dyn PhaseStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    Ok(store
        .get(key)?
        .and_then(|value| match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring stored value with unexpected shape");
                None
            }
        }))
}

/// Write a typed value.
pub fn save_typed<T: Serialize>(
    store: &dyn PhaseStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let value = serde_json::to_value(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &value)
}

/// In-process store, used by tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryPhaseStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryPhaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhaseStore for MemoryPhaseStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        check_key(key)?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.write().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}
