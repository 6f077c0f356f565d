//! Persistence layer for the Phase Store

use crate::error::StorageError;
use crate::store::{check_key, PhaseStore};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Prefix shared by every slot written by this application
pub const KEY_PREFIX: &str = "tarantino:";

fn sled_error(context: &str, e: sled::Error) -> StorageError {
    StorageError::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{}: {}", context, e),
    ))
}

/// Sled-based implementation of PhaseStore
pub struct SledPhaseStore {
    db: sled::Db,
}

impl SledPhaseStore {
    /// Open (or create) a store at the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| sled_error("Failed to open sled database", e))?;
        Ok(Self { db })
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| sled_error("Failed to flush store", e))?;
        Ok(())
    }
}

impl PhaseStore for SledPhaseStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        check_key(key)?;
        let raw = self
            .db
            .get(Self::namespaced(key).as_bytes())
            .map_err(|e| sled_error("Failed to read slot", e))?;

        Ok(raw.and_then(|bytes| match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Stored slot is not valid JSON; treating as empty");
                None
            }
        }))
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        check_key(key)?;
        let bytes = serde_json::to_vec(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.db
            .insert(Self::namespaced(key).as_bytes(), bytes)
            .map_err(|e| sled_error("Failed to write slot", e))?;
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.db
            .remove(Self::namespaced(key).as_bytes())
            .map_err(|e| sled_error("Failed to remove slot", e))?;
        self.flush()
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for item in self.db.scan_prefix(KEY_PREFIX.as_bytes()) {
            let (key, _) = item.map_err(|e| sled_error("Failed to iterate store", e))?;
            let key = String::from_utf8_lossy(&key);
            if let Some(stripped) = key.strip_prefix(KEY_PREFIX) {
                keys.push(stripped.to_string());
            }
        }
        Ok(keys)
    }
}
