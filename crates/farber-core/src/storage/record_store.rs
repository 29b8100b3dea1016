//! Record stores
//!
//! A [`RecordStore`] owns the in-memory list of one domain's records and
//! mirrors it, whole, to a single key of a [`KeyValueStore`].
//!
//! ## Numbering
//!
//! Records that carry a sequential `number` get `max(existing) + 1` at
//! creation. The store also keeps a high-water mark under `<key>_seq` so a
//! number stays retired after its record is deleted, even when it was the
//! highest one.
//!
//! ## Failure model
//!
//! - `load` never fails: absent or corrupt data leaves the collection empty,
//!   a malformed element is dropped on its own, and corruption is logged
//! - mutations apply in memory first, then persist; a failed write is
//!   returned but the in-memory change is kept

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::error::{StorageError, StorageResult};
use super::namespace::KeyValueStore;

/// A record that can live in a [`RecordStore`]
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Identifier, unique within the store
    fn id(&self) -> Uuid;

    /// Sequential number, for record kinds that have one
    fn number(&self) -> Option<u64> {
        None
    }
}

/// In-memory collection persisted under one key
pub struct RecordStore<T> {
    key: String,
    namespace: Rc<dyn KeyValueStore>,
    items: Vec<T>,
    high_water: u64,
}

impl<T: Record> RecordStore<T> {
    /// Create an empty store bound to `key` without reading it
    pub fn new(namespace: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            namespace,
            items: Vec::new(),
            high_water: 0,
        }
    }

    /// Create a store and load its persisted contents
    pub fn open(namespace: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self::new(namespace, key);
        store.load();
        store
    }

    /// Storage key of the collection
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All records in insertion order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a record by id
    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// Reload the collection from the namespace
    ///
    /// Absent data and unreadable or unparsable data both leave an empty
    /// collection. A single malformed element is skipped and the rest are
    /// kept. Errors are logged, never returned.
    pub fn load(&mut self) {
        self.items = match self.namespace.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(values) => self.parse_records(values),
                Err(e) => {
                    error!(key = %self.key, error = %e, "Failed to parse stored records");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to read stored records");
                Vec::new()
            }
        };

        self.high_water = self.load_high_water();
        debug!(key = %self.key, count = self.items.len(), "Loaded records");
    }

    fn parse_records(&self, values: Vec<serde_json::Value>) -> Vec<T> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    error!(key = %self.key, index, error = %e, "Skipping unreadable record");
                    None
                }
            })
            .collect()
    }

    /// Persist the full collection
    pub fn save(&self) -> StorageResult<()> {
        let raw = serde_json::to_string(&self.items).map_err(|e| StorageError::Serialization {
            key: self.key.clone(),
            source: e,
        })?;
        self.namespace.set(&self.key, &raw)
    }

    /// Next sequential number: one past the highest number ever assigned
    pub fn next_number(&self) -> u64 {
        let max_existing = self
            .items
            .iter()
            .filter_map(|r| r.number())
            .max()
            .unwrap_or(0);
        max_existing.max(self.high_water) + 1
    }

    /// Append a record and persist
    pub fn add(&mut self, record: T) -> StorageResult<()> {
        let number = record.number();
        self.items.push(record);
        let saved = self.save();

        if let Some(n) = number {
            if n > self.high_water {
                self.high_water = n;
                if let Err(e) = self.save_high_water() {
                    warn!(key = %self.key, error = %e, "Failed to persist numbering mark");
                }
            }
        }

        saved
    }

    /// Append a record in memory only
    pub fn push(&mut self, record: T) {
        self.items.push(record);
    }

    /// Mutate a record in place and persist
    ///
    /// Returns `Ok(false)` without writing when `id` is unknown.
    pub fn update(&mut self, id: Uuid, apply: impl FnOnce(&mut T)) -> StorageResult<bool> {
        let Some(record) = self.items.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        apply(record);
        self.save()?;
        Ok(true)
    }

    /// Remove a record and persist if something was removed
    ///
    /// Returns `Ok(false)` without writing when nothing matched.
    pub fn remove(&mut self, id: Uuid) -> StorageResult<bool> {
        let before = self.items.len();
        self.items.retain(|r| r.id() != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn sequence_key(&self) -> String {
        format!("{}_seq", self.key)
    }

    fn load_high_water(&self) -> u64 {
        match self.namespace.get(&self.sequence_key()) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
                warn!(key = %self.key, error = %e, "Ignoring unreadable numbering mark");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read numbering mark");
                0
            }
        }
    }

    fn save_high_water(&self) -> StorageResult<()> {
        self.namespace
            .set(&self.sequence_key(), &self.high_water.to_string())
    }
}

/// A single persisted object, such as the panel settings
pub struct SingletonStore<T> {
    key: String,
    namespace: Rc<dyn KeyValueStore>,
    value: T,
}

impl<T> SingletonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a store holding defaults and load persisted values over them
    pub fn open(namespace: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self {
            key: key.into(),
            namespace,
            value: T::default(),
        };
        store.load();
        store
    }

    /// Reload from the namespace
    ///
    /// Fields missing from the stored object fall back to defaults (the type
    /// is expected to use `#[serde(default)]`). Corrupt data keeps the
    /// current value.
    pub fn load(&mut self) {
        match self.namespace.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => self.value = value,
                Err(e) => error!(key = %self.key, error = %e, "Failed to parse stored object"),
            },
            Ok(None) => {}
            Err(e) => error!(key = %self.key, error = %e, "Failed to read stored object"),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the in-memory value (call [`save`](Self::save) to persist)
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn save(&self) -> StorageResult<()> {
        let raw = serde_json::to_string(&self.value).map_err(|e| StorageError::Serialization {
            key: self.key.clone(),
            source: e,
        })?;
        self.namespace.set(&self.key, &raw)
    }

    /// Restore defaults and persist them
    pub fn reset(&mut self) -> StorageResult<()> {
        self.value = T::default();
        self.save()
    }
}
