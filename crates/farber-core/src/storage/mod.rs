//! Storage layer
//!
//! Handles the durable key-value namespace and the record stores built on it.
//!
//! ## Architecture
//!
//! - **Namespace**: one JSON document per key (files on disk, or memory)
//! - **RecordStore**: an in-memory collection mirrored to exactly one key
//! - **SingletonStore**: a single object mirrored to one key (settings)
//!
//! The in-memory collection is what the panel shows. Reads that fail leave
//! it empty; writes that fail leave it mutated and report the error.

pub mod error;
pub mod namespace;
pub mod record_store;

pub use error::{IoStep, StorageError, StorageResult};
pub use namespace::{FileNamespace, KeyValueStore, MemoryNamespace};
pub use record_store::{Record, RecordStore, SingletonStore};
