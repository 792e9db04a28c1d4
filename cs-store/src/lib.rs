//! CardShare Store - persistent device key-value storage.
//!
//! Holds the auth token, cached profile fields and small UI state blobs.
//! Values are opaque strings; writes are last-write-wins per key.

pub mod db;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod schema;

// Re-export key types
pub use db::{SqliteStore, StoreEntry, StorePool};
pub use kv::{KeyValueStore, KeyValueStoreExt};
pub use memory::MemoryStore;
