//! Key-value store adapters.
//!
//! [`InMemoryKeyValueStore`] backs tests. [`FileKeyValueStore`] keeps one
//! JSON file per key so records survive a restart the way a browser's local
//! storage survives a reload.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
