//! Typed JSON persistence over the key-value port.
//!
//! Values are stored as `serde_json` text. Dates travel as RFC 3339 strings
//! and are revived by the typed deserialisers of the stored records, so a
//! record whose date no longer parses counts as corrupt.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ports::{KeyValueStore, KeyValueStoreError};

/// Keys the hub persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The logged-in survivor, if any.
    Session,
    /// Registered-user table keyed by email.
    RegisteredUsers,
    /// Favourite map locations and tips.
    MapFavourites,
    /// Messages sent to the administrators.
    AdminMessages,
}

impl StorageKey {
    /// Key text used in the backing store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "survivor_session",
            Self::RegisteredUsers => "survivor_registered_users",
            Self::MapFavourites => "survivor_map_favourites",
            Self::AdminMessages => "survivor_admin_messages",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reading or writing a typed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The value could not be encoded.
    #[error("failed to serialise '{key}': {message}")]
    Serialise { key: StorageKey, message: String },
    /// Stored text exists but does not decode into the expected shape.
    #[error("stored '{key}' record is corrupt: {message}")]
    Corrupt { key: StorageKey, message: String },
    /// The adapter failed.
    #[error(transparent)]
    Backend(#[from] KeyValueStoreError),
}

/// Session Store: durable typed records across reloads.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Wrap a key-value adapter.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Serialise `value` and overwrite whatever is stored at `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|err| StoreError::Serialise {
            key,
            message: err.to_string(),
        })?;
        self.backend.set(key.as_str(), &text)?;
        debug!(key = %key, bytes = text.len(), "record saved");
        Ok(())
    }

    /// Load the record at `key`, reporting corruption to the caller.
    ///
    /// Missing keys yield `Ok(None)`. Values the adapter cannot read as text
    /// count as corrupt.
    pub fn try_load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, StoreError> {
        let text = match self.backend.get(key.as_str()) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(None),
            Err(KeyValueStoreError::Malformed { message, .. }) => {
                return Err(StoreError::Corrupt { key, message });
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StoreError::Corrupt {
                key,
                message: err.to_string(),
            })
    }

    /// Load the record at `key`, falling back to `None`.
    ///
    /// Corrupt records are removed so the next start begins clean. Nothing
    /// here is surfaced to the survivor.
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(StoreError::Corrupt { message, .. }) => {
                warn!(key = %key, error = %message, "discarding corrupt record");
                if let Err(err) = self.backend.remove(key.as_str()) {
                    warn!(key = %key, error = %err, "failed to purge corrupt record");
                }
                None
            }
            Err(err) => {
                warn!(key = %key, error = %err, "record unavailable");
                None
            }
        }
    }

    /// Delete the record at `key`.
    pub fn remove(&self, key: StorageKey) -> Result<(), StoreError> {
        self.backend.remove(key.as_str())?;
        debug!(key = %key, "record removed");
        Ok(())
    }
}
