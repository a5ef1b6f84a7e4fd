//! Driven port for the persistent key-value store sessions live in.
//!
//! Mirrors a browser-style local store: string keys, string values,
//! synchronous calls. Adapters decide where the text actually lands.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// The backing medium could not be reached or read.
        Unavailable { message: String } => "key-value store unavailable: {message}",
        /// A write or removal did not complete.
        Write { key: String, message: String } => "failed to write key '{key}': {message}",
        /// The stored value exists but is not readable text.
        Malformed { key: String, message: String } => "value at '{key}' is not text: {message}",
    }
}

/// Text key-value persistence.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` at `key`, replacing what was there.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn write_error_names_the_key() {
        let err = KeyValueStoreError::write("survivor_session", "disk full");
        assert_eq!(
            err.to_string(),
            "failed to write key 'survivor_session': disk full"
        );
    }

    #[test]
    fn mock_store_honours_expectations() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .withf(|key| key == "survivor_session")
            .times(1)
            .return_once(|_| Ok(None));

        assert_eq!(store.get("survivor_session"), Ok(None));
    }
}
