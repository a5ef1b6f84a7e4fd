//! Directory-backed key-value store.
//!
//! Each key maps to `<key>.json` inside one directory opened through
//! `cap_std`, so the adapter cannot reach outside it. Writes go to a hidden
//! temporary file that is synced and then renamed over the target, leaving
//! either the old or the new record on disk and never a torn one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persists each key as a JSON file in a single directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the storage directory at `root`.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, KeyValueStoreError> {
        let root = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|err| KeyValueStoreError::unavailable(format!("{root}: {err}")))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|err| KeyValueStoreError::unavailable(format!("{root}: {err}")))?;
        debug!(path = %root, "file key-value store opened");
        Ok(Self { root, dir })
    }

    /// Directory the records live in.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_name(key: &str) -> Result<String, KeyValueStoreError> {
        let plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if plain {
            Ok(format!("{key}.json"))
        } else {
            Err(KeyValueStoreError::write(
                key,
                "keys may only contain ASCII letters, digits, '_' and '-'",
            ))
        }
    }

    fn write_atomic(&self, key: &str, file_name: &str, contents: &str) -> Result<(), KeyValueStoreError> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        let tmp_name = format!(".{file_name}.tmp.{}.{nanos}.{counter}", std::process::id());

        let staged = self
            .write_temp(&tmp_name, contents)
            .and_then(|()| self.replace(&tmp_name, file_name));
        if let Err(err) = staged {
            drop(self.dir.remove_file(&tmp_name));
            return Err(KeyValueStoreError::write(key, err.to_string()));
        }

        // Directory sync is best effort.
        drop(self.dir.open(".").and_then(|dir| dir.sync_all()));
        Ok(())
    }

    fn write_temp(&self, tmp_name: &str, contents: &str) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = self.dir.open_with(tmp_name, &options)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }

    #[cfg(windows)]
    fn replace(&self, tmp_name: &str, file_name: &str) -> io::Result<()> {
        // Windows rename refuses to overwrite.
        match self.dir.remove_file(file_name) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        self.dir.rename(tmp_name, &self.dir, file_name)
    }

    #[cfg(not(windows))]
    fn replace(&self, tmp_name: &str, file_name: &str) -> io::Result<()> {
        self.dir.rename(tmp_name, &self.dir, file_name)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        match self.dir.read(&file_name) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|err| KeyValueStoreError::malformed(key, err.to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::unavailable(format!(
                "{}: {err}",
                self.root.join(&file_name)
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        self.write_atomic(key, &file_name, value)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        match self.dir.remove_file(&file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::write(key, err.to_string())),
        }
    }
}
