//! Session storage backends.
//!
//! The [`SessionStore`] trait is the seam between the gate and wherever the
//! session fields actually live. Writes and removals take the whole batch of
//! keys at once so a store can apply them atomically.

use std::collections::{BTreeMap, HashMap};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

/// Errors raised by persistent stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be serialized.
    #[error("session store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key/value storage for session fields.
pub trait SessionStore {
    /// Read a single field.
    fn get(&self, key: &str) -> Option<String>;

    /// Write every entry in one operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent backend cannot be written. On error
    /// none of the entries are visible.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove every key in one operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent backend cannot be written. On error
    /// none of the keys are removed.
    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StoreError>;
}

/// In-memory store. Used in tests and for throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }

    /// Number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

/// JSON-file store.
///
/// The file holds a flat JSON object of string fields. Every change rewrites
/// the whole object to a uniquely named temp file in the same directory and
/// renames it into place, so a reader never sees half of a write. The temp
/// file is created owner-only (`0600` on Unix) and the mode survives the
/// rename, so the token is never readable by other users.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// also treated as empty (logged at `warn`), which leaves the viewer
    /// unauthenticated rather than failing.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt session file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read session file");
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert((*key).to_owned(), (*value).to_owned());
        }
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_and_remove() {
        let mut store = MemoryStore::new();
        store.set_all(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.len(), 2);

        store.remove_all(&["a", "b", "missing"]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = FileStore::open(&path);
        assert!(store.get("accessToken").is_none());
        store
            .set_all(&[("accessToken", "tok"), ("userRole", "teacher")])
            .unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("accessToken").as_deref(), Some("tok"));
        assert_eq!(reopened.get("userRole").as_deref(), Some("teacher"));
    }

    #[test]
    fn test_file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileStore::open(&path);
        store.set_all(&[("accessToken", "tok"), ("keep", "x")]).unwrap();
        store.remove_all(&["accessToken"]).unwrap();

        let reopened = FileStore::open(&path);
        assert!(reopened.get("accessToken").is_none());
        assert_eq!(reopened.get("keep").as_deref(), Some("x"));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["session.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileStore::open(&path);
        store.set_all(&[("accessToken", "tok")]).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // A rewrite keeps the file private too.
        store.remove_all(&["accessToken"]).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get("accessToken").is_none());
    }

    #[test]
    fn test_file_store_failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("session.json");
        std::fs::create_dir(&path).unwrap();

        let mut store = FileStore::open(&path);
        assert!(store.set_all(&[("accessToken", "tok")]).is_err());
        assert!(store.get("accessToken").is_none());
    }
}
