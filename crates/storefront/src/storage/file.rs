//! On-disk key-value store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StorageError, validate_key};

const EXTENSION: &str = "json";

/// A [`KeyValueStore`] that keeps each key in `<root>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves either the old value or the new one. Two processes
/// writing the same key race; the last rename wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    quota: Option<u64>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>, quota: Option<u64>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), ?quota, "Opened file store");
        Ok(Self { root, quota })
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    /// Iterate over the key files currently on disk.
    fn entries(&self) -> Result<Vec<(String, PathBuf)>, StorageError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
            else {
                continue;
            };
            entries.push((key, path));
        }
        Ok(entries)
    }

    /// Bytes used by every key except `skip`.
    fn usage_excluding(&self, skip: &str) -> Result<u64, StorageError> {
        let mut total = 0;
        for (key, path) in self.entries()? {
            if key == skip {
                continue;
            }
            total += key.len() as u64 + fs::metadata(&path)?.len();
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        if let Some(limit) = self.quota {
            let projected = self.usage_excluding(key)? + key.len() as u64 + value.len() as u64;
            if projected > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }

        let target = self.path_for(key);
        let tmp = self.root.join(format!(".{key}.{EXTENSION}.tmp"));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        for (_, path) in self.entries()? {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), None).unwrap();

        store.set_item("cart", r#"[{"id":1}]"#).unwrap();
        assert!(dir.path().join("cart.json").exists());

        let reopened = FileStore::open(dir.path(), None).unwrap();
        assert_eq!(
            reopened.get_item("cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), None).unwrap();
        assert_eq!(store.get_item("favorites").unwrap(), None);
        store.remove_item("favorites").unwrap();
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        let store = FileStore::open(&root, None).unwrap();
        assert_eq!(store.root(), root.as_path());
        assert!(root.is_dir());
    }

    #[test]
    fn test_quota_spans_all_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), Some(30)).unwrap();

        store.set_item("cart", "0123456789").unwrap(); // 4 + 10
        store.set_item("favorites", "01234").unwrap(); // 9 + 5

        let err = store.set_item("favorites", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 30, .. }));
        assert_eq!(store.get_item("favorites").unwrap().as_deref(), Some("01234"));
    }

    #[test]
    fn test_clear_leaves_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), None).unwrap();
        store.set_item("cart", "[]").unwrap();
        store.set_item("accessToken", "abc").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        store.clear().unwrap();

        assert_eq!(store.get_item("cart").unwrap(), None);
        assert_eq!(store.get_item("accessToken").unwrap(), None);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), None).unwrap();
        assert!(matches!(
            store.get_item("../secrets"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
