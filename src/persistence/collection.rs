use super::files::{atomic_write, read_file};
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A record stored in a keyed collection
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Key: Ord + Clone + Debug;

    fn key(&self) -> Self::Key;
}

/// Durable keyed collection.
///
/// Each write call is all-or-nothing: on error the collection is left exactly
/// as it was before the call.
pub trait Collection<R: Record> {
    fn get(&self, key: &R::Key) -> Result<Option<R>, StoreError>;

    fn get_all(&self) -> Result<Vec<R>, StoreError>;

    /// Insert or replace the record under its key
    fn put(&mut self, record: R) -> Result<(), StoreError>;

    /// Remove every listed key that is present; missing keys are ignored
    fn delete_many(&mut self, keys: &[R::Key]) -> Result<(), StoreError>;

    fn delete(&mut self, key: &R::Key) -> Result<(), StoreError> {
        self.delete_many(std::slice::from_ref(key))
    }

    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Collection held only in memory
#[derive(Debug, Clone)]
pub struct MemoryCollection<R: Record> {
    records: BTreeMap<R::Key, R>,
}

impl<R: Record> MemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R: Record> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Collection<R> for MemoryCollection<R> {
    fn get(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn get_all(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }

    fn put(&mut self, record: R) -> Result<(), StoreError> {
        self.records.insert(record.key(), record);
        Ok(())
    }

    fn delete_many(&mut self, keys: &[R::Key]) -> Result<(), StoreError> {
        for key in keys {
            self.records.remove(key);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}

/// Collection persisted as one JSON array per file.
///
/// Every write serializes the would-be contents, replaces the file atomically
/// and only then updates the in-memory view.
#[derive(Debug)]
pub struct JsonCollection<R: Record> {
    path: PathBuf,
    records: BTreeMap<R::Key, R>,
}

impl<R: Record> JsonCollection<R> {
    /// Load the collection from `path`. A missing file is an empty collection.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let mut records = BTreeMap::new();
        if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
            let list: Vec<R> = serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
            for record in list {
                records.insert(record.key(), record);
            }
        }

        debug!(path = %path.display(), count = records.len(), "opened collection");
        Ok(Self { path, records })
    }

    fn commit(&mut self, next: BTreeMap<R::Key, R>) -> Result<(), StoreError> {
        let list: Vec<&R> = next.values().collect();
        let json = serde_json::to_string_pretty(&list).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.records = next;
        Ok(())
    }
}

impl<R: Record> Collection<R> for JsonCollection<R> {
    fn get(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn get_all(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }

    fn put(&mut self, record: R) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        next.insert(record.key(), record);
        self.commit(next)
    }

    fn delete_many(&mut self, keys: &[R::Key]) -> Result<(), StoreError> {
        if !keys.iter().any(|key| self.records.contains_key(key)) {
            return Ok(());
        }
        let mut next = self.records.clone();
        for key in keys {
            next.remove(key);
        }
        self.commit(next)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(BTreeMap::new())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        key: u32,
        text: String,
    }

    impl Record for Note {
        type Key = u32;

        fn key(&self) -> u32 {
            self.key
        }
    }

    fn note(key: u32, text: &str) -> Note {
        Note {
            key,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_memory_put_overwrites() {
        let mut notes = MemoryCollection::new();
        notes.put(note(1, "first")).unwrap();
        notes.put(note(1, "second")).unwrap();

        assert_eq!(notes.get(&1).unwrap(), Some(note(1, "second")));
        assert_eq!(notes.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_delete_missing_is_noop() {
        let mut notes = MemoryCollection::new();
        notes.put(note(1, "keep")).unwrap();
        notes.delete(&7).unwrap();
        assert_eq!(notes.get_all().unwrap(), vec![note(1, "keep")]);
    }

    #[test]
    fn test_json_persists_across_open() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.json");

        let mut notes = JsonCollection::open(&path).unwrap();
        notes.put(note(2, "b")).unwrap();
        notes.put(note(1, "a")).unwrap();
        notes.delete_many(&[2, 9]).unwrap();

        let reopened: JsonCollection<Note> = JsonCollection::open(&path).unwrap();
        assert_eq!(reopened.get_all().unwrap(), vec![note(1, "a")]);
    }

    #[test]
    fn test_json_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("none.json");
        let notes: JsonCollection<Note> = JsonCollection::open(&path).unwrap();
        assert!(notes.get_all().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_json_corrupt_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.json");
        std::fs::write(&path, "{ not an array").unwrap();

        let result: Result<JsonCollection<Note>, _> = JsonCollection::open(&path);
        assert!(matches!(result, Err(StoreError::Json { .. })));
    }

    #[test]
    fn test_json_failed_write_leaves_view_unchanged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.json");
        let mut notes = JsonCollection::open(&path).unwrap();
        notes.put(note(1, "a")).unwrap();

        // Pull the directory out from under the collection
        drop(temp_dir);

        assert!(notes.put(note(2, "b")).is_err());
        assert_eq!(notes.get_all().unwrap(), vec![note(1, "a")]);
    }

    #[test]
    fn test_flaky_collection_rejects_writes() {
        let (mut notes, fail) = testing::FlakyCollection::new();
        notes.put(note(1, "a")).unwrap();
        fail.set(true);

        assert!(matches!(notes.put(note(2, "b")), Err(StoreError::Unavailable(_))));
        assert_eq!(notes.get_all().unwrap(), vec![note(1, "a")]);
    }
}
