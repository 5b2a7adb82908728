//! Storage backends for whole collections.
//!
//! A backend only moves bytes: it reads or overwrites the full persisted
//! form of one collection. Parsing and error classification of the
//! contents happen in [`StateStore`](crate::StateStore).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::collections::{COLLECTIONS, Collection};
use crate::error::{StateError, StateResult};

/// Convert any `Display` error into a collection-scoped `StateError` variant.
macro_rules! map_err {
    ($variant:ident, $collection:expr) => {
        |e| StateError::$variant {
            collection: $collection.name().to_string(),
            reason: e.to_string(),
        }
    };
}

/// Raw persistence for collections.
pub trait CollectionBackend: Send + Sync {
    /// Read the full persisted form of a collection.
    ///
    /// Returns [`StateError::NotFound`] if the collection was never written.
    fn read(&self, collection: Collection) -> StateResult<Vec<u8>>;

    /// Overwrite the full persisted form of a collection.
    fn write(&self, collection: Collection, bytes: &[u8]) -> StateResult<()>;
}

// ── Files ──────────────────────────────────────────────────────────

/// One `<collection>.json` file per collection inside a data directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir` as the data directory, creating it if needed.
    pub fn open(dir: &Path) -> StateResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| StateError::Open(e.to_string()))?;
        debug!(?dir, "file backend opened");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the file backing `collection`.
    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }
}

impl CollectionBackend for FileBackend {
    fn read(&self, collection: Collection) -> StateResult<Vec<u8>> {
        match std::fs::read(self.path(collection)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StateError::NotFound(collection.name().to_string()))
            }
            Err(e) => Err(StateError::Read {
                collection: collection.name().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn write(&self, collection: Collection, bytes: &[u8]) -> StateResult<()> {
        std::fs::write(self.path(collection), bytes).map_err(map_err!(Persist, collection))
    }
}

// ── redb ───────────────────────────────────────────────────────────

/// All collections as values of a single redb table.
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Open (or create) a redb database at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(|e| StateError::Open(e.to_string()))?;
        let backend = Self { db };
        backend.ensure_table()?;
        debug!(?path, "redb backend opened");
        Ok(backend)
    }

    /// Create an ephemeral in-memory database (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StateError::Open(e.to_string()))?;
        let backend = Self { db };
        backend.ensure_table()?;
        debug!("in-memory redb backend opened");
        Ok(backend)
    }

    fn ensure_table(&self) -> StateResult<()> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| StateError::Open(e.to_string()))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(COLLECTIONS)
            .map_err(|e| StateError::Open(e.to_string()))?;
        txn.commit().map_err(|e| StateError::Open(e.to_string()))?;
        Ok(())
    }
}

impl CollectionBackend for RedbBackend {
    fn read(&self, collection: Collection) -> StateResult<Vec<u8>> {
        let txn = self.db.begin_read().map_err(map_err!(Read, collection))?;
        let table = txn.open_table(COLLECTIONS).map_err(map_err!(Read, collection))?;
        match table.get(collection.name()).map_err(map_err!(Read, collection))? {
            Some(guard) => Ok(guard.value().to_vec()),
            None => Err(StateError::NotFound(collection.name().to_string())),
        }
    }

    fn write(&self, collection: Collection, bytes: &[u8]) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Persist, collection))?;
        {
            let mut table = txn
                .open_table(COLLECTIONS)
                .map_err(map_err!(Persist, collection))?;
            table
                .insert(collection.name(), bytes)
                .map_err(map_err!(Persist, collection))?;
        }
        txn.commit().map_err(map_err!(Persist, collection))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backend_missing_collection_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        let err = backend.read(Collection::Applications).unwrap_err();
        assert!(matches!(err, StateError::NotFound(name) if name == "application_details"));
    }

    #[test]
    fn file_backend_writes_named_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        backend.write(Collection::DevOps, b"{\"applications\": []}").unwrap();

        let on_disk = std::fs::read(dir.path().join("devops_details.json")).unwrap();
        assert_eq!(on_disk, b"{\"applications\": []}");
        assert_eq!(backend.read(Collection::DevOps).unwrap(), on_disk);
    }

    #[test]
    fn file_backend_overwrites_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        backend.write(Collection::Infrastructure, b"a much longer first value").unwrap();
        backend.write(Collection::Infrastructure, b"short").unwrap();
        assert_eq!(backend.read(Collection::Infrastructure).unwrap(), b"short");
    }

    #[test]
    fn file_backend_write_into_missing_dir_is_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("data")).unwrap();
        std::fs::remove_dir_all(dir.path().join("data")).unwrap();

        let err = backend.write(Collection::Applications, b"{}").unwrap_err();
        assert!(matches!(err, StateError::Persist { .. }));
    }

    #[test]
    fn redb_backend_round_trips_collections() {
        let backend = RedbBackend::open_in_memory().unwrap();
        assert!(matches!(
            backend.read(Collection::Applications),
            Err(StateError::NotFound(_))
        ));

        backend.write(Collection::Applications, b"apps").unwrap();
        backend.write(Collection::DevOps, b"devops").unwrap();
        assert_eq!(backend.read(Collection::Applications).unwrap(), b"apps");
        assert_eq!(backend.read(Collection::DevOps).unwrap(), b"devops");
    }

    #[test]
    fn redb_persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("catalog.redb");

        {
            let backend = RedbBackend::open(&db_path).unwrap();
            backend.write(Collection::Infrastructure, b"envs").unwrap();
        }

        let backend = RedbBackend::open(&db_path).unwrap();
        assert_eq!(backend.read(Collection::Infrastructure).unwrap(), b"envs");
    }
}
