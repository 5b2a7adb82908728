//! StateStore: whole-document persistence for the catalog collections.
//!
//! `load` reads a collection's full persisted form and parses it into its
//! [`Document`] type; `save` serializes the document as pretty JSON and
//! overwrites the collection. There is no partial write and no version
//! token. Writers that must not interleave take the collection's lock
//! first with [`StateStore::lock`].

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::backend::{CollectionBackend, FileBackend, RedbBackend};
use crate::collections::Collection;
use crate::error::{StateError, StateResult};
use crate::types::*;

/// Held while a create path runs its load → check → save cycle.
pub type CollectionGuard = OwnedMutexGuard<()>;

/// Thread-safe collection store.
#[derive(Clone)]
pub struct StateStore {
    backend: Arc<dyn CollectionBackend>,
    locks: Arc<CollectionLocks>,
}

#[derive(Default)]
struct CollectionLocks {
    applications: Arc<Mutex<()>>,
    devops: Arc<Mutex<()>>,
    infrastructure: Arc<Mutex<()>>,
}

impl CollectionLocks {
    fn get(&self, collection: Collection) -> Arc<Mutex<()>> {
        match collection {
            Collection::Applications => self.applications.clone(),
            Collection::DevOps => self.devops.clone(),
            Collection::Infrastructure => self.infrastructure.clone(),
        }
    }
}

impl StateStore {
    /// Wrap an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn CollectionBackend>) -> Self {
        Self {
            backend,
            locks: Arc::new(CollectionLocks::default()),
        }
    }

    /// JSON documents in `dir`, one file per collection.
    pub fn open_dir(dir: &Path) -> StateResult<Self> {
        let backend = FileBackend::open(dir)?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// A redb database at `path`.
    pub fn open_redb(path: &Path) -> StateResult<Self> {
        let backend = RedbBackend::open(path)?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// Create an ephemeral in-memory store (for testing). No collection
    /// exists until it is saved or [`seed`](Self::seed)ed.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = RedbBackend::open_in_memory()?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// Load a whole collection.
    pub fn load<D: Document>(&self) -> StateResult<D> {
        let collection = D::COLLECTION;
        let bytes = self.backend.read(collection)?;
        let doc = serde_json::from_slice(&bytes).map_err(|e| StateError::Corrupt {
            collection: collection.name().to_string(),
            reason: e.to_string(),
        })?;
        debug!(%collection, bytes = bytes.len(), "collection loaded");
        Ok(doc)
    }

    /// Overwrite a whole collection.
    pub fn save<D: Document>(&self, doc: &D) -> StateResult<()> {
        let collection = D::COLLECTION;
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| StateError::Persist {
            collection: collection.name().to_string(),
            reason: e.to_string(),
        })?;
        self.backend.write(collection, &bytes)?;
        debug!(%collection, bytes = bytes.len(), "collection saved");
        Ok(())
    }

    /// Wait for exclusive write access to `collection`.
    pub async fn lock(&self, collection: Collection) -> CollectionGuard {
        self.locks.get(collection).lock_owned().await
    }

    /// Create every collection that does not exist yet: empty application
    /// and DevOps sequences, and the given environments with no records.
    /// Existing collections are left untouched. Returns what was created.
    pub fn seed<S: AsRef<str>>(&self, environments: &[S]) -> StateResult<Vec<Collection>> {
        let mut created = Vec::new();
        for collection in Collection::ALL {
            match self.backend.read(collection) {
                Ok(_) => continue,
                Err(StateError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
            match collection {
                Collection::Applications => self.save(&ApplicationDocument::default())?,
                Collection::DevOps => self.save(&DevOpsDocument::default())?,
                Collection::Infrastructure => {
                    self.save(&InfrastructureDocument::with_environments(environments))?
                }
            }
            info!(%collection, "collection seeded");
            created.push(collection);
        }
        Ok(created)
    }
}
