//! onboard-state — collection store for the onboarding catalog.
//!
//! Persists the three catalog collections (`application_details`,
//! `devops_details`, `infrastructure_details`) as whole JSON documents.
//!
//! # Architecture
//!
//! A [`CollectionBackend`] moves raw bytes for one collection at a time:
//! [`FileBackend`] keeps one `<collection>.json` file per collection,
//! [`RedbBackend`] keeps them in a single redb table (on disk or in memory).
//! [`StateStore`] sits on top, doing the JSON (de)serialization and handing
//! out one async lock per collection so create paths can run their
//! load → check → save cycle without interleaving.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` and can be shared across
//! async tasks.

pub mod backend;
pub mod collections;
pub mod error;
pub mod store;
pub mod types;

pub use backend::{CollectionBackend, FileBackend, RedbBackend};
pub use collections::Collection;
pub use error::{StateError, StateResult};
pub use store::{CollectionGuard, StateStore};
pub use types::*;
