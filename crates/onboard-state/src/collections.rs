//! Collection names and the redb table that holds them.
//!
//! Every collection is stored as a single value; the key is the collection
//! name, so `application_details` maps to one JSON document regardless of
//! the backend.

use std::fmt;

use redb::TableDefinition;

/// Whole-document values keyed by collection name.
pub const COLLECTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// The three catalog collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Applications,
    DevOps,
    Infrastructure,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Applications,
        Collection::DevOps,
        Collection::Infrastructure,
    ];

    /// Persisted name of the collection.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Applications => "application_details",
            Collection::DevOps => "devops_details",
            Collection::Infrastructure => "infrastructure_details",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
