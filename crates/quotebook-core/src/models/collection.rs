//! Collection model

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::entity::{Entity, EntityKind};
use crate::util::{day_label, initial_of, now_ms};

/// A unique identifier for a collection, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionId(Uuid);

impl CollectionId {
    /// Create a new unique collection ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A named container of quotes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub id: CollectionId,
    /// Display name, never empty
    pub name: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Collection {
    /// Create a new collection with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: CollectionId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Uppercased first character of the name, or `#` for an empty name.
    #[must_use]
    pub fn name_initial(&self) -> String {
        initial_of(&self.name)
    }

    #[must_use]
    pub fn day_created(&self) -> String {
        day_label(self.created_at)
    }

    #[must_use]
    pub fn day_changed(&self) -> String {
        day_label(self.updated_at)
    }
}

/// Form values for adding or renaming a collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDraft {
    pub name: String,
}

impl CollectionDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Entity for Collection {
    type Id = CollectionId;
    type Parent = Infallible;
    type Draft = CollectionDraft;
    type BulkEdit = Infallible;

    const KIND: EntityKind = EntityKind::Collection;

    fn id(&self) -> CollectionId {
        self.id
    }

    fn parent(&self) -> Option<Infallible> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_id_parse() {
        let id = CollectionId::new();
        let parsed: CollectionId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_collection_new() {
        let collection = Collection::new("Stoics");
        assert_eq!(collection.name, "Stoics");
        assert_eq!(collection.created_at, collection.updated_at);
    }

    #[test]
    fn test_name_initial_uppercases() {
        assert_eq!(Collection::new("stoics").name_initial(), "S");
        assert_eq!(Collection::new("éloge").name_initial(), "É");
        assert_eq!(Collection::new("").name_initial(), "#");
    }
}
