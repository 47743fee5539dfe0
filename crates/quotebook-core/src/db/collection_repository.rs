//! Collection repository implementation

use crate::error::{Error, Result};
use crate::models::{Collection, CollectionId};
use crate::util::now_ms;
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for collection storage operations
pub trait CollectionRepository {
    /// Insert a new collection
    fn create(&self, name: &str) -> Result<Collection>;

    /// Get a collection by ID
    fn get(&self, id: &CollectionId) -> Result<Option<Collection>>;

    /// List every collection, oldest first
    fn list(&self) -> Result<Vec<Collection>>;

    /// Rename a collection
    fn rename(&self, id: &CollectionId, name: &str) -> Result<Collection>;

    /// Delete a collection and, through the foreign key, its quotes
    fn delete(&self, id: &CollectionId) -> Result<()>;

    /// Number of quotes owned by a collection
    fn quote_count(&self, id: &CollectionId) -> Result<usize>;
}

/// `SQLite` implementation of `CollectionRepository`
pub struct SqliteCollectionRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCollectionRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a collection from a database row
    fn parse_collection(row: &rusqlite::Row<'_>) -> rusqlite::Result<Collection> {
        let id: String = row.get(0)?;
        let id = id.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Collection {
            id,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn create(&self, name: &str) -> Result<Collection> {
        let collection = Collection::new(name);

        self.conn.execute(
            "INSERT INTO collections (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![
                collection.id.as_str(),
                collection.name,
                collection.created_at,
                collection.updated_at
            ],
        )?;

        tracing::debug!("Created collection {}", collection.id);
        Ok(collection)
    }

    fn get(&self, id: &CollectionId) -> Result<Option<Collection>> {
        let collection = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM collections WHERE id = ?",
                params![id.as_str()],
                Self::parse_collection,
            )
            .optional()?;
        Ok(collection)
    }

    fn list(&self) -> Result<Vec<Collection>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM collections
             ORDER BY created_at ASC",
        )?;

        let collections = stmt
            .query_map([], Self::parse_collection)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(collections)
    }

    fn rename(&self, id: &CollectionId, name: &str) -> Result<Collection> {
        let rows = self.conn.execute(
            "UPDATE collections SET name = ?, updated_at = ? WHERE id = ?",
            params![name, now_ms(), id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn delete(&self, id: &CollectionId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM collections WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        tracing::debug!("Deleted collection {id}");
        Ok(())
    }

    fn quote_count(&self, id: &CollectionId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM quotes WHERE collection_id = ?",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|_| Error::InvalidInput("Negative quote count".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteCollectionRepository::new(db.connection());

        let collection = repo.create("Stoics").unwrap();
        let fetched = repo.get(&collection.id).unwrap().unwrap();
        assert_eq!(fetched, collection);
    }

    #[test]
    fn test_list() {
        let db = setup();
        let repo = SqliteCollectionRepository::new(db.connection());

        repo.create("Stoics").unwrap();
        repo.create("Poets").unwrap();

        let collections = repo.list().unwrap();
        assert_eq!(collections.len(), 2);
    }

    #[test]
    fn test_rename() {
        let db = setup();
        let repo = SqliteCollectionRepository::new(db.connection());

        let collection = repo.create("Stoic").unwrap();
        let renamed = repo.rename(&collection.id, "Stoics").unwrap();
        assert_eq!(renamed.name, "Stoics");
        assert!(renamed.updated_at >= collection.updated_at);
    }

    #[test]
    fn test_rename_missing() {
        let db = setup();
        let repo = SqliteCollectionRepository::new(db.connection());

        let result = repo.rename(&CollectionId::new(), "Nobody");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let db = setup();
        let repo = SqliteCollectionRepository::new(db.connection());

        let collection = repo.create("Temporary").unwrap();
        repo.delete(&collection.id).unwrap();
        assert!(repo.get(&collection.id).unwrap().is_none());
        assert!(matches!(
            repo.delete(&collection.id),
            Err(Error::NotFound(_))
        ));
    }
}
