//! Preference repository implementation

use crate::error::Result;
use crate::models::DisplayFlags;
use rusqlite::{params, Connection, OptionalExtension};

/// Key under which the last-used quote display flags are stored.
const DISPLAY_DEFAULTS_KEY: &str = "quote.display_defaults";

/// Trait for key/value preference storage
pub trait PreferenceRepository {
    /// Read a preference value, `None` if it was never set
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a preference value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Display flags applied to newly created quotes
    fn display_defaults(&self) -> Result<DisplayFlags> {
        match self.get(DISPLAY_DEFAULTS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!("Ignoring unreadable display defaults: {error}");
                DisplayFlags::default()
            })),
            None => Ok(DisplayFlags::default()),
        }
    }

    /// Remember `flags` as the defaults for the next new quote
    fn save_display_defaults(&self, flags: DisplayFlags) -> Result<()> {
        self.set(DISPLAY_DEFAULTS_KEY, &serde_json::to_string(&flags)?)
    }
}

/// `SQLite` implementation of `PreferenceRepository`
pub struct SqlitePreferenceRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqlitePreferenceRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
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
    fn test_get_missing_key() {
        let db = setup();
        let repo = SqlitePreferenceRepository::new(db.connection());
        assert_eq!(repo.get("sort.quote").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let db = setup();
        let repo = SqlitePreferenceRepository::new(db.connection());

        repo.set("sort.quote", "Newest").unwrap();
        repo.set("sort.quote", "Oldest").unwrap();
        assert_eq!(repo.get("sort.quote").unwrap().as_deref(), Some("Oldest"));
    }

    #[test]
    fn test_display_defaults_round_trip() {
        let db = setup();
        let repo = SqlitePreferenceRepository::new(db.connection());
        assert_eq!(repo.display_defaults().unwrap(), DisplayFlags::default());

        let flags = DisplayFlags {
            quotation_marks: false,
            show_author: true,
            author_on_new_line: true,
        };
        repo.save_display_defaults(flags).unwrap();
        assert_eq!(repo.display_defaults().unwrap(), flags);
    }

    #[test]
    fn test_unreadable_display_defaults_fall_back() {
        let db = setup();
        let repo = SqlitePreferenceRepository::new(db.connection());
        repo.set(DISPLAY_DEFAULTS_KEY, "not json").unwrap();
        assert_eq!(repo.display_defaults().unwrap(), DisplayFlags::default());
    }
}
