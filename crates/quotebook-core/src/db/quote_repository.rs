//! Quote repository implementation

use crate::error::{Error, Result};
use crate::models::{CollectionId, DisplayFlags, Quote, QuoteId};
use crate::util::now_ms;
use rusqlite::{params, Connection, OptionalExtension};

const QUOTE_COLUMNS: &str = "id, collection_id, text, author_first_name, author_last_name, tags,
     display_quotation_marks, display_author, display_author_on_new_line,
     created_at, updated_at";

/// Trait for quote storage operations
pub trait QuoteRepository {
    /// Insert a fully built quote
    fn insert(&self, quote: &Quote) -> Result<()>;

    /// Get a quote by ID
    fn get(&self, id: &QuoteId) -> Result<Option<Quote>>;

    /// List quotes, optionally restricted to one collection, oldest first
    fn list(&self, collection: Option<&CollectionId>) -> Result<Vec<Quote>>;

    /// Persist every field of an existing quote and bump its update time
    fn update(&self, quote: &Quote) -> Result<Quote>;

    /// Delete one quote
    fn delete(&self, id: &QuoteId) -> Result<()>;

    /// Delete several quotes atomically
    fn delete_many(&self, ids: &[QuoteId]) -> Result<()>;

    /// Reassign several quotes to another collection atomically
    fn move_many(&self, ids: &[QuoteId], collection: &CollectionId) -> Result<()>;
}

/// `SQLite` implementation of `QuoteRepository`
pub struct SqliteQuoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteQuoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a quote from a database row
    fn parse_quote(row: &rusqlite::Row<'_>) -> rusqlite::Result<Quote> {
        Ok(Quote {
            id: parse_id(row, 0)?,
            collection_id: parse_id(row, 1)?,
            text: row.get(2)?,
            author_first_name: row.get(3)?,
            author_last_name: row.get(4)?,
            tags: row.get(5)?,
            display: DisplayFlags {
                quotation_marks: row.get::<_, i32>(6)? != 0,
                show_author: row.get::<_, i32>(7)? != 0,
                author_on_new_line: row.get::<_, i32>(8)? != 0,
            },
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn delete_row(&self, id: &QuoteId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM quotes WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_id<T>(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = uuid::Error>,
{
    let raw: String = row.get(index)?;
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn insert(&self, quote: &Quote) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO quotes ({QUOTE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
            params![
                quote.id.as_str(),
                quote.collection_id.as_str(),
                quote.text,
                quote.author_first_name,
                quote.author_last_name,
                quote.tags,
                i32::from(quote.display.quotation_marks),
                i32::from(quote.display.show_author),
                i32::from(quote.display.author_on_new_line),
                quote.created_at,
                quote.updated_at
            ],
        )?;

        tracing::debug!("Inserted quote {} into {}", quote.id, quote.collection_id);
        Ok(())
    }

    fn get(&self, id: &QuoteId) -> Result<Option<Quote>> {
        let quote = self
            .conn
            .query_row(
                &format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?"),
                params![id.as_str()],
                Self::parse_quote,
            )
            .optional()?;
        Ok(quote)
    }

    fn list(&self, collection: Option<&CollectionId>) -> Result<Vec<Quote>> {
        let quotes = if let Some(collection) = collection {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {QUOTE_COLUMNS} FROM quotes WHERE collection_id = ? ORDER BY created_at ASC"
            ))?;
            let rows = stmt.query_map(params![collection.as_str()], Self::parse_quote)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY created_at ASC"
            ))?;
            let rows = stmt.query_map([], Self::parse_quote)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(quotes)
    }

    fn update(&self, quote: &Quote) -> Result<Quote> {
        let rows = self.conn.execute(
            "UPDATE quotes SET
                collection_id = ?, text = ?, author_first_name = ?, author_last_name = ?,
                tags = ?, display_quotation_marks = ?, display_author = ?,
                display_author_on_new_line = ?, updated_at = ?
             WHERE id = ?",
            params![
                quote.collection_id.as_str(),
                quote.text,
                quote.author_first_name,
                quote.author_last_name,
                quote.tags,
                i32::from(quote.display.quotation_marks),
                i32::from(quote.display.show_author),
                i32::from(quote.display.author_on_new_line),
                now_ms(),
                quote.id.as_str()
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(quote.id.to_string()));
        }

        self.get(&quote.id)?
            .ok_or_else(|| Error::NotFound(quote.id.to_string()))
    }

    fn delete(&self, id: &QuoteId) -> Result<()> {
        self.delete_row(id)?;
        tracing::debug!("Deleted quote {id}");
        Ok(())
    }

    fn delete_many(&self, ids: &[QuoteId]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            self.delete_row(id)?;
        }
        tx.commit()?;

        tracing::debug!("Deleted {} quotes", ids.len());
        Ok(())
    }

    fn move_many(&self, ids: &[QuoteId], collection: &CollectionId) -> Result<()> {
        let now = now_ms();
        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            let rows = self.conn.execute(
                "UPDATE quotes SET collection_id = ?, updated_at = ? WHERE id = ?",
                params![collection.as_str(), now, id.as_str()],
            )?;
            if rows == 0 {
                return Err(Error::NotFound(id.to_string()));
            }
        }
        tx.commit()?;

        tracing::debug!("Moved {} quotes to {collection}", ids.len());
        Ok(())
    }
}
