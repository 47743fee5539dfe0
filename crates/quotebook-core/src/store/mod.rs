//! Validated, notifying access to collections and quotes.
//!
//! `Store` wraps the repositories with the business rules the forms rely on
//! (non-empty names and text, normalized tags, remembered display flags) and
//! publishes a [`StoreChange`] after every committed mutation so live lists can
//! refresh themselves.

mod notify;

use std::cell::RefCell;
use std::convert::Infallible;

use crate::config::AppConfig;
use crate::db::{
    CollectionRepository, Database, PreferenceRepository, QuoteRepository,
    SqliteCollectionRepository, SqlitePreferenceRepository, SqliteQuoteRepository,
};
use crate::error::{Error, Result};
use crate::models::{
    BulkQuoteEdit, Collection, CollectionId, DisplayFlags, Entity, EntityKind, Quote, QuoteDraft,
    QuoteId,
};
use crate::search::SearchFilter;

pub use notify::{ChangeKind, StoreChange, Subscription};
use notify::Subscribers;

/// Validation message for a blank collection name.
pub const EMPTY_NAME_MESSAGE: &str = "Name is empty!";
/// Validation message for blank quote text.
pub const EMPTY_TEXT_MESSAGE: &str = "Text is empty!";

/// A live data source a list can fetch from and subscribe to
pub trait EntitySource<E: Entity> {
    /// Fetch every entity matching `filter`, in no particular order.
    fn query(&self, filter: &SearchFilter<E::Parent>) -> Result<Vec<E>>;

    /// Register interest in future changes.
    fn subscribe(&self) -> Subscription;
}

/// Application data store
pub struct Store {
    db: Database,
    subscribers: RefCell<Subscribers>,
}

impl Store {
    /// Wrap an open database
    pub fn new(db: Database) -> Self {
        Self {
            db,
            subscribers: RefCell::new(Subscribers::default()),
        }
    }

    /// Open the database named by the configuration
    pub fn open(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(Database::open(&config.database_path)?))
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Register interest in committed changes
    pub fn subscribe(&self) -> Subscription {
        self.subscribers.borrow_mut().add()
    }

    fn publish(&self, change: StoreChange) {
        self.subscribers.borrow_mut().publish(&change);
    }

    fn collection_repo(&self) -> SqliteCollectionRepository<'_> {
        SqliteCollectionRepository::new(self.db.connection())
    }

    fn quote_repo(&self) -> SqliteQuoteRepository<'_> {
        SqliteQuoteRepository::new(self.db.connection())
    }

    /// Key/value preferences (sort choices, display defaults)
    pub fn preferences(&self) -> SqlitePreferenceRepository<'_> {
        SqlitePreferenceRepository::new(self.db.connection())
    }

    // Collections

    pub fn create_collection(&self, name: &str) -> Result<Collection> {
        let name = validate_name(name)?;
        let collection = self.collection_repo().create(&name)?;
        self.publish(StoreChange::new(
            EntityKind::Collection,
            ChangeKind::Inserted,
            [collection.id],
        ));
        Ok(collection)
    }

    pub fn update_collection(&self, id: &CollectionId, name: &str) -> Result<Collection> {
        let name = validate_name(name)?;
        let collection = self.collection_repo().rename(id, &name)?;
        self.publish(StoreChange::new(
            EntityKind::Collection,
            ChangeKind::Updated,
            [collection.id],
        ));
        Ok(collection)
    }

    /// Delete a collection together with every quote it owns
    pub fn delete_collection(&self, id: &CollectionId) -> Result<()> {
        self.delete_collections(&[*id])
    }

    /// Delete several collections (and their quotes) atomically
    pub fn delete_collections(&self, ids: &[CollectionId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut orphaned = Vec::new();
        let tx = self.db.connection().unchecked_transaction()?;
        for id in ids {
            orphaned.extend(self.quote_repo().list(Some(id))?.into_iter().map(|q| q.id));
            self.collection_repo().delete(id)?;
        }
        tx.commit()?;

        self.publish(StoreChange::new(
            EntityKind::Collection,
            ChangeKind::Deleted,
            ids.iter().copied(),
        ));
        if !orphaned.is_empty() {
            self.publish(StoreChange::new(
                EntityKind::Quote,
                ChangeKind::Deleted,
                orphaned,
            ));
        }
        Ok(())
    }

    pub fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>> {
        self.collection_repo().get(id)
    }

    pub fn list_collections(&self) -> Result<Vec<Collection>> {
        self.collection_repo().list()
    }

    pub fn quote_count(&self, id: &CollectionId) -> Result<usize> {
        self.collection_repo().quote_count(id)
    }

    fn ensure_collection(&self, id: &CollectionId) -> Result<()> {
        if self.collection_repo().get(id)?.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    // Quotes

    /// Create a quote using the last-used display flags
    pub fn create_quote(&self, collection_id: &CollectionId, draft: &QuoteDraft) -> Result<Quote> {
        validate_text(&draft.text)?;
        self.ensure_collection(collection_id)?;

        let display = self.preferences().display_defaults()?;
        let quote = Quote::new(*collection_id, draft, display);
        self.quote_repo().insert(&quote)?;

        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Inserted,
            [quote.id],
        ));
        Ok(quote)
    }

    /// Replace a quote's text, author and tags; display flags are kept
    pub fn update_quote(&self, id: &QuoteId, draft: &QuoteDraft) -> Result<Quote> {
        validate_text(&draft.text)?;
        let mut quote = self.require_quote(id)?;
        quote.apply_draft(draft);
        let quote = self.quote_repo().update(&quote)?;

        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Updated,
            [quote.id],
        ));
        Ok(quote)
    }

    /// Copy a quote into the same collection with the last-used display flags
    pub fn duplicate_quote(&self, id: &QuoteId) -> Result<Quote> {
        let source = self.require_quote(id)?;
        let display = self.preferences().display_defaults()?;
        let copy = Quote::new(source.collection_id, &source.to_draft(), display);
        self.quote_repo().insert(&copy)?;

        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Inserted,
            [copy.id],
        ));
        Ok(copy)
    }

    /// Change a quote's display flags and remember them for new quotes
    pub fn set_quote_display(&self, id: &QuoteId, display: DisplayFlags) -> Result<Quote> {
        let mut quote = self.require_quote(id)?;
        quote.display = display;
        let quote = self.quote_repo().update(&quote)?;
        self.preferences().save_display_defaults(display)?;

        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Updated,
            [quote.id],
        ));
        Ok(quote)
    }

    pub fn delete_quote(&self, id: &QuoteId) -> Result<()> {
        self.quote_repo().delete(id)?;
        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Deleted,
            [*id],
        ));
        Ok(())
    }

    pub fn delete_quotes(&self, ids: &[QuoteId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.quote_repo().delete_many(ids)?;
        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Deleted,
            ids.iter().copied(),
        ));
        Ok(())
    }

    pub fn move_quote(&self, id: &QuoteId, collection_id: &CollectionId) -> Result<()> {
        self.move_quotes(&[*id], collection_id)
    }

    pub fn move_quotes(&self, ids: &[QuoteId], collection_id: &CollectionId) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.ensure_collection(collection_id)?;
        self.quote_repo().move_many(ids, collection_id)?;
        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Updated,
            ids.iter().copied(),
        ));
        Ok(())
    }

    /// Apply one bulk edit to several quotes atomically
    pub fn bulk_edit_quotes(&self, ids: &[QuoteId], edit: &BulkQuoteEdit) -> Result<Vec<Quote>> {
        if ids.is_empty() || edit.is_noop() {
            return Ok(Vec::new());
        }

        let tx = self.db.connection().unchecked_transaction()?;
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            let mut quote = self.require_quote(id)?;
            quote.apply_bulk_edit(edit);
            updated.push(self.quote_repo().update(&quote)?);
        }
        tx.commit()?;

        self.publish(StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Updated,
            ids.iter().copied(),
        ));
        Ok(updated)
    }

    pub fn get_quote(&self, id: &QuoteId) -> Result<Option<Quote>> {
        self.quote_repo().get(id)
    }

    fn require_quote(&self, id: &QuoteId) -> Result<Quote> {
        self.quote_repo()
            .get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

impl EntitySource<Quote> for Store {
    fn query(&self, filter: &SearchFilter<CollectionId>) -> Result<Vec<Quote>> {
        let quotes = self.quote_repo().list(filter.scope().as_ref())?;
        Ok(filter.apply(quotes))
    }

    fn subscribe(&self) -> Subscription {
        Self::subscribe(self)
    }
}

impl EntitySource<Collection> for Store {
    fn query(&self, filter: &SearchFilter<Infallible>) -> Result<Vec<Collection>> {
        Ok(filter.apply(self.collection_repo().list()?))
    }

    fn subscribe(&self) -> Subscription {
        Self::subscribe(self)
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation(EMPTY_NAME_MESSAGE));
    }
    Ok(name.to_string())
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation(EMPTY_TEXT_MESSAGE));
    }
    Ok(())
}
