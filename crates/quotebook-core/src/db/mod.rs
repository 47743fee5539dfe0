//! Database layer for Quotebook

mod collection_repository;
mod connection;
mod migrations;
mod preference_repository;
mod quote_repository;

pub use collection_repository::{CollectionRepository, SqliteCollectionRepository};
pub use connection::Database;
pub use preference_repository::{PreferenceRepository, SqlitePreferenceRepository};
pub use quote_repository::{QuoteRepository, SqliteQuoteRepository};
