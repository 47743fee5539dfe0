//! quotebook-core - Core library for Quotebook
//!
//! This crate contains the models, storage layer, sorting and searching rules
//! and the selectable list state used by Quotebook front ends.

pub mod browse;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod list;
pub mod logging;
pub mod models;
pub mod search;
pub mod sort;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{Collection, CollectionId, Quote, QuoteId};
pub use store::Store;
