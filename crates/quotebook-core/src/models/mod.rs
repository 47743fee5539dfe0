//! Data models for Quotebook

mod collection;
mod entity;
mod quote;
mod tags;

pub use collection::{Collection, CollectionDraft, CollectionId};
pub use entity::{Entity, EntityKind};
pub use quote::{
    BulkQuoteEdit, DisplayFlags, Quote, QuoteDraft, QuoteId, TagsEdit, ANONYMOUS_AUTHOR,
};
pub use tags::{apply_tags_edit, format_tags, normalize_tags, parse_tags, TagsEditMode};
