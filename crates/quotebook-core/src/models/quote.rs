//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::collection::CollectionId;
use super::entity::{Entity, EntityKind};
use super::tags::{apply_tags_edit, normalize_tags, TagsEditMode};
use crate::util::{initial_of, month_label, now_ms};

/// Author shown when a quote has neither first nor last name.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Section label for a missing field value.
const NONE_LABEL: &str = "NONE";
/// Section label for a quote with no author at all.
const ANONYMOUS_LABEL: &str = "ANONYMOUS";

/// A unique identifier for a quote, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuoteId(Uuid);

impl QuoteId {
    /// Create a new unique quote ID using UUID v7
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

impl Default for QuoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Per-quote formatting switches used by [`Quote::display_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFlags {
    /// Wrap the text in curly quotation marks
    pub quotation_marks: bool,
    /// Append the author after the text
    pub show_author: bool,
    /// Put the author on its own line instead of after a space
    pub author_on_new_line: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            quotation_marks: true,
            show_author: true,
            author_on_new_line: false,
        }
    }
}

/// A single attributable or anonymous piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier
    pub id: QuoteId,
    /// Owning collection
    pub collection_id: CollectionId,
    /// Raw quote text, never empty
    pub text: String,
    /// Author first name (empty when unknown)
    pub author_first_name: String,
    /// Author last name (empty when unknown)
    pub author_last_name: String,
    /// Normalized comma-separated tags (empty when untagged)
    pub tags: String,
    /// Formatting switches
    pub display: DisplayFlags,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Quote {
    /// Create a new quote in `collection_id` from form values.
    #[must_use]
    pub fn new(collection_id: CollectionId, draft: &QuoteDraft, display: DisplayFlags) -> Self {
        let now = now_ms();
        let mut quote = Self {
            id: QuoteId::new(),
            collection_id,
            text: String::new(),
            author_first_name: String::new(),
            author_last_name: String::new(),
            tags: String::new(),
            display,
            created_at: now,
            updated_at: now,
        };
        quote.apply_draft(draft);
        quote
    }

    /// Overwrite the editable fields with trimmed form values.
    pub fn apply_draft(&mut self, draft: &QuoteDraft) {
        self.text = draft.text.trim().to_string();
        self.author_first_name = draft.author_first_name.trim().to_string();
        self.author_last_name = draft.author_last_name.trim().to_string();
        self.tags = normalize_tags(&draft.tags);
    }

    /// Apply the parts of a bulk edit that are set.
    pub fn apply_bulk_edit(&mut self, edit: &BulkQuoteEdit) {
        if let Some(first) = &edit.author_first_name {
            self.author_first_name = first.trim().to_string();
        }
        if let Some(last) = &edit.author_last_name {
            self.author_last_name = last.trim().to_string();
        }
        if let Some(tags) = &edit.tags {
            self.tags = apply_tags_edit(&self.tags, tags.mode, &tags.value);
        }
    }

    /// Form values pre-filled from this quote.
    #[must_use]
    pub fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            text: self.text.clone(),
            author_first_name: self.author_first_name.clone(),
            author_last_name: self.author_last_name.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Author full name, or `Anonymous` when no name is set
    #[must_use]
    pub fn author(&self) -> String {
        let name = format!("{} {}", self.author_first_name, self.author_last_name);
        let name = name.trim();
        if name.is_empty() {
            ANONYMOUS_AUTHOR.to_string()
        } else {
            name.to_string()
        }
    }

    /// Number of characters in the raw text
    #[must_use]
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }

    /// Text formatted according to the quote's display flags.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut text = if self.display.quotation_marks {
            format!("\u{201c}{}\u{201d}", self.text)
        } else {
            self.text.clone()
        };
        if self.display.show_author {
            text.push(if self.display.author_on_new_line { '\n' } else { ' ' });
            text.push('\u{2014}');
            text.push_str(&self.author());
        }
        text
    }

    /// One line of the plain-text export.
    #[must_use]
    pub fn export_text(&self) -> String {
        format!("{} \u{2014}\u{2014}{}", self.text, self.author())
    }

    /// Uppercased first character of the text
    #[must_use]
    pub fn text_initial(&self) -> String {
        initial_of(&self.text)
    }

    /// Grouping key for first-name sorts.
    #[must_use]
    pub fn author_first_name_key(&self) -> String {
        author_key(&self.author_first_name, &self.author_last_name)
    }

    /// Grouping key for last-name sorts.
    #[must_use]
    pub fn author_last_name_key(&self) -> String {
        author_key(&self.author_last_name, &self.author_first_name)
    }

    /// Grouping key for tag sorts.
    #[must_use]
    pub fn tags_key(&self) -> String {
        if self.tags.is_empty() {
            NONE_LABEL.to_string()
        } else {
            self.tags.to_uppercase()
        }
    }

    #[must_use]
    pub fn month_created(&self) -> String {
        month_label(self.created_at)
    }

    #[must_use]
    pub fn month_changed(&self) -> String {
        month_label(self.updated_at)
    }
}

fn author_key(primary: &str, other: &str) -> String {
    if !primary.is_empty() {
        primary.to_uppercase()
    } else if !other.is_empty() {
        NONE_LABEL.to_string()
    } else {
        ANONYMOUS_LABEL.to_string()
    }
}

impl Entity for Quote {
    type Id = QuoteId;
    type Parent = CollectionId;
    type Draft = QuoteDraft;
    type BulkEdit = BulkQuoteEdit;

    const KIND: EntityKind = EntityKind::Quote;

    fn id(&self) -> QuoteId {
        self.id
    }

    fn parent(&self) -> Option<CollectionId> {
        Some(self.collection_id)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.text.as_str(),
            self.author_first_name.as_str(),
            self.author_last_name.as_str(),
            self.tags.as_str(),
        ]
    }
}

/// Form values for adding or editing a quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub text: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub tags: String,
}

impl QuoteDraft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn author(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.author_first_name = first.into();
        self.author_last_name = last.into();
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

/// A tag change applied to every quote in a bulk edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsEdit {
    pub mode: TagsEditMode,
    pub value: String,
}

/// Bulk edit form values; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkQuoteEdit {
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
    pub tags: Option<TagsEdit>,
}

impl BulkQuoteEdit {
    #[must_use]
    pub fn with_tags(mode: TagsEditMode, value: impl Into<String>) -> Self {
        Self {
            tags: Some(TagsEdit {
                mode,
                value: value.into(),
            }),
            ..Self::default()
        }
    }

    /// Whether applying this edit would change nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.author_first_name.is_none() && self.author_last_name.is_none() && self.tags.is_none()
    }
}
