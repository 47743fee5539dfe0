//! Capability contract shared by every listable record type.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Discriminates record types in change notifications and preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Collection,
    Quote,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Quote => "quote",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that can be fetched, searched, sorted and shown in a list.
///
/// `Parent` is the identity of the owning record (the destination of a move).
/// Types that have no owner use [`std::convert::Infallible`], which makes
/// move operations on them unrepresentable. `Draft` and `BulkEdit` are the
/// payloads produced by the single and bulk edit forms.
pub trait Entity: Clone + Debug {
    type Id: Copy + Eq + Ord + Hash + Debug + Display;
    type Parent: Copy + Eq + Debug;
    type Draft;
    type BulkEdit;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    /// Owning record, if this type has one.
    fn parent(&self) -> Option<Self::Parent>;

    /// Text fields matched by the list search box.
    fn search_fields(&self) -> Vec<&str>;
}
