//! Named orderings and section grouping for list views
//!
//! A [`SortDefinition`] pairs a section-key extractor with an ordered list of
//! comparison keys. Entities that compare equal on every key fall back to
//! their identity, so a definition is always a strict total order.

mod catalog;
mod registry;

use std::cmp::Ordering;
use std::fmt;

use crate::models::Entity;

pub use catalog::Sortable;
pub use registry::{SortRegistry, SortScope};

/// Direction of a single comparison key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A comparable value extracted from an entity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    /// Case-folded text; build with [`SortValue::text`]
    Text(String),
    Number(i64),
}

impl SortValue {
    /// Text key compared case-insensitively (stored uppercased).
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_uppercase())
    }

    #[must_use]
    pub const fn number(value: i64) -> Self {
        Self::Number(value)
    }
}

/// One step of a sort: how to extract the key and which way it runs
pub struct SortKey<E> {
    extract: fn(&E) -> SortValue,
    direction: SortDirection,
}

impl<E> Clone for SortKey<E> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract,
            direction: self.direction,
        }
    }
}

impl<E> fmt::Debug for SortKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// A named ordering of entities together with its section grouping
pub struct SortDefinition<E> {
    name: &'static str,
    section: fn(&E) -> String,
    keys: Vec<SortKey<E>>,
}

impl<E> Clone for SortDefinition<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            section: self.section,
            keys: self.keys.clone(),
        }
    }
}

impl<E> fmt::Debug for SortDefinition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDefinition")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// Sort names are the equality key: they are what gets persisted.
impl<E> PartialEq for SortDefinition<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<E> Eq for SortDefinition<E> {}

impl<E: Entity> SortDefinition<E> {
    /// Start a definition; add comparison keys with [`SortDefinition::then`].
    #[must_use]
    pub fn new(name: &'static str, section: fn(&E) -> String) -> Self {
        Self {
            name,
            section,
            keys: Vec::new(),
        }
    }

    /// Append a comparison key consulted when all earlier keys tie.
    #[must_use]
    pub fn then(mut self, extract: fn(&E) -> SortValue, direction: SortDirection) -> Self {
        self.keys.push(SortKey { extract, direction });
        self
    }

    /// Label shown to the user and stored as the preference value.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Section label the entity is grouped under.
    #[must_use]
    pub fn section_key(&self, entity: &E) -> String {
        (self.section)(entity)
    }

    /// Compare two entities key by key, then by identity.
    #[must_use]
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.direction.apply((key.extract)(a).cmp(&(key.extract)(b))))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id().cmp(&b.id()))
    }

    /// Sort entities in place.
    pub fn sort(&self, entities: &mut [E]) {
        entities.sort_by(|a, b| self.compare(a, b));
    }

    /// Sort entities and group adjacent runs sharing a section key.
    #[must_use]
    pub fn sectioned(&self, mut entities: Vec<E>) -> Vec<Section<E>> {
        self.sort(&mut entities);

        let mut sections: Vec<Section<E>> = Vec::new();
        for entity in entities {
            let key = self.section_key(&entity);
            match sections.last_mut() {
                Some(section) if section.key == key => section.items.push(entity),
                _ => sections.push(Section {
                    key,
                    items: vec![entity],
                }),
            }
        }
        sections
    }
}

/// A labeled group of entities sharing a section key under the active sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<E> {
    pub key: String,
    pub items: Vec<E>,
}

impl<E: Entity> Section<E> {
    /// Identities of the entities in this section, in display order.
    pub fn ids(&self) -> impl Iterator<Item = E::Id> + '_ {
        self.items.iter().map(Entity::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionId, DisplayFlags, Quote, QuoteDraft};
    use pretty_assertions::assert_eq;

    fn quote(text: &str, tags: &str) -> Quote {
        Quote::new(
            CollectionId::new(),
            &QuoteDraft::new(text).tags(tags),
            DisplayFlags::default(),
        )
    }

    fn by_tags(direction: SortDirection) -> SortDefinition<Quote> {
        SortDefinition::new("Tags", Quote::tags_key)
            .then(|q| SortValue::text(&q.tags_key()), direction)
            .then(|q| SortValue::text(&q.text), SortDirection::Ascending)
    }

    #[test]
    fn text_keys_compare_case_insensitively() {
        let sort = SortDefinition::new("Text", Quote::text_initial)
            .then(|q| SortValue::text(&q.text), SortDirection::Ascending);
        let mut quotes = vec![quote("banana", ""), quote("Apple", ""), quote("cherry", "")];
        sort.sort(&mut quotes);
        let texts: Vec<&str> = quotes.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn descending_reverses_the_same_key() {
        let sort = by_tags(SortDirection::Descending);
        let sections = sort.sectioned(vec![quote("a", ""), quote("b", "philosophy")]);
        let keys: Vec<&str> = sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["PHILOSOPHY", "NONE"]);
    }

    #[test]
    fn identity_breaks_ties() {
        let sort = SortDefinition::new("Text", Quote::text_initial)
            .then(|q| SortValue::text(&q.text), SortDirection::Ascending);
        let a = quote("same", "");
        let b = quote("SAME", "");
        assert_ne!(sort.compare(&a, &b), Ordering::Equal);
        assert_eq!(sort.compare(&a, &b), a.id.cmp(&b.id));
        assert_eq!(sort.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn sectioned_groups_adjacent_runs() {
        let sort = by_tags(SortDirection::Ascending);
        let sections = sort.sectioned(vec![
            quote("Amor fati", "philosophy"),
            quote("Memento mori", ""),
            quote("Cogito", "philosophy"),
        ]);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].key, "NONE");
        assert_eq!(sections[0].items.len(), 1);
        assert_eq!(sections[1].key, "PHILOSOPHY");
        let texts: Vec<&str> = sections[1].items.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Amor fati", "Cogito"]);
    }

    #[test]
    fn definitions_compare_by_name() {
        assert_eq!(
            by_tags(SortDirection::Ascending),
            by_tags(SortDirection::Descending)
        );
    }
}
