//! Per-entity catalog of sorts plus the persisted user choice.

use std::fmt;

use super::{SortDefinition, Sortable};
use crate::db::PreferenceRepository;
use crate::error::{Error, Result};
use crate::models::{CollectionId, Entity};

/// Which list a sort preference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortScope {
    /// Lists not tied to a collection ("All Quotes", the collections list)
    Global,
    /// The quote list of one collection
    Collection(CollectionId),
}

impl fmt::Display for SortScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Collection(id) => write!(f, "collection.{id}"),
        }
    }
}

/// Ordered sort definitions for one entity type
#[derive(Debug, Clone)]
pub struct SortRegistry<E> {
    sorts: Vec<SortDefinition<E>>,
}

impl<E: Sortable> Default for SortRegistry<E> {
    fn default() -> Self {
        Self::new(E::sort_definitions())
    }
}

impl<E: Entity> SortRegistry<E> {
    /// Build a registry from definitions in menu order.
    ///
    /// # Panics
    ///
    /// Panics if `sorts` is empty or two definitions share a name; both are
    /// programming errors in the catalog.
    #[must_use]
    pub fn new(sorts: Vec<SortDefinition<E>>) -> Self {
        assert!(!sorts.is_empty(), "no sorts registered for {}", E::KIND);
        for (index, sort) in sorts.iter().enumerate() {
            assert!(
                !sorts[..index].contains(sort),
                "duplicate sort name {:?} for {}",
                sort.name(),
                E::KIND
            );
        }
        Self { sorts }
    }

    /// Every definition, in menu order.
    #[must_use]
    pub fn list_sorts(&self) -> &[SortDefinition<E>] {
        &self.sorts
    }

    /// The fallback default.
    #[must_use]
    pub fn first(&self) -> &SortDefinition<E> {
        &self.sorts[0]
    }

    /// Look a definition up by its name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SortDefinition<E>> {
        self.sorts.iter().find(|sort| sort.name() == name)
    }

    /// The sort the user last chose for `scope`.
    ///
    /// Missing, renamed, or unreadable preferences resolve to the first sort.
    pub fn get_user_default(
        &self,
        prefs: &impl PreferenceRepository,
        scope: SortScope,
    ) -> &SortDefinition<E> {
        let key = Self::preference_key(scope);
        let stored = match prefs.get(&key) {
            Ok(stored) => stored,
            Err(error) => {
                tracing::warn!("Failed to read sort preference {key}: {error}");
                None
            }
        };

        match stored {
            Some(name) => self.find(&name).unwrap_or_else(|| {
                tracing::debug!("Stored sort {name:?} for {key} no longer exists");
                self.first()
            }),
            None => self.first(),
        }
    }

    /// Remember `sort` as the user's choice for `scope`.
    pub fn set_user_default(
        &self,
        prefs: &impl PreferenceRepository,
        sort: &SortDefinition<E>,
        scope: SortScope,
    ) -> Result<()> {
        if self.find(sort.name()).is_none() {
            return Err(Error::InvalidInput(format!(
                "sort {:?} is not registered for {}",
                sort.name(),
                E::KIND
            )));
        }
        prefs.set(&Self::preference_key(scope), sort.name())
    }

    fn preference_key(scope: SortScope) -> String {
        format!("sort.{}.{scope}", E::KIND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SqlitePreferenceRepository};
    use crate::models::{Collection, Quote};
    use crate::sort::{SortDirection, SortValue};

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn never_set_scope_returns_first_sort() {
        let db = setup();
        let prefs = SqlitePreferenceRepository::new(db.connection());
        let registry = SortRegistry::<Quote>::default();

        let sort = registry.get_user_default(&prefs, SortScope::Global);
        assert_eq!(sort, registry.first());
    }

    #[test]
    fn set_then_get_returns_same_sort() {
        let db = setup();
        let prefs = SqlitePreferenceRepository::new(db.connection());
        let registry = SortRegistry::<Quote>::default();
        let tags = registry.find("Tags (A-Z)").unwrap();

        registry
            .set_user_default(&prefs, tags, SortScope::Global)
            .unwrap();
        assert_eq!(registry.get_user_default(&prefs, SortScope::Global), tags);
    }

    #[test]
    fn scopes_are_independent() {
        let db = setup();
        let prefs = SqlitePreferenceRepository::new(db.connection());
        let registry = SortRegistry::<Quote>::default();
        let stoics = SortScope::Collection(CollectionId::new());
        let oldest = registry.find("Oldest").unwrap();

        registry.set_user_default(&prefs, oldest, stoics).unwrap();
        assert_eq!(registry.get_user_default(&prefs, stoics), oldest);
        assert_eq!(
            registry.get_user_default(&prefs, SortScope::Global),
            registry.first()
        );
        assert_eq!(
            registry.get_user_default(&prefs, SortScope::Collection(CollectionId::new())),
            registry.first()
        );
    }

    #[test]
    fn entity_kinds_do_not_share_preferences() {
        let db = setup();
        let prefs = SqlitePreferenceRepository::new(db.connection());
        let quotes = SortRegistry::<Quote>::default();
        let collections = SortRegistry::<Collection>::default();

        quotes
            .set_user_default(&prefs, quotes.find("Oldest").unwrap(), SortScope::Global)
            .unwrap();
        assert_eq!(
            collections.get_user_default(&prefs, SortScope::Global),
            collections.first()
        );
    }

    #[test]
    fn unknown_stored_name_degrades_to_first() {
        let db = setup();
        let prefs = SqlitePreferenceRepository::new(db.connection());
        prefs.set("sort.quote.global", "Renamed Sort").unwrap();

        let registry = SortRegistry::<Quote>::default();
        assert_eq!(
            registry.get_user_default(&prefs, SortScope::Global),
            registry.first()
        );
    }

    #[test]
    fn setting_unregistered_sort_fails() {
        let db = setup();
        let prefs = SqlitePreferenceRepository::new(db.connection());
        let registry = SortRegistry::<Quote>::default();
        let stray = SortDefinition::<Quote>::new("Stray", Quote::text_initial)
            .then(|q| SortValue::text(&q.text), SortDirection::Ascending);

        let result = registry.set_user_default(&prefs, &stray, SortScope::Global);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    #[should_panic(expected = "no sorts registered")]
    fn empty_registry_is_a_programming_error() {
        let _ = SortRegistry::<Quote>::new(Vec::new());
    }
}
