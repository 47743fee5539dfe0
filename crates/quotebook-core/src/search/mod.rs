//! List search filters
//!
//! A filter is the AND of an optional parent scope and an optional text term.
//! The term matches when any of the entity's searchable fields contains it,
//! ignoring case and diacritics.

use crate::models::Entity;
use crate::util::fold_for_search;

/// Predicate applied to list results before sorting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter<P> {
    scope: Option<P>,
    term: String,
}

impl<P> Default for SearchFilter<P> {
    fn default() -> Self {
        Self {
            scope: None,
            term: String::new(),
        }
    }
}

impl<P: Copy + Eq> SearchFilter<P> {
    /// Filter matching everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter restricted to the children of `parent`.
    #[must_use]
    pub fn within(parent: P) -> Self {
        Self {
            scope: Some(parent),
            term: String::new(),
        }
    }

    /// Replace the text term; whitespace-only terms clear it.
    #[must_use]
    pub fn with_term(mut self, term: &str) -> Self {
        self.set_term(term);
        self
    }

    pub fn set_term(&mut self, term: &str) {
        self.term = fold_for_search(term.trim());
    }

    #[must_use]
    pub const fn scope(&self) -> Option<P> {
        self.scope
    }

    /// Normalized (trimmed, folded) term; empty when there is none.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether `entity` passes both the scope and the text term.
    pub fn matches<E>(&self, entity: &E) -> bool
    where
        E: Entity<Parent = P>,
    {
        self.matches_scope(entity) && self.matches_term(entity)
    }

    fn matches_scope<E>(&self, entity: &E) -> bool
    where
        E: Entity<Parent = P>,
    {
        self.scope.map_or(true, |scope| entity.parent() == Some(scope))
    }

    fn matches_term<E>(&self, entity: &E) -> bool
    where
        E: Entity<Parent = P>,
    {
        if self.term.is_empty() {
            return true;
        }
        entity
            .search_fields()
            .iter()
            .any(|field| fold_for_search(field).contains(&self.term))
    }

    /// Keep only the entities this filter matches.
    #[must_use]
    pub fn apply<E>(&self, entities: Vec<E>) -> Vec<E>
    where
        E: Entity<Parent = P>,
    {
        entities
            .into_iter()
            .filter(|entity| self.matches(entity))
            .collect()
    }
}
