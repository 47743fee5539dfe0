//! Built-in sort definitions for quotes and collections.

use super::{SortDefinition, SortDirection, SortValue};
use crate::models::{Collection, Entity, Quote};

use SortDirection::{Ascending, Descending};

/// Entity types that ship with a catalog of sort definitions.
pub trait Sortable: Entity + Sized {
    /// Every definition, in menu order. The first one is the fallback default.
    fn sort_definitions() -> Vec<SortDefinition<Self>>;
}

fn created(q: &Quote) -> SortValue {
    SortValue::number(q.created_at)
}

fn changed(q: &Quote) -> SortValue {
    SortValue::number(q.updated_at)
}

fn text(q: &Quote) -> SortValue {
    SortValue::text(&q.text)
}

fn first_name(q: &Quote) -> SortValue {
    SortValue::text(&q.author_first_name_key())
}

fn last_name(q: &Quote) -> SortValue {
    SortValue::text(&q.author_last_name_key())
}

fn tags(q: &Quote) -> SortValue {
    SortValue::text(&q.tags_key())
}

impl Sortable for Quote {
    fn sort_definitions() -> Vec<SortDefinition<Self>> {
        vec![
            SortDefinition::new("Newest", Self::month_created).then(created, Descending),
            SortDefinition::new("Oldest", Self::month_created).then(created, Ascending),
            SortDefinition::new("Recently Changed", Self::month_changed).then(changed, Descending),
            SortDefinition::new("Least Recently Changed", Self::month_changed)
                .then(changed, Ascending),
            SortDefinition::new("Text (A-Z)", Self::text_initial).then(text, Ascending),
            SortDefinition::new("Text (Z-A)", Self::text_initial).then(text, Descending),
            SortDefinition::new("Author First Name (A-Z)", Self::author_first_name_key)
                .then(first_name, Ascending)
                .then(last_name, Ascending)
                .then(text, Ascending),
            SortDefinition::new("Author First Name (Z-A)", Self::author_first_name_key)
                .then(first_name, Descending)
                .then(last_name, Descending)
                .then(text, Ascending),
            SortDefinition::new("Author Last Name (A-Z)", Self::author_last_name_key)
                .then(last_name, Ascending)
                .then(first_name, Ascending)
                .then(text, Ascending),
            SortDefinition::new("Author Last Name (Z-A)", Self::author_last_name_key)
                .then(last_name, Descending)
                .then(first_name, Descending)
                .then(text, Ascending),
            SortDefinition::new("Tags (A-Z)", Self::tags_key)
                .then(tags, Ascending)
                .then(text, Ascending),
            SortDefinition::new("Tags (Z-A)", Self::tags_key)
                .then(tags, Descending)
                .then(text, Ascending),
        ]
    }
}

fn name(c: &Collection) -> SortValue {
    SortValue::text(&c.name)
}

fn collection_created(c: &Collection) -> SortValue {
    SortValue::number(c.created_at)
}

fn collection_changed(c: &Collection) -> SortValue {
    SortValue::number(c.updated_at)
}

impl Sortable for Collection {
    fn sort_definitions() -> Vec<SortDefinition<Self>> {
        vec![
            SortDefinition::new("Name (A-Z)", Self::name_initial).then(name, Ascending),
            SortDefinition::new("Name (Z-A)", Self::name_initial).then(name, Descending),
            SortDefinition::new("Newest", Self::day_created).then(collection_created, Descending),
            SortDefinition::new("Oldest", Self::day_created).then(collection_created, Ascending),
            SortDefinition::new("Recently Changed", Self::day_changed)
                .then(collection_changed, Descending),
            SortDefinition::new("Least Recently Changed", Self::day_changed)
                .then(collection_changed, Ascending),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionId, DisplayFlags, QuoteDraft};
    use std::cmp::Ordering;
    use std::collections::HashSet;

    fn quotes() -> Vec<Quote> {
        let collection = CollectionId::new();
        let drafts = [
            QuoteDraft::new("Memento mori").author("Marcus", "Aurelius"),
            QuoteDraft::new("Amor fati").tags("philosophy"),
            QuoteDraft::new("amor fati").tags("Philosophy, fate"),
            QuoteDraft::new("Luck is what happens").author("", "Seneca"),
            QuoteDraft::new("Waste no more time").author("Marcus", "Aurelius"),
        ];
        drafts
            .iter()
            .enumerate()
            .map(|(i, draft)| {
                let mut quote = Quote::new(collection, draft, DisplayFlags::default());
                quote.created_at = 1_000 * i64::try_from(i).unwrap();
                quote.updated_at = 10_000 - quote.created_at;
                quote
            })
            .collect()
    }

    #[test]
    fn sort_names_are_unique() {
        let names: HashSet<&str> = Quote::sort_definitions().iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), Quote::sort_definitions().len());

        let names: HashSet<&str> = Collection::sort_definitions()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names.len(), Collection::sort_definitions().len());
    }

    #[test]
    fn text_sections_stay_contiguous_for_expanding_uppercase() {
        let collection = CollectionId::new();
        let quotes: Vec<Quote> = ["Sa", "ßb", "Sz"]
            .iter()
            .map(|text| Quote::new(collection, &QuoteDraft::new(*text), DisplayFlags::default()))
            .collect();
        let sort = Quote::sort_definitions()
            .into_iter()
            .find(|s| s.name() == "Text (A-Z)")
            .unwrap();

        let sections = sort.sectioned(quotes);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].key, "S");
        let texts: Vec<&str> = sections[0].items.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Sa", "ßb", "Sz"]);
    }

    #[test]
    fn collection_name_sections_stay_contiguous() {
        let sort = Collection::sort_definitions()
            .into_iter()
            .find(|s| s.name() == "Name (A-Z)")
            .unwrap();
        let sections = sort.sectioned(vec![
            Collection::new("Stoics"),
            Collection::new("ßtraße"),
            Collection::new("Sages"),
        ]);
        let keys: Vec<&str> = sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["S"]);
    }

    #[test]
    fn every_quote_sort_is_a_strict_total_order() {
        let quotes = quotes();
        for sort in Quote::sort_definitions() {
            let mut sorted = quotes.clone();
            sort.sort(&mut sorted);
            for pair in sorted.windows(2) {
                assert_eq!(
                    sort.compare(&pair[0], &pair[1]),
                    Ordering::Less,
                    "sort {} is not strictly increasing",
                    sort.name()
                );
            }
        }
    }

    #[test]
    fn every_quote_sort_yields_contiguous_sections() {
        for sort in Quote::sort_definitions() {
            let sections = sort.sectioned(quotes());
            let keys: HashSet<&str> = sections.iter().map(|s| s.key.as_str()).collect();
            assert_eq!(keys.len(), sections.len(), "sort {}", sort.name());
        }
    }

    #[test]
    fn first_name_sort_groups_last_name_only_under_none() {
        let sort = Quote::sort_definitions()
            .into_iter()
            .find(|s| s.name() == "Author First Name (A-Z)")
            .unwrap();
        let sections = sort.sectioned(quotes());
        let keys: Vec<&str> = sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["ANONYMOUS", "MARCUS", "NONE"]);
    }

    #[test]
    fn newest_puts_latest_first() {
        let sort = &Quote::sort_definitions()[0];
        assert_eq!(sort.name(), "Newest");
        let mut sorted = quotes();
        sort.sort(&mut sorted);
        assert_eq!(sorted[0].text, "Waste no more time");
    }
}
