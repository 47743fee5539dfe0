//! Ready-made lists for the app's browsing screens.
//!
//! Each builder wires a [`ListController`] to the [`Store`], restores the sort
//! the user last picked for that screen and remembers new picks.

use std::rc::Rc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::export::export_plain_text_named;
use crate::list::{BulkCompletion, ListController, ListHandlers};
use crate::models::{Collection, CollectionDraft, CollectionId, EntityKind, Quote, QuoteId};
use crate::search::SearchFilter;
use crate::sort::{SortDefinition, SortRegistry, SortScope, Sortable};
use crate::store::{ChangeKind, EntitySource, Store, StoreChange};

pub const ALL_QUOTES_TITLE: &str = "All Quotes";
pub const COLLECTIONS_TITLE: &str = "Collections";

fn quote_ids(quotes: &[Quote]) -> Vec<QuoteId> {
    quotes.iter().map(|quote| quote.id).collect()
}

fn collection_ids(collections: &[Collection]) -> Vec<CollectionId> {
    collections.iter().map(|collection| collection.id).collect()
}

/// Build a controller whose sort choice is persisted under `scope`.
fn persisted_list<E>(
    store: &Rc<Store>,
    title: &str,
    filter: SearchFilter<E::Parent>,
    scope: SortScope,
    handlers: ListHandlers<E>,
) -> Result<ListController<E>>
where
    E: Sortable + 'static,
    Store: EntitySource<E>,
{
    let registry = SortRegistry::<E>::default();
    let sort = registry
        .get_user_default(&store.preferences(), scope)
        .clone();
    let source: Rc<dyn EntitySource<E>> = store.clone();

    let prefs_store = store.clone();
    let controller = ListController::new(title, source, filter, registry, sort, handlers)?
        .on_sort_change(move |sort: &SortDefinition<E>| {
            SortRegistry::<E>::default().set_user_default(&prefs_store.preferences(), sort, scope)
        });
    Ok(controller)
}

/// Every quote in every collection.
pub fn all_quotes(store: &Rc<Store>, config: &AppConfig) -> Result<ListController<Quote>> {
    let edit_store = store.clone();
    let move_store = store.clone();
    let delete_store = store.clone();
    let bulk_edit_store = store.clone();
    let bulk_move_store = store.clone();
    let bulk_delete_store = store.clone();
    let export_name = config.export_document_name.clone();

    let handlers = ListHandlers::<Quote>::new()
        .on_edit(move |quote: &Quote, draft| edit_store.update_quote(&quote.id, draft).map(drop))
        .on_move(move |quote: &Quote, to| move_store.move_quote(&quote.id, &to))
        .on_delete(move |quote: &Quote| delete_store.delete_quote(&quote.id))
        .delete_message(|_| {
            "Are you sure you want to delete this quote? This action cannot be undone!".to_string()
        })
        .on_bulk_edit(move |quotes: &[Quote], edit| {
            bulk_edit_store.bulk_edit_quotes(&quote_ids(quotes), edit)?;
            Ok(BulkCompletion::KeepSelecting)
        })
        .on_bulk_move(move |quotes: &[Quote], to| {
            bulk_move_store.move_quotes(&quote_ids(quotes), &to)?;
            Ok(BulkCompletion::KeepSelecting)
        })
        .on_bulk_delete(move |quotes: &[Quote]| bulk_delete_store.delete_quotes(&quote_ids(quotes)))
        .bulk_delete_message(|_| {
            "Are you sure you want to delete the selected quotes? This action cannot be undone!"
                .to_string()
        })
        .on_bulk_export(move |quotes: &[Quote]| Ok(export_plain_text_named(quotes, &export_name)));

    persisted_list(
        store,
        ALL_QUOTES_TITLE,
        SearchFilter::all(),
        SortScope::Global,
        handlers,
    )
}

/// The quotes of one collection, titled with its name and retitled on rename.
pub fn collection_quotes(
    store: &Rc<Store>,
    config: &AppConfig,
    collection: &Collection,
) -> Result<ListController<Quote>> {
    let collection_id = collection.id;
    let add_store = store.clone();
    let edit_store = store.clone();
    let move_store = store.clone();
    let delete_store = store.clone();
    let bulk_edit_store = store.clone();
    let bulk_move_store = store.clone();
    let bulk_delete_store = store.clone();
    let title_store = store.clone();
    let export_name = config.export_document_name.clone();

    let handlers = ListHandlers::<Quote>::new()
        .on_add(move |draft| add_store.create_quote(&collection_id, draft).map(drop))
        .on_edit(move |quote: &Quote, draft| edit_store.update_quote(&quote.id, draft).map(drop))
        .on_move(move |quote: &Quote, to| move_store.move_quote(&quote.id, &to))
        .on_delete(move |quote: &Quote| delete_store.delete_quote(&quote.id))
        .delete_message(|_| {
            "Are you sure you want to delete this quote? This action cannot be undone!".to_string()
        })
        .on_bulk_edit(move |quotes: &[Quote], edit| {
            bulk_edit_store.bulk_edit_quotes(&quote_ids(quotes), edit)?;
            Ok(BulkCompletion::KeepSelecting)
        })
        .on_bulk_move(move |quotes: &[Quote], to| {
            bulk_move_store.move_quotes(&quote_ids(quotes), &to)?;
            Ok(BulkCompletion::ExitSelection)
        })
        .on_bulk_delete(move |quotes: &[Quote]| bulk_delete_store.delete_quotes(&quote_ids(quotes)))
        .bulk_delete_message(|quotes| {
            format!(
                "Are you sure you want to delete the {} selected quotes? This action cannot be undone!",
                quotes.len()
            )
        })
        .on_bulk_export(move |quotes: &[Quote]| Ok(export_plain_text_named(quotes, &export_name)));

    let list = persisted_list(
        store,
        &collection.name,
        SearchFilter::within(collection_id),
        SortScope::Collection(collection_id),
        handlers,
    )?;
    Ok(list.retitle_with(move |change: &StoreChange| {
        if !renames(change, collection_id) {
            return Ok(None);
        }
        Ok(title_store
            .get_collection(&collection_id)?
            .map(|collection| collection.name))
    }))
}

fn renames(change: &StoreChange, collection_id: CollectionId) -> bool {
    change.entity == EntityKind::Collection
        && change.kind == ChangeKind::Updated
        && change.ids.contains(&collection_id.to_string())
}

/// The collections themselves.
pub fn collections(store: &Rc<Store>) -> Result<ListController<Collection>> {
    let add_store = store.clone();
    let edit_store = store.clone();
    let delete_store = store.clone();
    let bulk_delete_store = store.clone();

    let handlers = ListHandlers::<Collection>::new()
        .on_add(move |draft: &CollectionDraft| add_store.create_collection(&draft.name).map(drop))
        .on_edit(move |collection: &Collection, draft: &CollectionDraft| {
            edit_store
                .update_collection(&collection.id, &draft.name)
                .map(drop)
        })
        .on_delete(move |collection: &Collection| delete_store.delete_collection(&collection.id))
        .delete_message(|collection| {
            format!(
                "Are you sure you want to delete {} and all of its quotes? This action cannot be undone!",
                collection.name
            )
        })
        .on_bulk_delete(move |collections: &[Collection]| {
            bulk_delete_store.delete_collections(&collection_ids(collections))
        })
        .bulk_delete_message(|collections| {
            format!(
                "Are you sure you want to delete the {} selected collections and all of their quotes? This action cannot be undone!",
                collections.len()
            )
        });

    persisted_list(
        store,
        COLLECTIONS_TITLE,
        SearchFilter::all(),
        SortScope::Global,
        handlers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{BulkAction, ListMode, RowAction};
    use crate::models::QuoteDraft;
    use pretty_assertions::assert_eq;

    fn setup() -> (Rc<Store>, AppConfig, Collection) {
        let store = Rc::new(Store::open_in_memory().unwrap());
        let stoics = store.create_collection("Stoics").unwrap();
        store
            .create_quote(
                &stoics.id,
                &QuoteDraft::new("Memento mori").author("Marcus", "Aurelius"),
            )
            .unwrap();
        store
            .create_quote(&stoics.id, &QuoteDraft::new("Amor fati").tags("philosophy"))
            .unwrap();
        (store, AppConfig::default(), stoics)
    }

    #[test]
    fn all_quotes_offers_everything_but_add() {
        let (store, config, _) = setup();
        let mut list = all_quotes(&store, &config).unwrap();

        assert_eq!(list.title(), "All Quotes");
        assert!(!list.can_add());
        assert_eq!(
            list.row_actions(),
            vec![RowAction::Edit, RowAction::Move, RowAction::Delete]
        );

        list.enter_selection().unwrap();
        let actions: Vec<BulkAction> = list.bulk_actions().into_iter().map(|(a, _)| a).collect();
        assert_eq!(
            actions,
            vec![
                BulkAction::Edit,
                BulkAction::Move,
                BulkAction::Delete,
                BulkAction::Export
            ]
        );
    }

    #[test]
    fn collection_quotes_follow_a_rename() {
        let (store, config, stoics) = setup();
        let other = store.create_collection("Poets").unwrap();
        let mut quotes = collection_quotes(&store, &config, &stoics).unwrap();
        let mut collection_list = collections(&store).unwrap();
        assert_eq!(quotes.title(), "Stoics");

        collection_list.request_edit(other.id).unwrap();
        assert!(collection_list
            .submit_edit(&CollectionDraft::new("Bards"))
            .unwrap());
        assert!(!quotes.poll_changes().unwrap());
        assert_eq!(quotes.title(), "Stoics");

        collection_list.request_edit(stoics.id).unwrap();
        assert!(collection_list
            .submit_edit(&CollectionDraft::new("The Stoa"))
            .unwrap());
        assert!(quotes.poll_changes().unwrap());
        assert_eq!(quotes.title(), "The Stoa");
        assert_eq!(quotes.len(), 2);
    }

    #[test]
    fn all_quotes_exports_selection() {
        let (store, config, _) = setup();
        let mut list = all_quotes(&store, &config).unwrap();
        list.set_sort("Text (Z-A)").unwrap();
        list.enter_selection().unwrap();
        list.invert_selection().unwrap();

        let document = list.bulk_export().unwrap().unwrap();
        assert_eq!(document.suggested_file_name(), "Exported Quotes.txt");
        assert_eq!(
            document.contents,
            "Memento mori \u{2014}\u{2014}Marcus Aurelius\nAmor fati \u{2014}\u{2014}Anonymous"
        );
    }

    #[test]
    fn collection_sort_choice_is_remembered_per_collection() {
        let (store, config, stoics) = setup();
        let poets = store.create_collection("Poets").unwrap();

        let mut list = collection_quotes(&store, &config, &stoics).unwrap();
        assert_eq!(list.sort().name(), "Newest");
        list.set_sort("Tags (A-Z)").unwrap();
        assert!(list.alert().is_none());

        let reopened = collection_quotes(&store, &config, &stoics).unwrap();
        assert_eq!(reopened.sort().name(), "Tags (A-Z)");
        let keys: Vec<&str> = reopened.sections().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["NONE", "PHILOSOPHY"]);

        let other = collection_quotes(&store, &config, &poets).unwrap();
        assert_eq!(other.sort().name(), "Newest");
        let everything = all_quotes(&store, &config).unwrap();
        assert_eq!(everything.sort().name(), "Newest");
    }

    #[test]
    fn collection_bulk_move_exits_selection() {
        let (store, config, stoics) = setup();
        let poets = store.create_collection("Poets").unwrap();
        let mut list = collection_quotes(&store, &config, &stoics).unwrap();

        list.enter_selection().unwrap();
        list.invert_selection().unwrap();
        list.request_bulk_move().unwrap();
        assert!(list.submit_bulk_move(poets.id).unwrap());

        assert_eq!(list.mode(), ListMode::Browsing);
        assert!(list.is_empty());
        assert_eq!(store.quote_count(&poets.id).unwrap(), 2);
    }

    #[test]
    fn collection_bulk_delete_message_counts_selection() {
        let (store, config, stoics) = setup();
        let mut list = collection_quotes(&store, &config, &stoics).unwrap();
        list.enter_selection().unwrap();
        list.invert_selection().unwrap();
        list.request_bulk_delete().unwrap();

        assert_eq!(
            list.confirmation().unwrap().message,
            "Are you sure you want to delete the 2 selected quotes? This action cannot be undone!"
        );
    }

    #[test]
    fn collection_add_validates_text() {
        let (store, config, stoics) = setup();
        let mut list = collection_quotes(&store, &config, &stoics).unwrap();

        list.request_add().unwrap();
        assert!(!list.submit_add(&QuoteDraft::new("  ")).unwrap());
        assert_eq!(list.alert().unwrap().message, "Text is empty!");

        list.dismiss_alert();
        assert!(list.submit_add(&QuoteDraft::new("Waste no more time")).unwrap());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn deleting_a_collection_updates_both_lists() {
        let (store, config, stoics) = setup();
        let mut quotes = all_quotes(&store, &config).unwrap();
        let mut list = collections(&store).unwrap();
        assert_eq!(list.title(), "Collections");

        list.request_delete(stoics.id).unwrap();
        assert!(list
            .confirmation()
            .unwrap()
            .message
            .starts_with("Are you sure you want to delete Stoics"));
        assert!(list.confirm().unwrap());

        assert!(list.is_empty());
        assert!(quotes.poll_changes().unwrap());
        assert!(quotes.is_empty());
    }

    #[test]
    fn renaming_collection_with_blank_name_alerts() {
        let (store, _, stoics) = setup();
        let mut list = collections(&store).unwrap();

        list.request_edit(stoics.id).unwrap();
        assert!(!list.submit_edit(&CollectionDraft::new(" ")).unwrap());
        assert_eq!(list.alert().unwrap().message, "Name is empty!");
        assert!(list.sheet().is_some());
    }
}
