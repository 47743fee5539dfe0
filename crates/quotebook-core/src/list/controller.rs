//! Browsing / selecting state machine over a live, sorted, sectioned list.

use std::collections::BTreeSet;
use std::rc::Rc;

use super::dialog::{Alert, Confirmation, PendingAction, Sheet};
use super::handlers::{BulkAction, BulkCompletion, ListHandlers, RowAction};
use crate::error::{Error, Result};
use crate::export::ExportDocument;
use crate::models::Entity;
use crate::search::SearchFilter;
use crate::sort::{Section, SortDefinition, SortRegistry};
use crate::store::{EntitySource, StoreChange, Subscription};

/// Interaction mode of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    #[default]
    Browsing,
    Selecting,
}

/// Outcome of activating a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation<E> {
    /// Browsing: show the entity's detail page.
    Open(E),
    /// Selecting: the row's membership was flipped.
    Toggled { selected: bool },
}

type SortChangeHook<E> = Box<dyn FnMut(&SortDefinition<E>) -> Result<()>>;
type RetitleHook = Box<dyn FnMut(&StoreChange) -> Result<Option<String>>>;

/// Generic list controller
///
/// Rows come from an [`EntitySource`] through the current [`SearchFilter`] and
/// are grouped by the active sort. Mutations go to the wired
/// [`ListHandlers`]; a failed handler becomes an [`Alert`] and leaves the list
/// as it was. Methods returning `Err` only do so for requests the list cannot
/// serve at all (unwired handler, unknown row, nothing selected).
pub struct ListController<E: Entity> {
    title: String,
    source: Rc<dyn EntitySource<E>>,
    subscription: Subscription,
    filter: SearchFilter<E::Parent>,
    registry: SortRegistry<E>,
    sort: SortDefinition<E>,
    sections: Vec<Section<E>>,
    mode: ListMode,
    selection: BTreeSet<E::Id>,
    handlers: ListHandlers<E>,
    sheet: Option<Sheet<E>>,
    confirmation: Option<Confirmation<E>>,
    alert: Option<Alert>,
    on_sort_change: Option<SortChangeHook<E>>,
    retitle: Option<RetitleHook>,
}

impl<E: Entity> ListController<E> {
    /// Subscribe to `source` and load the first page of rows.
    pub fn new(
        title: impl Into<String>,
        source: Rc<dyn EntitySource<E>>,
        filter: SearchFilter<E::Parent>,
        registry: SortRegistry<E>,
        sort: SortDefinition<E>,
        handlers: ListHandlers<E>,
    ) -> Result<Self> {
        let subscription = source.subscribe();
        let mut controller = Self {
            title: title.into(),
            source,
            subscription,
            filter,
            registry,
            sort,
            sections: Vec::new(),
            mode: ListMode::Browsing,
            selection: BTreeSet::new(),
            handlers,
            sheet: None,
            confirmation: None,
            alert: None,
            on_sort_change: None,
            retitle: None,
        };
        controller.refresh()?;
        Ok(controller)
    }

    /// Called after the user picks a different sort.
    #[must_use]
    pub fn on_sort_change(
        mut self,
        hook: impl FnMut(&SortDefinition<E>) -> Result<()> + 'static,
    ) -> Self {
        self.on_sort_change = Some(Box::new(hook));
        self
    }

    /// Derive a new title from store changes, e.g. when the parent is renamed.
    ///
    /// The hook sees every change drained by [`Self::poll_changes`]; returning
    /// `Some` replaces the title.
    #[must_use]
    pub fn retitle_with(
        mut self,
        hook: impl FnMut(&StoreChange) -> Result<Option<String>> + 'static,
    ) -> Self {
        self.retitle = Some(Box::new(hook));
        self
    }

    // Rows

    /// Re-query the source and regroup. Selected rows that are no longer
    /// visible are dropped from the selection.
    pub fn refresh(&mut self) -> Result<()> {
        let entities = self.source.query(&self.filter)?;
        self.sections = self.sort.sectioned(entities);

        let visible: BTreeSet<E::Id> = self.visible().map(Entity::id).collect();
        let before = self.selection.len();
        self.selection.retain(|id| visible.contains(id));
        if self.selection.len() != before {
            tracing::debug!(
                "Pruned {} hidden {} rows from selection",
                before - self.selection.len(),
                E::KIND
            );
        }
        Ok(())
    }

    /// Apply pending store changes: retitle if a hook asks for it, and
    /// refresh if any change touched this list's entity kind.
    pub fn poll_changes(&mut self) -> Result<bool> {
        let changes = self.subscription.drain();
        let mut updated = false;
        if let Some(hook) = self.retitle.as_mut() {
            for change in &changes {
                if let Some(title) = hook(change)? {
                    self.title = title;
                    updated = true;
                }
            }
        }
        if changes.iter().any(|change| change.entity == E::KIND) {
            self.refresh()?;
            updated = true;
        }
        Ok(updated)
    }

    #[must_use]
    pub fn sections(&self) -> &[Section<E>] {
        &self.sections
    }

    /// Visible rows in display order.
    pub fn visible(&self) -> impl Iterator<Item = &E> + '_ {
        self.sections.iter().flat_map(|section| section.items.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn find_visible(&self, id: E::Id) -> Result<E> {
        self.visible()
            .find(|entity| entity.id() == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{} {id}", E::KIND)))
    }

    /// `"<N> Selected"` while selecting, otherwise the list's own title.
    #[must_use]
    pub fn title(&self) -> String {
        match self.mode {
            ListMode::Browsing => self.title.clone(),
            ListMode::Selecting => format!("{} Selected", self.selection.len()),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // Search and sort

    #[must_use]
    pub fn search_term(&self) -> &str {
        self.filter.term()
    }

    pub fn set_search(&mut self, term: &str) -> Result<()> {
        self.filter.set_term(term);
        self.refresh()
    }

    #[must_use]
    pub const fn sort(&self) -> &SortDefinition<E> {
        &self.sort
    }

    #[must_use]
    pub fn sort_options(&self) -> &[SortDefinition<E>] {
        self.registry.list_sorts()
    }

    /// Switch to the registered sort called `name` and regroup.
    pub fn set_sort(&mut self, name: &str) -> Result<()> {
        let sort = self
            .registry
            .find(name)
            .cloned()
            .ok_or_else(|| Error::InvalidInput(format!("unknown sort {name:?}")))?;
        if sort == self.sort {
            return Ok(());
        }

        let entities: Vec<E> = std::mem::take(&mut self.sections)
            .into_iter()
            .flat_map(|section| section.items)
            .collect();
        self.sections = sort.sectioned(entities);
        self.sort = sort;

        if let Some(hook) = self.on_sort_change.as_mut() {
            if let Err(error) = hook(&self.sort) {
                self.alert = Some(Alert::from_error(&error));
            }
        }
        Ok(())
    }

    // Selection

    #[must_use]
    pub const fn mode(&self) -> ListMode {
        self.mode
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.mode == ListMode::Selecting
    }

    /// Entering selection is only offered for a non-empty list.
    #[must_use]
    pub fn can_enter_selection(&self) -> bool {
        self.mode == ListMode::Browsing && !self.is_empty()
    }

    pub fn enter_selection(&mut self) -> Result<()> {
        if !self.can_enter_selection() {
            return Err(Error::ActionUnavailable("select"));
        }
        self.selection.clear();
        self.mode = ListMode::Selecting;
        Ok(())
    }

    pub fn exit_selection(&mut self) {
        self.selection.clear();
        self.mode = ListMode::Browsing;
    }

    #[must_use]
    pub const fn selection(&self) -> &BTreeSet<E::Id> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: E::Id) -> bool {
        self.selection.contains(&id)
    }

    /// Copy of the selected rows, in display order.
    #[must_use]
    pub fn selected_snapshot(&self) -> Vec<E> {
        self.visible()
            .filter(|entity| self.selection.contains(&entity.id()))
            .cloned()
            .collect()
    }

    /// Open a row while browsing, or toggle it while selecting.
    pub fn activate(&mut self, id: E::Id) -> Result<Activation<E>> {
        let entity = self.find_visible(id)?;
        match self.mode {
            ListMode::Browsing => Ok(Activation::Open(entity)),
            ListMode::Selecting => {
                let selected = if self.selection.remove(&id) {
                    false
                } else {
                    self.selection.insert(id);
                    true
                };
                Ok(Activation::Toggled { selected })
            }
        }
    }

    /// Whether every row of the section is selected.
    #[must_use]
    pub fn is_section_selected(&self, key: &str) -> bool {
        self.sections
            .iter()
            .find(|section| section.key == key)
            .is_some_and(|section| section.ids().all(|id| self.selection.contains(&id)))
    }

    /// Select the whole section, or unselect it if it was fully selected.
    pub fn toggle_section(&mut self, key: &str) -> Result<bool> {
        if !self.is_selecting() {
            return Err(Error::ActionUnavailable("select section"));
        }
        let Some(section) = self.sections.iter().find(|section| section.key == key) else {
            return Err(Error::NotFound(format!("section {key:?}")));
        };

        let ids: Vec<E::Id> = section.ids().collect();
        let select = !ids.iter().all(|id| self.selection.contains(id));
        for id in ids {
            if select {
                self.selection.insert(id);
            } else {
                self.selection.remove(&id);
            }
        }
        Ok(select)
    }

    /// Complement the selection against the visible rows.
    pub fn invert_selection(&mut self) -> Result<()> {
        if !self.is_selecting() {
            return Err(Error::ActionUnavailable("invert"));
        }
        let inverted: BTreeSet<E::Id> = self
            .visible()
            .map(Entity::id)
            .filter(|id| !self.selection.contains(id))
            .collect();
        self.selection = inverted;
        Ok(())
    }

    // Affordances

    /// Row actions to show while browsing; none while selecting.
    #[must_use]
    pub fn row_actions(&self) -> Vec<RowAction> {
        match self.mode {
            ListMode::Browsing => self.handlers.row_actions(),
            ListMode::Selecting => Vec::new(),
        }
    }

    /// Bulk actions to show while selecting, each with its enabled state.
    #[must_use]
    pub fn bulk_actions(&self) -> Vec<(BulkAction, bool)> {
        match self.mode {
            ListMode::Browsing => Vec::new(),
            ListMode::Selecting => {
                let enabled = !self.selection.is_empty();
                self.handlers
                    .bulk_actions()
                    .into_iter()
                    .map(|action| (action, enabled))
                    .collect()
            }
        }
    }

    #[must_use]
    pub fn can_add(&self) -> bool {
        self.mode == ListMode::Browsing && self.handlers.can_add()
    }

    // Single-row requests

    pub fn request_add(&mut self) -> Result<()> {
        if !self.can_add() {
            return Err(Error::ActionUnavailable("add"));
        }
        self.sheet = Some(Sheet::Add);
        Ok(())
    }

    pub fn request_edit(&mut self, id: E::Id) -> Result<()> {
        self.require_row_action(RowAction::Edit)?;
        self.sheet = Some(Sheet::Edit(self.find_visible(id)?));
        Ok(())
    }

    pub fn request_move(&mut self, id: E::Id) -> Result<()> {
        self.require_row_action(RowAction::Move)?;
        self.sheet = Some(Sheet::Move(self.find_visible(id)?));
        Ok(())
    }

    pub fn request_delete(&mut self, id: E::Id) -> Result<()> {
        self.require_row_action(RowAction::Delete)?;
        let entity = self.find_visible(id)?;
        let message = (self.handlers.delete_message)(&entity);
        self.confirmation = Some(Confirmation::new(message, PendingAction::Delete(entity)));
        Ok(())
    }

    fn require_row_action(&self, action: RowAction) -> Result<()> {
        if self.row_actions().contains(&action) {
            Ok(())
        } else {
            Err(Error::ActionUnavailable(action.label()))
        }
    }

    // Bulk requests

    pub fn request_bulk_edit(&mut self) -> Result<()> {
        let snapshot = self.bulk_snapshot(BulkAction::Edit)?;
        self.sheet = Some(Sheet::BulkEdit(snapshot));
        Ok(())
    }

    pub fn request_bulk_move(&mut self) -> Result<()> {
        let snapshot = self.bulk_snapshot(BulkAction::Move)?;
        self.sheet = Some(Sheet::BulkMove(snapshot));
        Ok(())
    }

    pub fn request_bulk_delete(&mut self) -> Result<()> {
        let snapshot = self.bulk_snapshot(BulkAction::Delete)?;
        let message = (self.handlers.bulk_delete_message)(&snapshot);
        self.confirmation = Some(Confirmation::new(
            message,
            PendingAction::BulkDelete(snapshot),
        ));
        Ok(())
    }

    /// Render the selection for export. `None` means the handler failed and
    /// an alert is showing.
    pub fn bulk_export(&mut self) -> Result<Option<ExportDocument>> {
        let snapshot = self.bulk_snapshot(BulkAction::Export)?;
        let Some(handler) = self.handlers.bulk_export.as_mut() else {
            return Err(Error::ActionUnavailable(BulkAction::Export.label()));
        };
        match handler(&snapshot) {
            Ok(document) => Ok(Some(document)),
            Err(error) => {
                self.alert = Some(Alert::from_error(&error));
                Ok(None)
            }
        }
    }

    fn bulk_snapshot(&self, action: BulkAction) -> Result<Vec<E>> {
        let offered = self
            .bulk_actions()
            .iter()
            .any(|(offered, enabled)| *offered == action && *enabled);
        if !offered {
            return Err(Error::ActionUnavailable(action.label()));
        }
        Ok(self.selected_snapshot())
    }

    // Sheets

    #[must_use]
    pub const fn sheet(&self) -> Option<&Sheet<E>> {
        self.sheet.as_ref()
    }

    /// Close the open sheet without changing anything.
    pub fn dismiss_sheet(&mut self) {
        self.sheet = None;
    }

    /// Submit the add sheet. Returns whether the handler succeeded.
    pub fn submit_add(&mut self, draft: &E::Draft) -> Result<bool> {
        if !matches!(self.sheet, Some(Sheet::Add)) {
            return Err(Error::InvalidInput("no add sheet is open".to_string()));
        }
        let Some(handler) = self.handlers.add.as_mut() else {
            return Err(Error::ActionUnavailable("add"));
        };
        let result = handler(draft);
        Ok(self.finish_sheet(result))
    }

    /// Submit the single edit sheet. Returns whether the handler succeeded.
    pub fn submit_edit(&mut self, draft: &E::Draft) -> Result<bool> {
        let Some(Sheet::Edit(entity)) = &self.sheet else {
            return Err(Error::InvalidInput("no edit sheet is open".to_string()));
        };
        let Some(handler) = self.handlers.edit.as_mut() else {
            return Err(Error::ActionUnavailable(RowAction::Edit.label()));
        };
        let result = handler(entity, draft);
        Ok(self.finish_sheet(result))
    }

    /// Submit the move sheet; the move itself waits for confirmation.
    pub fn submit_move(&mut self, destination: E::Parent) -> Result<()> {
        let Some(Sheet::Move(entity)) = &self.sheet else {
            return Err(Error::InvalidInput("no move sheet is open".to_string()));
        };
        let message = (self.handlers.move_message)(entity);
        self.confirmation = Some(Confirmation::new(
            message,
            PendingAction::Move(entity.clone(), destination),
        ));
        Ok(())
    }

    /// Submit the bulk edit sheet. Returns whether the handler succeeded.
    pub fn submit_bulk_edit(&mut self, edit: &E::BulkEdit) -> Result<bool> {
        let Some(Sheet::BulkEdit(snapshot)) = &self.sheet else {
            return Err(Error::InvalidInput("no bulk edit sheet is open".to_string()));
        };
        let Some(handler) = self.handlers.bulk_edit.as_mut() else {
            return Err(Error::ActionUnavailable(BulkAction::Edit.label()));
        };
        let result = handler(snapshot, edit);
        Ok(self.finish_bulk_sheet(result))
    }

    /// Submit the bulk move sheet. Returns whether the handler succeeded.
    pub fn submit_bulk_move(&mut self, destination: E::Parent) -> Result<bool> {
        let Some(Sheet::BulkMove(snapshot)) = &self.sheet else {
            return Err(Error::InvalidInput("no bulk move sheet is open".to_string()));
        };
        let Some(handler) = self.handlers.bulk_move.as_mut() else {
            return Err(Error::ActionUnavailable(BulkAction::Move.label()));
        };
        let result = handler(snapshot, destination);
        Ok(self.finish_bulk_sheet(result))
    }

    fn finish_sheet(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.sheet = None;
                self.sync_after_mutation();
                true
            }
            Err(error) => {
                self.alert = Some(Alert::from_error(&error));
                false
            }
        }
    }

    fn finish_bulk_sheet(&mut self, result: Result<BulkCompletion>) -> bool {
        match result {
            Ok(completion) => {
                if completion == BulkCompletion::ExitSelection {
                    self.exit_selection();
                }
                self.finish_sheet(Ok(()))
            }
            Err(error) => self.finish_sheet(Err(error)),
        }
    }

    // Confirmations

    #[must_use]
    pub const fn confirmation(&self) -> Option<&Confirmation<E>> {
        self.confirmation.as_ref()
    }

    /// Answer "No": nothing changes and any open sheet stays open.
    pub fn cancel_confirmation(&mut self) {
        self.confirmation = None;
    }

    /// Answer "Yes" and run the pending operation. Returns whether it
    /// succeeded; a failure leaves the list (and any open sheet) as it was.
    pub fn confirm(&mut self) -> Result<bool> {
        let Some(confirmation) = self.confirmation.take() else {
            return Err(Error::InvalidInput("nothing to confirm".to_string()));
        };

        let result = match &confirmation.action {
            PendingAction::Delete(entity) => self
                .handlers
                .delete
                .as_mut()
                .ok_or(Error::ActionUnavailable(RowAction::Delete.label()))
                .map(|handler| handler(entity)),
            PendingAction::Move(entity, destination) => self
                .handlers
                .move_to
                .as_mut()
                .ok_or(Error::ActionUnavailable(RowAction::Move.label()))
                .map(|handler| handler(entity, *destination)),
            PendingAction::BulkDelete(snapshot) => self
                .handlers
                .bulk_delete
                .as_mut()
                .ok_or(Error::ActionUnavailable(BulkAction::Delete.label()))
                .map(|handler| handler(snapshot)),
        }?;

        if let Err(error) = result {
            self.alert = Some(Alert::from_error(&error));
            return Ok(false);
        }

        match confirmation.action {
            PendingAction::Move(..) => self.sheet = None,
            PendingAction::BulkDelete(_) => self.exit_selection(),
            PendingAction::Delete(_) => {}
        }
        self.sync_after_mutation();
        Ok(true)
    }

    // Alerts

    #[must_use]
    pub const fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn sync_after_mutation(&mut self) {
        if let Err(error) = self.poll_changes() {
            self.alert = Some(Alert::from_error(&error));
        }
    }
}
