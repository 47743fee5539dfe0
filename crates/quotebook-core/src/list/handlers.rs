//! Caller-supplied operations a list can dispatch to.
//!
//! Every operation is optional. A list only offers the affordances whose
//! handler was wired up; asking for any other one is an
//! [`Error::ActionUnavailable`](crate::Error::ActionUnavailable).

use std::fmt;

use crate::error::Result;
use crate::export::ExportDocument;
use crate::models::Entity;

/// Message shown under "Are you sure?" when nothing more specific is supplied.
pub const DEFAULT_DELETE_MESSAGE: &str = "This action cannot be undone!";
pub const DEFAULT_MOVE_MESSAGE: &str = "The item will be moved out of its current collection.";

/// What the list should do after a successful bulk edit or move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkCompletion {
    #[default]
    KeepSelecting,
    ExitSelection,
}

/// Per-row affordance offered while browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Edit,
    Move,
    Delete,
}

impl RowAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Move => "Move",
            Self::Delete => "Delete",
        }
    }
}

/// Toolbar affordance offered while selecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    Edit,
    Move,
    Delete,
    Export,
}

impl BulkAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Move => "Move",
            Self::Delete => "Delete",
            Self::Export => "Export",
        }
    }
}

pub type AddHandler<E> = Box<dyn FnMut(&<E as Entity>::Draft) -> Result<()>>;
pub type EditHandler<E> = Box<dyn FnMut(&E, &<E as Entity>::Draft) -> Result<()>>;
pub type MoveHandler<E> = Box<dyn FnMut(&E, <E as Entity>::Parent) -> Result<()>>;
pub type DeleteHandler<E> = Box<dyn FnMut(&E) -> Result<()>>;
pub type BulkEditHandler<E> =
    Box<dyn FnMut(&[E], &<E as Entity>::BulkEdit) -> Result<BulkCompletion>>;
pub type BulkMoveHandler<E> =
    Box<dyn FnMut(&[E], <E as Entity>::Parent) -> Result<BulkCompletion>>;
pub type BulkDeleteHandler<E> = Box<dyn FnMut(&[E]) -> Result<()>>;
pub type BulkExportHandler<E> = Box<dyn FnMut(&[E]) -> Result<ExportDocument>>;

/// The set of operations wired into one list
pub struct ListHandlers<E: Entity> {
    pub(crate) add: Option<AddHandler<E>>,
    pub(crate) edit: Option<EditHandler<E>>,
    pub(crate) move_to: Option<MoveHandler<E>>,
    pub(crate) delete: Option<DeleteHandler<E>>,
    pub(crate) bulk_edit: Option<BulkEditHandler<E>>,
    pub(crate) bulk_move: Option<BulkMoveHandler<E>>,
    pub(crate) bulk_delete: Option<BulkDeleteHandler<E>>,
    pub(crate) bulk_export: Option<BulkExportHandler<E>>,
    pub(crate) delete_message: Box<dyn Fn(&E) -> String>,
    pub(crate) move_message: Box<dyn Fn(&E) -> String>,
    pub(crate) bulk_delete_message: Box<dyn Fn(&[E]) -> String>,
}

impl<E: Entity> Default for ListHandlers<E> {
    fn default() -> Self {
        Self {
            add: None,
            edit: None,
            move_to: None,
            delete: None,
            bulk_edit: None,
            bulk_move: None,
            bulk_delete: None,
            bulk_export: None,
            delete_message: Box::new(|_| DEFAULT_DELETE_MESSAGE.to_string()),
            move_message: Box::new(|_| DEFAULT_MOVE_MESSAGE.to_string()),
            bulk_delete_message: Box::new(|_| DEFAULT_DELETE_MESSAGE.to_string()),
        }
    }
}

impl<E: Entity> ListHandlers<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_add(mut self, handler: impl FnMut(&E::Draft) -> Result<()> + 'static) -> Self {
        self.add = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_edit(mut self, handler: impl FnMut(&E, &E::Draft) -> Result<()> + 'static) -> Self {
        self.edit = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_move(mut self, handler: impl FnMut(&E, E::Parent) -> Result<()> + 'static) -> Self {
        self.move_to = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_delete(mut self, handler: impl FnMut(&E) -> Result<()> + 'static) -> Self {
        self.delete = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_bulk_edit(
        mut self,
        handler: impl FnMut(&[E], &E::BulkEdit) -> Result<BulkCompletion> + 'static,
    ) -> Self {
        self.bulk_edit = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_bulk_move(
        mut self,
        handler: impl FnMut(&[E], E::Parent) -> Result<BulkCompletion> + 'static,
    ) -> Self {
        self.bulk_move = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_bulk_delete(mut self, handler: impl FnMut(&[E]) -> Result<()> + 'static) -> Self {
        self.bulk_delete = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_bulk_export(
        mut self,
        handler: impl FnMut(&[E]) -> Result<ExportDocument> + 'static,
    ) -> Self {
        self.bulk_export = Some(Box::new(handler));
        self
    }

    /// Confirmation text for deleting one row.
    #[must_use]
    pub fn delete_message(mut self, message: impl Fn(&E) -> String + 'static) -> Self {
        self.delete_message = Box::new(message);
        self
    }

    /// Confirmation text for moving one row.
    #[must_use]
    pub fn move_message(mut self, message: impl Fn(&E) -> String + 'static) -> Self {
        self.move_message = Box::new(message);
        self
    }

    /// Confirmation text for deleting the selection.
    #[must_use]
    pub fn bulk_delete_message(mut self, message: impl Fn(&[E]) -> String + 'static) -> Self {
        self.bulk_delete_message = Box::new(message);
        self
    }

    /// Row affordances that were wired, in display order.
    #[must_use]
    pub fn row_actions(&self) -> Vec<RowAction> {
        [
            (RowAction::Edit, self.edit.is_some()),
            (RowAction::Move, self.move_to.is_some()),
            (RowAction::Delete, self.delete.is_some()),
        ]
        .into_iter()
        .filter_map(|(action, wired)| wired.then_some(action))
        .collect()
    }

    /// Bulk affordances that were wired, in display order.
    #[must_use]
    pub fn bulk_actions(&self) -> Vec<BulkAction> {
        [
            (BulkAction::Edit, self.bulk_edit.is_some()),
            (BulkAction::Move, self.bulk_move.is_some()),
            (BulkAction::Delete, self.bulk_delete.is_some()),
            (BulkAction::Export, self.bulk_export.is_some()),
        ]
        .into_iter()
        .filter_map(|(action, wired)| wired.then_some(action))
        .collect()
    }

    #[must_use]
    pub const fn can_add(&self) -> bool {
        self.add.is_some()
    }
}

impl<E: Entity> fmt::Debug for ListHandlers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListHandlers")
            .field("add", &self.can_add())
            .field("rows", &self.row_actions())
            .field("bulk", &self.bulk_actions())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Collection, Quote};

    #[test]
    fn unwired_handlers_offer_nothing() {
        let handlers = ListHandlers::<Quote>::new();
        assert!(handlers.row_actions().is_empty());
        assert!(handlers.bulk_actions().is_empty());
        assert!(!handlers.can_add());
    }

    #[test]
    fn only_wired_actions_are_listed_in_order() {
        let handlers = ListHandlers::<Collection>::new()
            .on_delete(|_| Ok(()))
            .on_edit(|_, _| Ok(()))
            .on_bulk_delete(|_| Ok(()));

        assert_eq!(handlers.row_actions(), vec![RowAction::Edit, RowAction::Delete]);
        assert_eq!(handlers.bulk_actions(), vec![BulkAction::Delete]);
    }

    #[test]
    fn default_messages_warn_about_undo() {
        let handlers = ListHandlers::<Collection>::new();
        let stoics = Collection::new("Stoics");
        assert_eq!((handlers.delete_message)(&stoics), DEFAULT_DELETE_MESSAGE);
        assert_eq!(
            (handlers.bulk_delete_message)(std::slice::from_ref(&stoics)),
            DEFAULT_DELETE_MESSAGE
        );
    }
}
