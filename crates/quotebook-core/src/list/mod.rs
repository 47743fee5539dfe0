//! Selectable, sectioned list state shared by every browsing screen.

mod controller;
mod dialog;
mod handlers;

pub use controller::{Activation, ListController, ListMode};
pub use dialog::{Alert, Confirmation, PendingAction, Sheet, ALERT_TITLE};
pub use handlers::{
    BulkAction, BulkCompletion, ListHandlers, RowAction, DEFAULT_DELETE_MESSAGE,
    DEFAULT_MOVE_MESSAGE,
};
