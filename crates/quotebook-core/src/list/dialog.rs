//! Modal state a list can present: edit sheets, confirmations and alerts.

use crate::error::Error;
use crate::models::Entity;

pub const ALERT_TITLE: &str = "Error";
pub const CONFIRM_TITLE: &str = "Are you sure?";
pub const CANCEL_LABEL: &str = "No, cancel";

/// A dismissible error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    /// Alert for a failed handler.
    ///
    /// Validation failures show their own message. Anything else is logged and
    /// shown with the generic message.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        if !error.is_validation() {
            tracing::error!("List operation failed: {error}");
        }
        Self {
            title: ALERT_TITLE.to_string(),
            message: error.user_message(),
        }
    }
}

/// Form a list has open, holding a snapshot of its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sheet<E: Entity> {
    Add,
    Edit(E),
    Move(E),
    BulkEdit(Vec<E>),
    BulkMove(Vec<E>),
}

/// Destructive operation waiting on the user's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction<E: Entity> {
    Delete(E),
    Move(E, E::Parent),
    BulkDelete(Vec<E>),
}

impl<E: Entity> PendingAction<E> {
    const fn confirm_label(&self) -> &'static str {
        match self {
            Self::Delete(_) | Self::BulkDelete(_) => "Yes, delete",
            Self::Move(..) => "Yes, move",
        }
    }
}

/// An "Are you sure?" prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<E: Entity> {
    pub title: &'static str,
    pub message: String,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pub(crate) action: PendingAction<E>,
}

impl<E: Entity> Confirmation<E> {
    pub(crate) fn new(message: String, action: PendingAction<E>) -> Self {
        Self {
            title: CONFIRM_TITLE,
            message,
            confirm_label: action.confirm_label(),
            cancel_label: CANCEL_LABEL,
            action,
        }
    }

    /// The operation that runs if the user confirms.
    #[must_use]
    pub const fn action(&self) -> &PendingAction<E> {
        &self.action
    }
}
