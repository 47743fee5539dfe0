//! Change notifications pushed from the store to live lists.

use std::sync::mpsc::{Receiver, Sender};

use crate::models::EntityKind;

/// What happened to the records named in a [`StoreChange`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// A committed mutation, delivered to every live subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub entity: EntityKind,
    pub kind: ChangeKind,
    pub ids: Vec<String>,
}

impl StoreChange {
    pub fn new<I>(entity: EntityKind, kind: ChangeKind, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        Self {
            entity,
            kind,
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Receiving end of a store subscription
///
/// Dropping it unsubscribes; the store prunes closed channels on its next
/// notification.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<StoreChange>,
}

impl Subscription {
    pub(crate) const fn new(receiver: Receiver<StoreChange>) -> Self {
        Self { receiver }
    }

    /// Take every change delivered since the last call, without blocking.
    pub fn drain(&self) -> Vec<StoreChange> {
        self.receiver.try_iter().collect()
    }

    /// Drain pending changes and report whether any concerned `entity`.
    pub fn changed(&self, entity: EntityKind) -> bool {
        self.drain().iter().any(|change| change.entity == entity)
    }
}

/// Fan-out list of subscriber channels.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<StoreChange>>,
}

impl Subscribers {
    pub(crate) fn add(&mut self) -> Subscription {
        let (sender, receiver) = std::sync::mpsc::channel();
        self.senders.push(sender);
        Subscription::new(receiver)
    }

    pub(crate) fn publish(&mut self, change: &StoreChange) {
        self.senders
            .retain(|sender| sender.send(change.clone()).is_ok());
        tracing::debug!(
            "Published {:?} {:?} ({} ids) to {} subscribers",
            change.kind,
            change.entity,
            change.ids.len(),
            self.senders.len()
        );
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_changes() {
        let mut subscribers = Subscribers::default();
        let first = subscribers.add();
        let second = subscribers.add();

        subscribers.publish(&StoreChange::new(
            EntityKind::Quote,
            ChangeKind::Inserted,
            ["a"],
        ));

        assert_eq!(first.drain().len(), 1);
        assert!(second.changed(EntityKind::Quote));
        assert!(first.drain().is_empty());
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let mut subscribers = Subscribers::default();
        let kept = subscribers.add();
        drop(subscribers.add());

        subscribers.publish(&StoreChange::new(
            EntityKind::Collection,
            ChangeKind::Deleted,
            ["c"],
        ));
        assert_eq!(subscribers.len(), 1);
        assert!(!kept.changed(EntityKind::Quote));
    }
}
