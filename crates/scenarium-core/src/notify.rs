//! Change notification boundary.
//!
//! Executors MUST NOT talk to views directly. Every committed mutation
//! flows through one ChangeEvent on the session's bus, and subscribed
//! views react to events alone.
//!
//! Each database handle owns its own bus. There is no process-global
//! dispatch state, so two databases in one host never cross-notify.

use crate::{
    traits::{EntityIdentity, EntityTag},
    types::{Id, Ulid},
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

///
/// ChangeAction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeAction {
    Added,
    Updated,
    Removed,
}

impl ChangeAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// ChangeEvent
///
/// One committed mutation, keyed by entity kind and carrying the id
/// only. Subscribers that need the record re-read it from the store,
/// which keeps every view converging on the same persisted state.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChangeEvent {
    pub tag: EntityTag,
    pub action: ChangeAction,
    pub id: Ulid,
}

impl ChangeEvent {
    #[must_use]
    pub fn new<E: EntityIdentity>(action: ChangeAction, id: Id<E>) -> Self {
        Self {
            tag: E::TAG,
            action,
            id: id.ulid(),
        }
    }

    #[must_use]
    pub fn added<E: EntityIdentity>(id: Id<E>) -> Self {
        Self::new::<E>(ChangeAction::Added, id)
    }

    #[must_use]
    pub fn updated<E: EntityIdentity>(id: Id<E>) -> Self {
        Self::new::<E>(ChangeAction::Updated, id)
    }

    #[must_use]
    pub fn removed<E: EntityIdentity>(id: Id<E>) -> Self {
        Self::new::<E>(ChangeAction::Removed, id)
    }

    /// Whether this event concerns entity kind `E`.
    #[must_use]
    pub fn is_for<E: EntityIdentity>(&self) -> bool {
        self.tag == E::TAG
    }

    /// Recovers the typed id when the event concerns entity kind `E`.
    #[must_use]
    pub fn id_for<E: EntityIdentity>(&self) -> Option<Id<E>> {
        self.is_for::<E>().then(|| Id::new(self.id))
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.tag, self.action, self.id)
    }
}

///
/// ChangeSink
///
/// Receiver side of the bus. Sinks are held weakly; dropping the sink
/// (or its subscription token) is the unsubscribe.
///

pub trait ChangeSink {
    fn notify(&self, event: &ChangeEvent);
}

///
/// SinkEntry
///

struct SinkEntry {
    id: u64,
    filter: Option<EntityTag>,
    sink: Weak<dyn ChangeSink>,
}

impl SinkEntry {
    fn matches(&self, tag: EntityTag) -> bool {
        self.filter.is_none_or(|wanted| wanted == tag)
    }
}

type SinkList = Rc<RefCell<Vec<SinkEntry>>>;

///
/// Subscription
///
/// RAII token returned by `subscribe`. Dropping it detaches the sink
/// from the bus; panels keep their tokens alive for as long as they
/// want events.
///

#[must_use = "dropping the subscription detaches the sink"]
pub struct Subscription {
    entries: Weak<RefCell<Vec<SinkEntry>>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.borrow_mut().retain(|entry| entry.id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.id).finish()
    }
}

///
/// ChangeBus
///

#[derive(Default)]
pub struct ChangeBus {
    entries: SinkList,
    next_id: Cell<u64>,
}

impl ChangeBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink for events of one entity kind.
    pub fn subscribe<S: ChangeSink + 'static>(&self, tag: EntityTag, sink: &Rc<S>) -> Subscription {
        self.register(Some(tag), sink)
    }

    /// Registers a sink for events of every entity kind.
    pub fn subscribe_any<S: ChangeSink + 'static>(&self, sink: &Rc<S>) -> Subscription {
        self.register(None, sink)
    }

    fn register<S: ChangeSink + 'static>(
        &self,
        filter: Option<EntityTag>,
        sink: &Rc<S>,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        let weak: Weak<dyn ChangeSink> = Rc::<S>::downgrade(sink);
        self.entries.borrow_mut().push(SinkEntry {
            id,
            filter,
            sink: weak,
        });

        Subscription {
            entries: Rc::downgrade(&self.entries),
            id,
        }
    }

    /// Delivers one event to every live matching sink, in subscription
    /// order.
    ///
    /// The matching set is snapshotted before dispatch so a handler may
    /// subscribe, unsubscribe, or publish again without re-entering the
    /// sink list borrow.
    pub fn publish(&self, event: ChangeEvent) {
        let live: Vec<Rc<dyn ChangeSink>> = {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|entry| entry.sink.strong_count() > 0);
            entries
                .iter()
                .filter(|entry| entry.matches(event.tag))
                .filter_map(|entry| entry.sink.upgrade())
                .collect()
        };

        log::debug!("notify: {event} -> {} sink(s)", live.len());

        for sink in live {
            sink.notify(&event);
        }
    }

    /// Number of currently live subscriptions.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.sink.strong_count() > 0)
            .count()
    }
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("sinks", &self.sink_count())
            .finish()
    }
}

///
/// TESTS
///
