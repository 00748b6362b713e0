use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::{Rc, Weak},
};

use uuid::Uuid;

use crate::api::{CommentState, ThreadId, Time};

/// A status change the server already confirmed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusEvent {
    pub thread: ThreadId,
    pub status: CommentState,
    pub at: Time,
}

type Listener = Rc<dyn Fn(&StatusEvent)>;

#[derive(Default)]
struct Registry {
    listeners: HashMap<ThreadId, HashMap<Uuid, Listener>>,
    updating: HashSet<ThreadId>,
}

/// Relays confirmed status changes to every surface watching the same thread,
/// so that they converge without each of them asking the server.
///
/// It also makes sure at most one status update per thread is in flight.
/// Cloning gives another handle onto the same registry.
#[derive(Clone, Default)]
pub struct StatusBus(Rc<RefCell<Registry>>);

impl StatusBus {
    pub fn new() -> StatusBus {
        StatusBus::default()
    }

    pub fn subscribe<F>(&self, thread: ThreadId, listener: F) -> Subscription
    where
        F: 'static + Fn(&StatusEvent),
    {
        let id = Uuid::new_v4();
        self.0
            .borrow_mut()
            .listeners
            .entry(thread)
            .or_insert_with(HashMap::new)
            .insert(id, Rc::new(listener));
        tracing::trace!(?thread, listener = ?id, "subscribed to thread status");
        Subscription {
            bus: Rc::downgrade(&self.0),
            thread,
            id,
        }
    }

    /// Delivers `event` to all listeners of its thread but `origin`, returning
    /// how many were reached
    pub fn publish(&self, event: StatusEvent, origin: Option<Uuid>) -> usize {
        // Collect first: listeners are free to (un)subscribe while handling the event
        let targets = match self.0.borrow().listeners.get(&event.thread) {
            None => Vec::new(),
            Some(listeners) => listeners
                .iter()
                .filter(|(id, _)| Some(**id) != origin)
                .map(|(_, l)| l.clone())
                .collect::<Vec<_>>(),
        };
        for l in targets.iter() {
            l(&event);
        }
        tracing::debug!(
            thread = ?event.thread,
            status = %event.status,
            delivered = targets.len(),
            "published thread status"
        );
        targets.len()
    }

    pub fn listeners(&self, thread: ThreadId) -> usize {
        self.0
            .borrow()
            .listeners
            .get(&thread)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /// Claims the right to update `thread`, `None` if an update is already
    /// in flight for it
    pub fn begin_update(&self, thread: ThreadId) -> Option<UpdateGuard> {
        match self.0.borrow_mut().updating.insert(thread) {
            true => Some(UpdateGuard {
                bus: Rc::downgrade(&self.0),
                thread,
            }),
            false => None,
        }
    }

    pub fn is_updating(&self, thread: ThreadId) -> bool {
        self.0.borrow().updating.contains(&thread)
    }
}

/// Marks an update in flight until dropped
pub struct UpdateGuard {
    bus: Weak<RefCell<Registry>>,
    thread: ThreadId,
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().updating.remove(&self.thread);
        }
    }
}

/// Keeps a listener registered until dropped
pub struct Subscription {
    bus: Weak<RefCell<Registry>>,
    thread: ThreadId,
    id: Uuid,
}

impl Subscription {
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let bus = match self.bus.upgrade() {
            Some(bus) => bus,
            None => return,
        };
        let mut bus = bus.borrow_mut();
        if let Some(listeners) = bus.listeners.get_mut(&self.thread) {
            listeners.remove(&self.id);
            if listeners.is_empty() {
                bus.listeners.remove(&self.thread);
            }
        }
        tracing::trace!(thread = ?self.thread, listener = ?self.id, "unsubscribed from thread status");
    }
}
