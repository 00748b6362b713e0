use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::{Rc, Weak},
};

use chrono::Utc;
use rand::Rng;

use crate::{
    api::{CommentState, CommentThread, PullReqRef, ThreadId, Time},
    bus::UpdateGuard, Labels, Notifier, StatusApi, StatusBus, StatusEvent, Subscription,
    ThreadLocator, THREAD_ID_ATTRIBUTE,
};

const MARKER_PREFIX: &str = "CodeCommentStatusButton-";

/// Everything a controller shares with the rest of the application
#[derive(Clone)]
pub struct ControllerContext {
    pub api: Rc<dyn StatusApi>,
    pub bus: StatusBus,
    pub notifier: Rc<dyn Notifier>,
    pub labels: Rc<Labels>,
    /// Used to recover the thread id when it is missing at toggle time
    pub locator: Option<Rc<dyn ThreadLocator>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ToggleOutcome {
    /// Server accepted the change, and the local state now reflects it
    Applied(CommentState),

    /// Server accepted the change, but the controller got unmounted meanwhile
    Discarded(CommentState),

    /// Nothing changed, the user was notified with this message
    Failed(String),

    /// Another update is still in flight for this thread, possibly from
    /// another controller
    Busy,

    Unavailable(Unavailable),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Unavailable {
    Deleted,
    MissingId,
    Unmounted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToggleAction {
    Resolve,
    Reactivate,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToggleButton {
    pub label: String,
    pub action: ToggleAction,
    pub enabled: bool,
    /// Class to render on the button, so the thread id can be looked up from it
    pub marker: String,
}

struct State {
    thread: CommentThread,
}

/// Resolve/reactivate toggle for one comment thread.
///
/// Local state only ever changes after the server confirmed the change,
/// either through our own request or through an event another surface
/// published on the bus. At most one request per thread is in flight at a
/// time, across all controllers sharing the bus.
pub struct StatusController {
    pr: PullReqRef,
    ctx: ControllerContext,
    marker: String,
    state: Rc<RefCell<State>>,
    live: Rc<Cell<bool>>,
    subscription: RefCell<Option<Subscription>>,
}

impl StatusController {
    pub fn mount(pr: PullReqRef, thread: CommentThread, ctx: ControllerContext) -> StatusController {
        let marker = format!(
            "{MARKER_PREFIX}{}",
            rand::thread_rng().gen_range(0..1_000_000)
        );
        let id = thread.id;
        let this = StatusController {
            pr,
            ctx,
            marker,
            state: Rc::new(RefCell::new(State { thread })),
            live: Rc::new(Cell::new(true)),
            subscription: RefCell::new(None),
        };
        if let Some(id) = id {
            this.subscribe(id);
        }
        tracing::trace!(?id, marker = %this.marker, "mounted comment status controller");
        this
    }

    fn subscribe(&self, id: ThreadId) {
        let state = Rc::downgrade(&self.state);
        let live = self.live.clone();
        let sub = self.ctx.bus.subscribe(id, move |e: &StatusEvent| {
            apply_confirmed(&state, &live, e.thread, e.status, e.at);
        });
        *self.subscription.borrow_mut() = Some(sub);
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn pull_req(&self) -> &PullReqRef {
        &self.pr
    }

    pub fn thread(&self) -> CommentThread {
        self.state.borrow().thread.clone()
    }

    pub fn thread_id(&self) -> Option<ThreadId> {
        self.state.borrow().thread.id
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().thread.is_resolved()
    }

    pub fn is_in_flight(&self) -> bool {
        match self.thread_id() {
            Some(id) => self.ctx.bus.is_updating(id),
            None => false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// What to render, `None` for deleted threads
    pub fn button(&self) -> Option<ToggleButton> {
        let s = self.state.borrow();
        if s.thread.is_deleted() {
            return None;
        }
        let (action, label) = match s.thread.is_resolved() {
            true => (ToggleAction::Reactivate, &self.ctx.labels.reactivate),
            false => (ToggleAction::Resolve, &self.ctx.labels.resolve),
        };
        let enabled = match s.thread.id {
            Some(id) => self.live.get() && !self.ctx.bus.is_updating(id),
            None => false,
        };
        Some(ToggleButton {
            label: label.clone(),
            action,
            enabled,
            marker: self.marker.clone(),
        })
    }

    /// Fills in a missing thread id from the rendered tree.
    ///
    /// Once an id is known no lookup happens anymore.
    pub fn recover_id(&self, locator: &dyn ThreadLocator) -> Option<ThreadId> {
        if let Some(id) = self.thread_id() {
            return Some(id);
        }
        if !self.live.get() {
            return None;
        }
        let raw = locator.closest_attribute(&self.marker, THREAD_ID_ATTRIBUTE)?;
        let id = match raw.parse::<ThreadId>() {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(?err, marker = %self.marker, "rendered thread id is invalid");
                return None;
            }
        };
        {
            let mut s = self.state.borrow_mut();
            s.thread.id = Some(id);
            s.thread.resolved_at = None;
        }
        self.subscribe(id);
        tracing::debug!(?id, marker = %self.marker, "recovered comment thread id from render tree");
        Some(id)
    }

    /// Applies a status change another actor already got confirmed
    pub fn on_external_status_event(&self, thread: ThreadId, status: CommentState) {
        apply_confirmed(
            &Rc::downgrade(&self.state),
            &self.live,
            thread,
            status,
            Utc::now(),
        );
    }

    /// Asks the server to flip the thread status.
    ///
    /// Preconditions are checked right away, so a second call while the first
    /// one is pending gets `Busy` even before either future is polled. The
    /// returned future does not borrow the controller, which can be unmounted
    /// in the meantime.
    pub fn toggle(&self) -> impl Future<Output = ToggleOutcome> + 'static {
        if self.thread_id().is_none() {
            if let Some(locator) = self.ctx.locator.clone() {
                self.recover_id(&*locator);
            }
        }
        let start = self.start_update();
        let pr = self.pr.clone();
        let api = self.ctx.api.clone();
        let bus = self.ctx.bus.clone();
        let notifier = self.ctx.notifier.clone();
        let labels = self.ctx.labels.clone();
        let state = self.state.clone();
        let live = self.live.clone();
        let origin = self.subscription.borrow().as_ref().map(|s| s.id());
        async move {
            let (id, target, guard) = match start {
                Ok(start) => start,
                Err(outcome) => return outcome,
            };
            let res = api.update_status(&pr, id, target).await;
            drop(guard);
            match res {
                Ok(()) => {
                    let at = Utc::now();
                    bus.publish(
                        StatusEvent {
                            thread: id,
                            status: target,
                            at,
                        },
                        origin,
                    );
                    if !live.get() {
                        tracing::debug!(?id, %target, "status updated after unmount, not applying");
                        return ToggleOutcome::Discarded(target);
                    }
                    state.borrow_mut().thread.set_status(target, at);
                    tracing::debug!(?id, %target, "comment thread status updated");
                    ToggleOutcome::Applied(target)
                }
                Err(err) => {
                    tracing::warn!(?err, ?id, %target, "failed updating comment thread status");
                    let message = err.message();
                    notifier.show_error(&message, &labels.failed_to_update);
                    ToggleOutcome::Failed(message)
                }
            }
        }
    }

    fn start_update(&self) -> Result<(ThreadId, CommentState, UpdateGuard), ToggleOutcome> {
        if !self.live.get() {
            return Err(ToggleOutcome::Unavailable(Unavailable::Unmounted));
        }
        let s = self.state.borrow();
        if s.thread.is_deleted() {
            return Err(ToggleOutcome::Unavailable(Unavailable::Deleted));
        }
        let id = s
            .thread
            .id
            .ok_or(ToggleOutcome::Unavailable(Unavailable::MissingId))?;
        match self.ctx.bus.begin_update(id) {
            Some(guard) => Ok((id, s.thread.status().toggled(), guard)),
            None => {
                tracing::debug!(?id, "rejecting toggle while another update is in flight");
                Err(ToggleOutcome::Busy)
            }
        }
    }

    /// Stops all state updates, including those of requests still in flight
    pub fn unmount(&self) {
        if self.live.replace(false) {
            self.subscription.borrow_mut().take();
            tracing::trace!(marker = %self.marker, "unmounted comment status controller");
        }
    }
}

impl Drop for StatusController {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn apply_confirmed(
    state: &Weak<RefCell<State>>,
    live: &Cell<bool>,
    thread: ThreadId,
    status: CommentState,
    at: Time,
) {
    if !live.get() {
        return;
    }
    let state = match state.upgrade() {
        Some(state) => state,
        None => return,
    };
    let mut s = state.borrow_mut();
    if s.thread.id != Some(thread) || s.thread.is_deleted() {
        return;
    }
    s.thread.set_status(status, at);
}
