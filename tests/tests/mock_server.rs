use std::rc::Rc;

use comment_status_api::{CommentState, Error, PullReqRef, ThreadId};
use comment_status_client::{
    ControllerContext, StatusController, Toaster, ToggleOutcome, Unavailable,
};
use comment_status_mock_server::{Call, MockServer};
use futures::{executor::block_on, pin_mut, poll, task::Poll};
use tests::context;

fn pr() -> PullReqRef {
    PullReqRef::new("space/repo", 12)
}

struct Setup {
    server: Rc<MockServer>,
    toaster: Rc<Toaster>,
    ctx: ControllerContext,
    id: ThreadId,
}

fn setup() -> Setup {
    tests::init_tracing();
    let server = Rc::new(MockServer::new());
    let toaster = Rc::new(Toaster::new());
    let ctx = context(server.clone(), toaster.clone());
    let id = server.create_thread(&pr()).unwrap().id.unwrap();
    Setup {
        server,
        toaster,
        ctx,
        id,
    }
}

impl Setup {
    fn mount(&self) -> StatusController {
        let thread = self.server.find_thread(&pr(), self.id).unwrap();
        StatusController::mount(pr(), thread, self.ctx.clone())
    }
}

#[test]
fn second_surface_waits_for_the_first() {
    let s = setup();
    let inline = s.mount();
    let overview = s.mount();
    let gate = s.server.hold();

    block_on(async {
        let first = inline.toggle();
        pin_mut!(first);
        assert_eq!(poll!(first.as_mut()), Poll::Pending);
        assert!(overview.is_in_flight());
        assert!(!overview.button().unwrap().enabled);

        assert_eq!(overview.toggle().await, ToggleOutcome::Busy);

        gate.release();
        assert_eq!(first.await, ToggleOutcome::Applied(CommentState::Resolved));
    });

    assert!(inline.is_resolved());
    assert!(overview.is_resolved());
    assert!(overview.button().unwrap().enabled);
    assert_eq!(s.server.calls().len(), 1);
}

#[test]
fn failure_is_reported_and_retry_works() {
    let s = setup();
    let ctl = s.mount();
    let peer = s.mount();

    s.server.fail_next(Error::Unknown(String::from("database is on fire")));
    assert_eq!(
        block_on(ctl.toggle()),
        ToggleOutcome::Failed(String::from("Unknown error: database is on fire"))
    );
    assert!(!ctl.is_resolved());
    assert!(!peer.is_resolved());
    assert_eq!(s.toaster.len(), 1);

    assert_eq!(
        block_on(ctl.toggle()),
        ToggleOutcome::Applied(CommentState::Resolved)
    );
    assert!(peer.is_resolved());
    assert_eq!(
        s.server.calls(),
        vec![
            Call {
                pr: pr(),
                id: s.id,
                status: CommentState::Resolved
            };
            2
        ]
    );
    assert_eq!(s.toaster.len(), 1);
}

#[test]
fn unmounting_mid_flight_still_informs_peers() {
    let s = setup();
    let ctl = s.mount();
    let peer = s.mount();
    let gate = s.server.hold();

    let pending = ctl.toggle();
    drop(ctl);
    gate.release();
    assert_eq!(
        block_on(pending),
        ToggleOutcome::Discarded(CommentState::Resolved)
    );

    assert!(peer.is_resolved());
    assert!(s.server.find_thread(&pr(), s.id).unwrap().is_resolved());
    assert!(s.toaster.is_empty());
}

#[test]
fn thread_deleted_elsewhere() {
    let s = setup();
    let ctl = s.mount();
    s.server.delete_thread(&pr(), s.id).unwrap();

    assert_eq!(
        block_on(ctl.toggle()),
        ToggleOutcome::Failed(Error::ThreadDeleted(s.id).to_string())
    );
    assert!(!ctl.is_resolved());

    // a surface mounted from the fresh server state has no toggle at all
    let fresh = s.mount();
    assert_eq!(fresh.button(), None);
    assert_eq!(
        block_on(fresh.toggle()),
        ToggleOutcome::Unavailable(Unavailable::Deleted)
    );
    assert_eq!(s.server.calls().len(), 1);
}

#[test]
fn other_threads_are_left_alone() {
    let s = setup();
    let other_id = s.server.create_thread(&pr()).unwrap().id.unwrap();
    let other = StatusController::mount(
        pr(),
        s.server.find_thread(&pr(), other_id).unwrap(),
        s.ctx.clone(),
    );
    let ctl = s.mount();

    block_on(ctl.toggle());
    assert!(ctl.is_resolved());
    assert!(!other.is_resolved());
    assert!(!s.server.find_thread(&pr(), other_id).unwrap().is_resolved());
}

#[test]
fn surfaces_converge_with_server() {
    bolero::check!()
        .with_type::<Vec<(u8, bool)>>()
        .cloned()
        .for_each(|ops| {
            let s = setup();
            let surfaces = [s.mount(), s.mount(), s.mount()];
            for (who, fail) in ops {
                let ctl = &surfaces[usize::from(who) % surfaces.len()];
                if fail {
                    s.server.fail_next(Error::Unknown(String::from("flaky")));
                }
                block_on(ctl.toggle());
                let expected = s.server.find_thread(&pr(), s.id).unwrap().status();
                for c in surfaces.iter() {
                    assert_eq!(c.thread().status(), expected);
                    assert_eq!(c.is_resolved(), c.thread().resolved_at.is_some());
                }
            }
        })
}
