use std::{
    cell::RefCell,
    collections::{btree_map, BTreeMap, VecDeque},
};

use async_trait::async_trait;
use chrono::Utc;
use comment_status_client::{
    api::{CommentState, CommentThread, Error, PullReqRef, ThreadId},
    ClientError, StatusApi,
};
use futures::channel::oneshot;

/// In-memory stand-in for the comment endpoints, with knobs to make calls fail
/// or hang
pub struct MockServer {
    threads: RefCell<BTreeMap<(PullReqRef, ThreadId), CommentThread>>,
    next_id: RefCell<i64>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<VecDeque<Error>>,
    gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub pr: PullReqRef,
    pub id: ThreadId,
    pub status: CommentState,
}

/// Holds the next update until released
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn release(self) {
        // the call may have been dropped already, which is fine
        let _ = self.0.send(());
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            threads: RefCell::new(BTreeMap::new()),
            next_id: RefCell::new(1),
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(VecDeque::new()),
            gates: RefCell::new(VecDeque::new()),
        }
    }

    pub fn create_thread(&self, pr: &PullReqRef) -> Result<CommentThread, Error> {
        pr.validate()?;
        let id = {
            let mut next = self.next_id.borrow_mut();
            let id = ThreadId(*next);
            *next += 1;
            id
        };
        let thread = CommentThread::new(id);
        self.threads
            .borrow_mut()
            .insert((pr.clone(), id), thread.clone());
        Ok(thread)
    }

    pub fn find_thread(&self, pr: &PullReqRef, id: ThreadId) -> Result<CommentThread, Error> {
        pr.validate()?;
        self.threads
            .borrow()
            .get(&(pr.clone(), id))
            .cloned()
            .ok_or(Error::ThreadNotFound(id))
    }

    pub fn delete_thread(&self, pr: &PullReqRef, id: ThreadId) -> Result<CommentThread, Error> {
        pr.validate()?;
        match self.threads.borrow_mut().get_mut(&(pr.clone(), id)) {
            None => Err(Error::ThreadNotFound(id)),
            Some(t) => {
                t.deleted.get_or_insert_with(Utc::now);
                Ok(t.clone())
            }
        }
    }

    pub fn set_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<CommentThread, Error> {
        pr.validate()?;
        match self.threads.borrow_mut().entry((pr.clone(), id)) {
            btree_map::Entry::Vacant(_) => Err(Error::ThreadNotFound(id)),
            btree_map::Entry::Occupied(mut t) => {
                let t = t.get_mut();
                if t.is_deleted() {
                    return Err(Error::ThreadDeleted(id));
                }
                if t.status() != status {
                    t.set_status(status, Utc::now());
                }
                Ok(t.clone())
            }
        }
    }

    /// Makes the next update fail with `err`, without touching any thread
    pub fn fail_next(&self, err: Error) {
        self.failures.borrow_mut().push_back(err);
    }

    /// Makes the next update wait until the returned gate is released
    pub fn hold(&self) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.gates.borrow_mut().push_back(receiver);
        Gate(sender)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Return the current number of threads, deleted ones included
    pub fn test_num_threads(&self) -> usize {
        self.threads.borrow().len()
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait(?Send)]
impl StatusApi for MockServer {
    async fn update_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(Call {
            pr: pr.clone(),
            id,
            status,
        });
        let gate = self.gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            tracing::trace!(?id, "holding status update");
            let _ = gate.await;
        }
        let failure = self.failures.borrow_mut().pop_front();
        if let Some(err) = failure {
            return Err(ClientError::Api(err));
        }
        self.set_status(pr, id, status)?;
        Ok(())
    }
}
