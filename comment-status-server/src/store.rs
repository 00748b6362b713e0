use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use comment_status_api::{CommentState, CommentThread, Error, PullReqRef, ThreadId};
use tokio::sync::RwLock;

/// Comment threads of all pull requests. Nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct ThreadStore(Arc<RwLock<Threads>>);

#[derive(Debug, Default)]
struct Threads {
    by_pr: HashMap<(PullReqRef, ThreadId), CommentThread>,
    last_id: i64,
}

impl ThreadStore {
    pub fn new() -> ThreadStore {
        ThreadStore::default()
    }

    pub async fn create(&self, pr: &PullReqRef) -> CommentThread {
        let mut threads = self.0.write().await;
        threads.last_id += 1;
        let id = ThreadId(threads.last_id);
        let thread = CommentThread::new(id);
        threads.by_pr.insert((pr.clone(), id), thread.clone());
        tracing::debug!(?pr, ?id, "created comment thread");
        thread
    }

    pub async fn find(&self, pr: &PullReqRef, id: ThreadId) -> Result<CommentThread, Error> {
        self.0
            .read()
            .await
            .by_pr
            .get(&(pr.clone(), id))
            .cloned()
            .ok_or(Error::ThreadNotFound(id))
    }

    /// Records `status`, keeping the original resolution date when resolving
    /// an already resolved thread
    pub async fn set_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<CommentThread, Error> {
        let mut threads = self.0.write().await;
        let thread = threads
            .by_pr
            .get_mut(&(pr.clone(), id))
            .ok_or(Error::ThreadNotFound(id))?;
        if thread.is_deleted() {
            return Err(Error::ThreadDeleted(id));
        }
        if thread.status() != status {
            thread.set_status(status, Utc::now());
        }
        Ok(thread.clone())
    }

    pub async fn delete(&self, pr: &PullReqRef, id: ThreadId) -> Result<CommentThread, Error> {
        let mut threads = self.0.write().await;
        let thread = threads
            .by_pr
            .get_mut(&(pr.clone(), id))
            .ok_or(Error::ThreadNotFound(id))?;
        thread.deleted.get_or_insert_with(Utc::now);
        Ok(thread.clone())
    }

    pub async fn len(&self) -> usize {
        self.0.read().await.by_pr.len()
    }
}
