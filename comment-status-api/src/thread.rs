use std::{fmt, str::FromStr};

use crate::{Error, Time};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct ThreadId(pub i64);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ThreadId {
    type Err = Error;

    fn from_str(s: &str) -> Result<ThreadId, Error> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(ThreadId(id)),
            _ => Err(Error::InvalidThreadId(String::from(s))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentState {
    Active,
    Resolved,
}

impl CommentState {
    pub fn toggled(self) -> CommentState {
        match self {
            CommentState::Active => CommentState::Resolved,
            CommentState::Resolved => CommentState::Active,
        }
    }

    pub fn is_resolved(self) -> bool {
        self == CommentState::Resolved
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommentState::Active => "active",
            CommentState::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CommentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The review status of a comment thread.
///
/// The status is never stored on its own: a thread is resolved exactly when it
/// carries a resolution date.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentThread {
    /// Server-assigned, `None` until the creation round-tripped
    pub id: Option<ThreadId>,

    pub resolved_at: Option<Time>,

    /// Once set, the status of this thread can no longer change
    pub deleted: Option<Time>,
}

impl CommentThread {
    pub fn new(id: ThreadId) -> CommentThread {
        CommentThread {
            id: Some(id),
            resolved_at: None,
            deleted: None,
        }
    }

    /// A thread that was just created locally and whose id is not known yet
    pub fn pending() -> CommentThread {
        CommentThread {
            id: None,
            resolved_at: None,
            deleted: None,
        }
    }

    pub fn status(&self) -> CommentState {
        match self.resolved_at {
            Some(_) => CommentState::Resolved,
            None => CommentState::Active,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    pub fn set_status(&mut self, status: CommentState, at: Time) {
        self.resolved_at = match status {
            CommentState::Active => None,
            CommentState::Resolved => Some(at),
        };
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StatusUpdate {
    pub status: CommentState,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewThread {}
