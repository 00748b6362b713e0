use anyhow::{anyhow, Context};
use serde_json::json;

use crate::ThreadId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("A valid pull request number must be provided, got {0}")]
    InvalidPullReqNumber(i64),

    #[error("Invalid path {0:?}")]
    InvalidPath(String),

    #[error("Invalid comment thread id {0:?}")]
    InvalidThreadId(String),

    #[error("Comment thread {0} not found")]
    ThreadNotFound(ThreadId),

    #[error("Comment thread {0} was deleted")]
    ThreadDeleted(ThreadId),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidPullReqNumber(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::NOT_FOUND,
            Error::InvalidThreadId(_) => StatusCode::BAD_REQUEST,
            Error::ThreadNotFound(_) => StatusCode::NOT_FOUND,
            Error::ThreadDeleted(_) => StatusCode::CONFLICT,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::InvalidPullReqNumber(n) => json!({
                "message": "a valid pull request number must be provided",
                "type": "invalid-pullreq-number",
                "number": n,
            }),
            Error::InvalidPath(p) => json!({
                "message": "no such endpoint",
                "type": "invalid-path",
                "path": p,
            }),
            Error::InvalidThreadId(id) => json!({
                "message": "invalid comment thread id",
                "type": "invalid-thread-id",
                "id": id,
            }),
            Error::ThreadNotFound(id) => json!({
                "message": "comment thread not found",
                "type": "thread-not-found",
                "id": id,
            }),
            Error::ThreadDeleted(id) => json!({
                "message": "comment thread was deleted",
                "type": "thread-deleted",
                "id": id,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let str_field = |name: &str| -> anyhow::Result<String> {
            data.get(name)
                .and_then(|v| v.as_str())
                .map(String::from)
                .ok_or_else(|| anyhow!("error contents has no string field {name:?}"))
        };
        let id_field = || -> anyhow::Result<ThreadId> {
            data.get("id")
                .and_then(|v| v.as_i64())
                .map(ThreadId)
                .ok_or_else(|| anyhow!("error contents has no thread id"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(str_field("message").unwrap_or_default()),
                "invalid-pullreq-number" => Error::InvalidPullReqNumber(
                    data.get("number")
                        .and_then(|n| n.as_i64())
                        .ok_or_else(|| anyhow!("error is about a pull request without a number"))?,
                ),
                "invalid-path" => Error::InvalidPath(str_field("path")?),
                "invalid-thread-id" => Error::InvalidThreadId(str_field("id")?),
                "thread-not-found" => Error::ThreadNotFound(id_field()?),
                "thread-deleted" => Error::ThreadDeleted(id_field()?),
                "null-byte" => Error::NullByteInString(str_field("string")?),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
