use chrono::Utc;

mod error;
pub use error::Error;

mod path;
pub use path::{CommentsPath, PullReqRef};

mod thread;
pub use thread::{CommentState, CommentThread, NewThread, StatusUpdate, ThreadId};

pub type Time = chrono::DateTime<Utc>;

pub const API_PREFIX: &str = "/api/v1/repos/";

// Strings cross into urls and logs, a NUL byte in them is never legitimate
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(String::from(s))),
        false => Ok(()),
    }
}
