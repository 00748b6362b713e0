use crate::{validate_string, Error, ThreadId, API_PREFIX};

// Repository paths contain slashes themselves, so this separates them from the
// rest of the route
const REPO_SEPARATOR: &str = "/+/";

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct PullReqRef {
    pub repo_path: String,
    pub number: i64,
}

impl PullReqRef {
    pub fn new(repo_path: impl Into<String>, number: i64) -> PullReqRef {
        PullReqRef {
            repo_path: repo_path.into(),
            number,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_string(&self.repo_path)?;
        let repo = self.repo_path.trim_matches('/');
        if repo.is_empty()
            || repo == "+"
            || repo.contains(REPO_SEPARATOR)
            || repo.starts_with("+/")
            || repo.ends_with("/+")
        {
            return Err(Error::InvalidPath(self.repo_path.clone()));
        }
        if self.number <= 0 {
            return Err(Error::InvalidPullReqNumber(self.number));
        }
        Ok(())
    }

    pub fn comments_path(&self) -> String {
        format!(
            "{API_PREFIX}{}{REPO_SEPARATOR}pullreq/{}/comments",
            self.repo_path.trim_matches('/'),
            self.number
        )
    }

    pub fn thread_path(&self, id: ThreadId) -> String {
        format!("{}/{id}", self.comments_path())
    }

    pub fn status_path(&self, id: ThreadId) -> String {
        format!("{}/{id}/status", self.comments_path())
    }
}

/// The comment endpoints, as addressed by everything after the api prefix
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommentsPath {
    Collection(PullReqRef),
    Thread(PullReqRef, ThreadId),
    Status(PullReqRef, ThreadId),
}

impl CommentsPath {
    pub fn parse(rest: &str) -> Result<CommentsPath, Error> {
        let invalid = || Error::InvalidPath(String::from(rest));
        let rest = rest.trim_start_matches('/');
        let rest = rest.strip_prefix(API_PREFIX.trim_start_matches('/')).unwrap_or(rest);
        let (repo, route) = rest.split_once(REPO_SEPARATOR).ok_or_else(invalid)?;
        let mut route = route.trim_end_matches('/').split('/');
        if route.next() != Some("pullreq") {
            return Err(invalid());
        }
        let number = route
            .next()
            .and_then(|n| n.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        if route.next() != Some("comments") {
            return Err(invalid());
        }
        let pr = PullReqRef::new(repo, number);
        pr.validate()?;
        let res = match (route.next(), route.next()) {
            (None, _) => CommentsPath::Collection(pr),
            (Some(id), None) => CommentsPath::Thread(pr, id.parse()?),
            (Some(id), Some("status")) => CommentsPath::Status(pr, id.parse()?),
            (Some(_), Some(_)) => return Err(invalid()),
        };
        match route.next() {
            None => Ok(res),
            Some(_) => Err(invalid()),
        }
    }

    pub fn pull_req(&self) -> &PullReqRef {
        match self {
            CommentsPath::Collection(pr)
            | CommentsPath::Thread(pr, _)
            | CommentsPath::Status(pr, _) => pr,
        }
    }
}
