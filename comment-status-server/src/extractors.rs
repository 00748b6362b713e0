use axum::{async_trait, extract::FromRequestParts, http::request};
use comment_status_api::{CommentsPath, Error as ApiError, API_PREFIX};

use crate::{Error, ThreadStore};

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub store: ThreadStore,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            store: ThreadStore::new(),
        }
    }
}

/// The comment endpoint addressed by the request uri
///
/// Repository paths contain slashes, so this parses the whole uri rather than
/// relying on router captures.
pub struct Route(pub CommentsPath);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for Route {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<Route, Error> {
        let path = req.uri.path();
        if !path.starts_with(API_PREFIX) {
            return Err(ApiError::InvalidPath(String::from(path)).into());
        }
        // parse strips the prefix once, so repositories named like it still route
        Ok(Route(CommentsPath::parse(path)?))
    }
}
