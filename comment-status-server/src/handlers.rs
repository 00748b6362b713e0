use axum::{extract::State, Json};
use comment_status_api::{
    CommentThread, CommentsPath, Error as ApiError, NewThread, StatusUpdate,
};

use crate::{extractors::*, Error, ThreadStore};

fn wrong_endpoint(path: &CommentsPath) -> Error {
    let pr = path.pull_req();
    Error::Api(ApiError::InvalidPath(pr.comments_path()))
}

pub async fn create_thread(
    Route(path): Route,
    State(store): State<ThreadStore>,
    Json(_data): Json<NewThread>,
) -> Result<Json<CommentThread>, Error> {
    match path {
        CommentsPath::Collection(pr) => Ok(Json(store.create(&pr).await)),
        path => Err(wrong_endpoint(&path)),
    }
}

pub async fn find_thread(
    Route(path): Route,
    State(store): State<ThreadStore>,
) -> Result<Json<CommentThread>, Error> {
    match path {
        CommentsPath::Thread(pr, id) => Ok(Json(store.find(&pr, id).await?)),
        path => Err(wrong_endpoint(&path)),
    }
}

pub async fn update_status(
    Route(path): Route,
    State(store): State<ThreadStore>,
    Json(data): Json<StatusUpdate>,
) -> Result<Json<CommentThread>, Error> {
    match path {
        CommentsPath::Status(pr, id) => {
            let thread = store.set_status(&pr, id, data.status).await?;
            tracing::info!(?pr, ?id, status = %data.status, "comment thread status updated");
            Ok(Json(thread))
        }
        path => Err(wrong_endpoint(&path)),
    }
}

pub async fn delete_thread(
    Route(path): Route,
    State(store): State<ThreadStore>,
) -> Result<Json<CommentThread>, Error> {
    match path {
        CommentsPath::Thread(pr, id) => {
            let thread = store.delete(&pr, id).await?;
            tracing::info!(?pr, ?id, "comment thread deleted");
            Ok(Json(thread))
        }
        path => Err(wrong_endpoint(&path)),
    }
}
