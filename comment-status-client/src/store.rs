use async_trait::async_trait;

use crate::{
    api::{CommentState, PullReqRef, ThreadId},
    ClientError,
};

/// Where thread status changes get recorded
///
/// A successful return means the change is durable. The UI runs on a single
/// thread, hence the `?Send`.
#[async_trait(?Send)]
pub trait StatusApi {
    async fn update_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<(), ClientError>;
}
