use async_trait::async_trait;

use crate::{
    api::{CommentState, CommentThread, Error, NewThread, PullReqRef, StatusUpdate, ThreadId},
    ClientConfig, ClientError, StatusApi,
};

lazy_static::lazy_static! {
    static ref CLIENT: reqwest::Client = reqwest::Client::new();
}

/// The comment endpoints of a remote server
#[derive(Clone, Debug)]
pub struct HttpStatusApi {
    host: String,
    client: reqwest::Client,
}

impl HttpStatusApi {
    pub fn new(config: &ClientConfig) -> HttpStatusApi {
        HttpStatusApi {
            host: config.host.clone(),
            client: CLIENT.clone(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    pub async fn find_thread(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
    ) -> Result<CommentThread, ClientError> {
        pr.validate()?;
        let resp = self.client.get(self.url(&pr.thread_path(id))).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn create_thread(&self, pr: &PullReqRef) -> Result<CommentThread, ClientError> {
        pr.validate()?;
        let resp = self
            .client
            .post(self.url(&pr.comments_path()))
            .json(&NewThread::default())
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn delete_thread(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
    ) -> Result<CommentThread, ClientError> {
        pr.validate()?;
        let resp = self
            .client
            .delete(self.url(&pr.thread_path(id)))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Same as `update_status`, but also returns the thread as now recorded
    pub async fn set_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<CommentThread, ClientError> {
        Ok(self.put_status(pr, id, status).await?.json().await?)
    }

    async fn put_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<reqwest::Response, ClientError> {
        pr.validate()?;
        tracing::debug!(?pr, ?id, %status, "updating comment thread status");
        let resp = self
            .client
            .put(self.url(&pr.status_path(id)))
            .json(&StatusUpdate { status })
            .send()
            .await?;
        check(resp).await
    }
}

#[async_trait(?Send)]
impl StatusApi for HttpStatusApi {
    async fn update_status(
        &self,
        pr: &PullReqRef,
        id: ThreadId,
        status: CommentState,
    ) -> Result<(), ClientError> {
        self.put_status(pr, id, status).await.map(|_| ())
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await?;
    match Error::parse(&body) {
        Ok(err) => Err(ClientError::Api(err)),
        Err(err) => {
            tracing::warn!(?err, %status, "failed parsing error response");
            Err(ClientError::UnexpectedStatus(status))
        }
    }
}
