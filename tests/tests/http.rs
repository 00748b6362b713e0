use std::{net::TcpListener, rc::Rc};

use comment_status_api::{CommentState, Error, PullReqRef, ThreadId};
use comment_status_client::{
    ClientConfig, ClientError, HttpStatusApi, StatusController, Toaster, ToggleOutcome,
};
use axum::http::StatusCode;
use tests::{closed_port_url, context, spawn_server};

fn pr() -> PullReqRef {
    PullReqRef::new("space/repo", 42)
}

/// A server answering every request with a plain text 503
fn spawn_maintenance_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("binding ephemeral port");
    let addr = listener.local_addr().expect("reading bound address");
    let app = axum::Router::new().fallback(|| async {
        (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance")
    });
    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .expect("using tcp listener")
            .serve(app.into_make_service())
            .await
            .expect("serving maintenance page")
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn toggle_reaches_server_and_peers() {
    let (host, state) = spawn_server();
    let api = Rc::new(HttpStatusApi::new(&ClientConfig::new(host).unwrap()));
    let toaster = Rc::new(Toaster::new());
    let ctx = context(api.clone(), toaster.clone());

    let thread = api.create_thread(&pr()).await.unwrap();
    let id = thread.id.unwrap();
    let inline = StatusController::mount(pr(), thread.clone(), ctx.clone());
    let overview = StatusController::mount(pr(), thread, ctx.clone());

    assert_eq!(
        inline.toggle().await,
        ToggleOutcome::Applied(CommentState::Resolved)
    );
    assert!(inline.is_resolved());
    assert!(overview.is_resolved());
    assert!(state.store.find(&pr(), id).await.unwrap().is_resolved());

    assert_eq!(
        overview.toggle().await,
        ToggleOutcome::Applied(CommentState::Active)
    );
    assert!(!inline.is_resolved());
    assert_eq!(api.find_thread(&pr(), id).await.unwrap().resolved_at, None);
    assert!(toaster.is_empty());
}

#[tokio::test]
async fn deleted_on_server_fails_with_notification() {
    let (host, _state) = spawn_server();
    let api = Rc::new(HttpStatusApi::new(&ClientConfig::new(host).unwrap()));
    let toaster = Rc::new(Toaster::new());
    let ctx = context(api.clone(), toaster.clone());

    let thread = api.create_thread(&pr()).await.unwrap();
    let id = thread.id.unwrap();
    let ctl = StatusController::mount(pr(), thread.clone(), ctx);
    api.delete_thread(&pr(), id).await.unwrap();

    let outcome = ctl.toggle().await;
    assert_eq!(
        outcome,
        ToggleOutcome::Failed(Error::ThreadDeleted(id).to_string())
    );
    assert_eq!(ctl.thread(), thread);
    let toasts = toaster.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, format!("Comment thread {id} was deleted"));
}

#[tokio::test]
async fn unknown_thread_is_a_typed_error() {
    let (host, _state) = spawn_server();
    let api = HttpStatusApi::new(&ClientConfig::new(host).unwrap());
    let res = api
        .set_status(&pr(), ThreadId(1234), CommentState::Resolved)
        .await;
    assert!(matches!(
        res,
        Err(ClientError::Api(Error::ThreadNotFound(ThreadId(1234))))
    ));
}

#[tokio::test]
async fn invalid_pull_request_never_hits_the_network() {
    let api = Rc::new(HttpStatusApi::new(
        &ClientConfig::new(closed_port_url()).unwrap(),
    ));
    let toaster = Rc::new(Toaster::new());
    let bad = PullReqRef::new("space/repo", 0);
    let ctl = StatusController::mount(
        bad,
        comment_status_api::CommentThread::new(ThreadId(1)),
        context(api, toaster.clone()),
    );
    assert_eq!(
        ctl.toggle().await,
        ToggleOutcome::Failed(Error::InvalidPullReqNumber(0).to_string())
    );
    assert_eq!(toaster.len(), 1);
}

#[tokio::test]
async fn unreachable_server_is_reported() {
    let api = Rc::new(HttpStatusApi::new(
        &ClientConfig::new(closed_port_url()).unwrap(),
    ));
    let toaster = Rc::new(Toaster::new());
    let ctl = StatusController::mount(
        pr(),
        comment_status_api::CommentThread::new(ThreadId(1)),
        context(api, toaster.clone()),
    );
    assert_eq!(
        ctl.toggle().await,
        ToggleOutcome::Failed(String::from("Could not connect to the server"))
    );
    assert!(!ctl.is_resolved());
    assert!(!ctl.is_in_flight());
    let toasts = toaster.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Failed to update comment status");
    assert_eq!(toasts[0].message, "Could not connect to the server");

    // retrying is allowed, and fails the same way
    assert!(matches!(ctl.toggle().await, ToggleOutcome::Failed(_)));
    assert_eq!(toaster.len(), 1);
}

#[tokio::test]
async fn non_api_error_body_falls_back_to_status() {
    let api = Rc::new(HttpStatusApi::new(
        &ClientConfig::new(spawn_maintenance_server()).unwrap(),
    ));
    let res = api
        .set_status(&pr(), ThreadId(1), CommentState::Resolved)
        .await;
    assert!(matches!(
        res,
        Err(ClientError::UnexpectedStatus(s)) if s == StatusCode::SERVICE_UNAVAILABLE
    ));

    let toaster = Rc::new(Toaster::new());
    let ctl = StatusController::mount(
        pr(),
        comment_status_api::CommentThread::new(ThreadId(1)),
        context(api, toaster.clone()),
    );
    assert_eq!(
        ctl.toggle().await,
        ToggleOutcome::Failed(String::from(
            "Server answered with unexpected status 503 Service Unavailable"
        ))
    );
    assert!(!ctl.is_resolved());
    assert_eq!(toaster.len(), 1);
}

#[tokio::test]
async fn rejected_request_without_api_error() {
    // the router itself refuses this, before any handler produces an api error
    let (host, _state) = spawn_server();
    let api = HttpStatusApi::new(&ClientConfig::new(format!("{host}/not-mounted")).unwrap());
    let res = api.find_thread(&pr(), ThreadId(1)).await;
    assert!(matches!(
        res,
        Err(ClientError::UnexpectedStatus(s)) if s == StatusCode::NOT_FOUND
    ));
}
