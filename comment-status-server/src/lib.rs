use std::net::TcpListener;

use anyhow::Context;
use axum::{routing::get, Router};

mod error;
mod extractors;
mod handlers;
mod store;

pub use error::Error;
pub use extractors::AppState;
pub use store::ThreadStore;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/repos/*rest",
            get(handlers::find_thread)
                .post(handlers::create_thread)
                .put(handlers::update_status)
                .delete(handlers::delete_thread),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `state` on an already bound listener, until the future is dropped
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("reading listener address")?;
    tracing::info!("listening on {}", addr);
    axum::Server::from_tcp(listener)
        .context("using tcp listener")?
        .serve(app(state).into_make_service())
        .await
        .context("serving axum webserver")
}
