use std::{net::TcpListener, rc::Rc};

use comment_status_client::{
    ControllerContext, Labels, Notifier, StatusApi, StatusBus, Toaster,
};
use comment_status_server::AppState;

pub fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt::try_init();
    }
}

/// Starts a server on an ephemeral port of the current tokio runtime,
/// returning its base url along with its state
pub fn spawn_server() -> (String, AppState) {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").expect("binding ephemeral port");
    let addr = listener.local_addr().expect("reading bound address");
    let state = AppState::new();
    let served = state.clone();
    tokio::spawn(async move {
        if let Err(err) = comment_status_server::serve(listener, served).await {
            panic!("test server stopped: {err:?}");
        }
    });
    (format!("http://{addr}"), state)
}

/// A port nothing listens on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("binding ephemeral port");
    let addr = listener.local_addr().expect("reading bound address");
    drop(listener);
    format!("http://{addr}")
}

pub fn context(api: Rc<dyn StatusApi>, toaster: Rc<Toaster>) -> ControllerContext {
    let notifier: Rc<dyn Notifier> = toaster;
    ControllerContext {
        api,
        bus: StatusBus::new(),
        notifier,
        labels: Rc::new(Labels::default()),
        locator: None,
    }
}
