mod bus;
pub use bus::{StatusBus, StatusEvent, Subscription, UpdateGuard};

mod config;
pub use config::{ClientConfig, Labels};

mod controller;
pub use controller::{
    ControllerContext, StatusController, ToggleAction, ToggleButton, ToggleOutcome, Unavailable,
};

mod error;
pub use error::ClientError;

mod http;
pub use http::HttpStatusApi;

mod locator;
pub use locator::{NodeId, RenderTree, ThreadLocator, THREAD_ID_ATTRIBUTE};

mod notify;
pub use notify::{Notification, Notifier, Toaster, TracingNotifier};

mod store;
pub use store::StatusApi;

pub mod api {
    pub use comment_status_api::*;
}
