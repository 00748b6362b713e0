use std::{cell::RefCell, collections::VecDeque};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

pub trait Notifier {
    fn show_error(&self, message: &str, title: &str);
}

/// Keeps notifications around until the UI drains them
#[derive(Debug, Default)]
pub struct Toaster(RefCell<VecDeque<Notification>>);

impl Toaster {
    pub fn new() -> Toaster {
        Toaster::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl Notifier for Toaster {
    fn show_error(&self, message: &str, title: &str) {
        self.0.borrow_mut().push_back(Notification {
            title: String::from(title),
            message: String::from(message),
        });
    }
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str, title: &str) {
        tracing::warn!(%title, %message, "user-facing error");
    }
}
