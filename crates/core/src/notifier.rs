//! User-facing notification capability.

use tracing::{error, info};

/// Fire-and-forget user notifications
pub trait Notifier: Send + Sync {
    fn show_success(&self, message: &str);
    fn show_info(&self, message: &str);
    fn show_error(&self, message: &str);
}

/// Notifier that writes to the tracing log, used when no UI is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_success(&self, message: &str) {
        info!(target: "dapp::notify", kind = "success", "{}", message);
    }

    fn show_info(&self, message: &str) {
        info!(target: "dapp::notify", kind = "info", "{}", message);
    }

    fn show_error(&self, message: &str) {
        error!(target: "dapp::notify", kind = "error", "{}", message);
    }
}
