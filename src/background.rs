//! Scoped-acquisition adapter: start a service concurrently, get a handle
//! back immediately, and guarantee cancellation + join on scope exit.

use tokio::task::JoinHandle;

use crate::error::{BoxError, SupervisionError};
use crate::manager::Manager;
use crate::service::Service;

/// Starts `service` in the background and returns once it has reached
/// `started`. The returned guard's [`shutdown`](BackgroundScope::shutdown)
/// is the scope's explicit exit: it cancels, awaits `finished`, and
/// re-raises any aggregated failure, which is the async-RAII shape of the
/// scoped-acquisition pattern from the design (true blocking cleanup on
/// `Drop` isn't expressible in async Rust, so `Drop` here is a best-effort
/// fallback that only requests cancellation - call `shutdown` to observe
/// the result).
pub async fn background_service(service: impl Service + 'static) -> BackgroundScope {
    let manager = Manager::new(service);
    let run_manager = manager.clone();
    let join = tokio::spawn(async move { run_manager.run().await });
    manager.wait_started().await;
    BackgroundScope {
        manager,
        join: Some(join),
    }
}

/// Guard returned by [`background_service`]. Leaving the scope - via
/// [`shutdown`](Self::shutdown) or, best-effort, via `Drop` - guarantees
/// `finished` becomes true.
#[must_use = "call `.shutdown().await` to cancel the background service and observe its result"]
pub struct BackgroundScope {
    manager: Manager,
    join: Option<JoinHandle<Result<(), SupervisionError>>>,
}

impl BackgroundScope {
    /// The manager for the backgrounded service.
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Cancels, awaits `finished`, and re-raises the aggregated failure.
    pub async fn shutdown(mut self) -> Result<(), SupervisionError> {
        self.manager.cancel();
        self.manager.wait_finished().await;
        let join = self.join.take().expect("shutdown called once");
        match join.await {
            Ok(result) => result,
            Err(join_err) => Err(SupervisionError::User(Box::new(join_err) as BoxError)),
        }
    }
}

impl Drop for BackgroundScope {
    fn drop(&mut self) {
        self.manager.cancel();
    }
}

#[cfg(test)]
#[path = "background_tests.rs"]
mod tests;
