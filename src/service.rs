//! The `Service` contract and the `as_service` adapter for plain async
//! callables.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::manager::Manager;

/// A user-defined async unit of work with a single entry operation.
///
/// A service instance is single-use: a given instance may be supervised at
/// most once (enforced by [`Manager::run`] returning
/// [`SupervisionError::AlreadyStarted`](crate::error::SupervisionError::AlreadyStarted)
/// on a second call).
#[async_trait]
pub trait Service: Send {
    /// Runs the service body. `handle` is this supervision's [`Manager`],
    /// threaded in as an argument rather than stashed on the service object -
    /// the Rust-native equivalent of the back-reference the source design
    /// sets on the service instance, without needing a cycle that must be
    /// broken at `finished`.
    async fn run(&mut self, handle: Manager) -> Result<(), BoxError>;
}

/// Adapts a plain async closure into a [`Service`].
///
/// ```no_run
/// use svc_supervisor::{as_service, Manager};
///
/// let service = as_service(|handle: Manager| async move {
///     handle.wait_stopping().await;
///     Ok(())
/// });
/// ```
pub fn as_service<F, Fut>(body: F) -> FnService<F>
where
    F: FnMut(Manager) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(), BoxError>> + Send + 'static,
{
    FnService { body }
}

/// [`Service`] implementation produced by [`as_service`].
pub struct FnService<F> {
    body: F,
}

#[async_trait]
impl<F, Fut> Service for FnService<F>
where
    F: FnMut(Manager) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn run(&mut self, handle: Manager) -> Result<(), BoxError> {
        (self.body)(handle).await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
