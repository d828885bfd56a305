//! The public façade exposed to a service body, to spawned tasks, and to
//! external callers.

use std::future::Future;
use std::sync::Arc;

use crate::config::SupervisorConfig;
use crate::error::{BoxError, SupervisionError};
use crate::registry::TaskKind;
use crate::service::Service;
use crate::supervisor::Supervisor;

/// A value bound 1:1 to a service for the duration of one supervision.
///
/// Cloning a `Manager` clones the handle, not the supervision: every clone
/// refers to the same underlying [`Supervisor`].
#[derive(Clone)]
pub struct Manager {
    pub(crate) inner: Arc<Supervisor>,
}

impl Manager {
    /// Binds a fresh manager to `service` with default tuning.
    pub fn new(service: impl Service + 'static) -> Self {
        Self::with_config(service, SupervisorConfig::default())
    }

    /// Binds a fresh manager with explicit [`SupervisorConfig`] tuning.
    pub fn with_config(service: impl Service + 'static, config: SupervisorConfig) -> Self {
        let inner = Supervisor::new(Box::new(service), config, None);
        Self { inner }
    }

    pub(crate) fn child(parent: &Arc<Supervisor>, service: impl Service + 'static) -> Self {
        let inner = Supervisor::new(
            Box::new(service),
            parent.config().clone(),
            Some(parent.root_token.clone()),
        );
        Self { inner }
    }

    /// Foreground supervision: returns after `finished`, raising the
    /// aggregated failure (if any).
    pub async fn run(&self) -> Result<(), SupervisionError> {
        self.inner.run(self.clone()).await
    }

    /// Convenience equivalent to `Manager::new(service).run().await`.
    pub async fn run_service(service: impl Service + 'static) -> Result<(), SupervisionError> {
        Manager::new(service).run().await
    }

    /// Synchronous: marks cancellation; does not wait.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// `cancel()` followed by awaiting `finished`.
    pub async fn stop(&self) {
        self.cancel();
        self.wait_finished().await;
    }

    /// Spawns a regular task. Its clean completion does not end the
    /// service; its failure does (initiates cancellation, propagates out
    /// of `run`).
    pub fn run_task<F, Fut>(&self, name: impl Into<Option<String>>, f: F)
    where
        F: FnOnce(Manager) -> Fut,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let name = name.into().unwrap_or_else(|| self.inner.config().default_task_name.clone());
        self.inner.spawn_guarded(TaskKind::Regular, name, f(self.clone()));
    }

    /// Spawns a daemon task. Its early exit - clean or failed, before
    /// `stopping` - is itself an error.
    pub fn run_daemon_task<F, Fut>(&self, name: impl Into<Option<String>>, f: F)
    where
        F: FnOnce(Manager) -> Fut,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let name = name.into().unwrap_or_else(|| self.inner.config().default_task_name.clone());
        self.inner.spawn_guarded(TaskKind::Daemon, name, f(self.clone()));
    }

    /// Spawns a nested service sharing this supervision's root scope.
    /// Synchronous; returns before the child is started - await
    /// `child_manager.wait_started()` to observe that.
    pub fn run_child_service(&self, name: impl Into<Option<String>>, child: impl Service + 'static) -> Manager {
        let child_manager = Manager::child(&self.inner, child);
        let name = name
            .into()
            .unwrap_or_else(|| self.inner.config().default_task_name.clone());
        let run_manager = child_manager.clone();
        self.inner.spawn_guarded(TaskKind::ChildService, name, async move {
            run_manager.run().await.map_err(|e| Box::new(e) as BoxError)
        });
        child_manager
    }

    pub fn is_started(&self) -> bool {
        self.inner.lifecycle.is_started()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lifecycle.is_running()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.lifecycle.is_cancelled()
    }

    pub fn is_stopping(&self) -> bool {
        self.inner.lifecycle.is_stopping()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lifecycle.is_finished()
    }

    pub fn did_error(&self) -> bool {
        self.inner.lifecycle.did_error()
    }

    pub async fn wait_started(&self) {
        self.inner.lifecycle.wait_started().await;
    }

    pub async fn wait_stopping(&self) {
        self.inner.lifecycle.wait_stopping().await;
    }

    pub async fn wait_finished(&self) {
        self.inner.lifecycle.wait_finished().await;
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
