//! The supervisor: owns the root cancellation scope and arbitrates every
//! lifecycle transition and failure-aggregation decision.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SupervisorConfig;
use crate::error::{BoxError, SupervisionError};
use crate::lifecycle::LifecycleState;
use crate::manager::Manager;
use crate::registry::{TaskId, TaskKind, TaskRegistry};
use crate::service::Service;

/// What a spawned task settled on.
enum Outcome {
    Success,
    Failed(BoxError),
    /// A bare cancellation signal - never recorded as a failure.
    Cancelled,
}

struct Completion {
    id: TaskId,
    kind: TaskKind,
    name: String,
    outcome: Outcome,
    /// For `Daemon` completions only: whether `stopping` was still false at
    /// the instant this task's own future resolved. Captured inside the
    /// spawned task itself rather than re-derived when the supervisor later
    /// dequeues the message - the two can disagree whenever a body/regular
    /// failure's completion message is enqueued first (same poll, no
    /// intervening yield) while a daemon woken moments earlier is only
    /// scheduled afterward: by dequeue time `stopping` already reads `true`,
    /// even though the daemon's own exit causally preceded it.
    daemon_early: bool,
}

/// Owns the [`LifecycleState`], the [`TaskRegistry`], and the cancellation
/// scope for one supervision (or one nested child supervision).
pub(crate) struct Supervisor {
    pub(crate) lifecycle: Arc<LifecycleState>,
    registry: Arc<TaskRegistry>,
    pub(crate) root_token: CancellationToken,
    daemon_token: CancellationToken,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: Mutex<Option<mpsc::UnboundedReceiver<Completion>>>,
    service: Mutex<Option<Box<dyn Service>>>,
    config: SupervisorConfig,
}

impl Supervisor {
    /// Builds a root supervisor, or a child sharing `parent_token` when
    /// `parent_token` is `Some` (see `run_child_service`).
    pub(crate) fn new(
        service: Box<dyn Service>,
        config: SupervisorConfig,
        parent_token: Option<CancellationToken>,
    ) -> Arc<Self> {
        let root_token = match parent_token {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let daemon_token = root_token.child_token();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Arc::new(Self {
            lifecycle: Arc::new(LifecycleState::new()),
            registry: Arc::new(TaskRegistry::new()),
            root_token,
            daemon_token,
            completions_tx,
            completions_rx: Mutex::new(Some(completions_rx)),
            service: Mutex::new(Some(service)),
            config,
        })
    }

    /// Synchronous: marks cancellation and requests the root scope to stop.
    /// Idempotent - a second call observes no additional state change.
    pub(crate) fn cancel(&self) {
        self.lifecycle.mark_cancelled();
        self.lifecycle.mark_stopping();
        self.root_token.cancel();
    }

    fn begin_graceful_shutdown(&self) {
        self.lifecycle.mark_stopping();
        self.daemon_token.cancel();
    }

    /// Drives the whole supervision to completion: schedules the body,
    /// fires `started`, waits out every task under the aggregation policy
    /// from the design, and fires `finished`.
    pub(crate) async fn run(self: &Arc<Self>, manager: Manager) -> Result<(), SupervisionError> {
        let mut service = match self.service.lock().expect("poisoned").take() {
            Some(service) => service,
            None => return Err(SupervisionError::AlreadyStarted),
        };

        let body_id = self
            .registry
            .register(TaskKind::Body, "body".to_string(), None);
        debug_assert_eq!(body_id, TaskRegistry::body_id());

        let body_token = self.root_token.clone();
        let body_manager = manager.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = body_token.cancelled() => Outcome::Cancelled,
                res = service.run(body_manager) => match res {
                    Ok(()) => Outcome::Success,
                    Err(e) => Outcome::Failed(e),
                },
            };
            let _ = tx.send(Completion {
                id: body_id,
                kind: TaskKind::Body,
                name: "body".to_string(),
                outcome,
                daemon_early: false,
            });
        });

        self.lifecycle.mark_started();
        debug!("supervision started");

        let mut completions = self
            .completions_rx
            .lock()
            .expect("poisoned")
            .take()
            .expect("Supervisor::run polled more than once");

        let mut failures: Vec<SupervisionError> = Vec::new();
        let mut body_done = false;

        while let Some(completion) = completions.recv().await {
            self.registry.complete(completion.id);

            match (completion.kind, completion.outcome) {
                (TaskKind::Body, Outcome::Success) => {
                    debug!("body returned cleanly, entering graceful shutdown");
                    body_done = true;
                    self.begin_graceful_shutdown();
                }
                (TaskKind::Body, Outcome::Failed(e)) => {
                    warn!("body failed, cancelling supervision");
                    body_done = true;
                    self.lifecycle.mark_errored();
                    failures.push(SupervisionError::User(e));
                    self.cancel();
                }
                (TaskKind::Body, Outcome::Cancelled) => {
                    body_done = true;
                }
                (TaskKind::Regular, Outcome::Failed(e))
                | (TaskKind::ChildService, Outcome::Failed(e)) => {
                    warn!(task = %completion.name, "task failed, cancelling supervision");
                    self.lifecycle.mark_errored();
                    failures.push(SupervisionError::User(e));
                    self.cancel();
                }
                (TaskKind::Regular, Outcome::Success | Outcome::Cancelled)
                | (TaskKind::ChildService, Outcome::Success | Outcome::Cancelled) => {}
                (TaskKind::Daemon, Outcome::Cancelled) => {}
                (TaskKind::Daemon, outcome) if completion.daemon_early => {
                    warn!(task = %completion.name, "daemon exited before shutdown began");
                    self.lifecycle.mark_errored();
                    if let Outcome::Failed(e) = outcome {
                        failures.push(SupervisionError::User(e));
                    }
                    failures.push(SupervisionError::DaemonExit {
                        name: completion.name.clone(),
                    });
                    self.cancel();
                }
                (TaskKind::Daemon, _) => {}
            }

            if body_done && self.registry.is_empty() {
                break;
            }
        }

        self.lifecycle.mark_finished();
        debug!(did_error = self.lifecycle.did_error(), "supervision finished");

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(SupervisionError::Composite(failures)),
        }
    }

    /// Spawns a future racing the root scope's cancellation, reporting its
    /// outcome back into the arbitration loop. Never suspends.
    pub(crate) fn spawn_guarded<Fut>(self: &Arc<Self>, kind: TaskKind, name: String, fut: Fut)
    where
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let token = match kind {
            TaskKind::Daemon => self.daemon_token.clone(),
            _ => self.root_token.clone(),
        };
        let id = self
            .registry
            .register(kind, name.clone(), Some(TaskRegistry::body_id()));
        let tx = self.completions_tx.clone();
        let lifecycle = self.lifecycle.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Outcome::Cancelled,
                res = fut => match res {
                    Ok(()) => Outcome::Success,
                    Err(e) => Outcome::Failed(e),
                },
            };
            // Read here, not later when the supervisor dequeues the
            // message: a racing failure elsewhere can flip `stopping` to
            // true before this completion is even processed, even though
            // this task's own exit happened first.
            let daemon_early = matches!(kind, TaskKind::Daemon)
                && !matches!(outcome, Outcome::Cancelled)
                && !lifecycle.is_stopping();
            let _ = tx.send(Completion {
                id,
                kind,
                name,
                outcome,
                daemon_early,
            });
        });
    }

    pub(crate) fn config(&self) -> &SupervisorConfig {
        &self.config
    }
}

impl Drop for Supervisor {
    /// If the future driving `run()` is dropped before `finished` fires
    /// (the caller racing it against an outer timeout, say), this is what
    /// tears down every task still under the root scope.
    fn drop(&mut self) {
        self.root_token.cancel();
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
