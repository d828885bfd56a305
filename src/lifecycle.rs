//! Observable lifecycle state and its readiness events.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A one-shot readiness event.
///
/// Transitions exactly once from unset to set. A waiter registered before
/// or after the transition always observes the set state - this relies on
/// the `enable()`-then-check idiom documented on [`tokio::sync::Notify`]
/// for `notify_waiters`, since a plain `notified().await` race would miss
/// waiters that start listening after the notification fires.
#[derive(Debug, Default)]
pub struct ReadinessEvent {
    set: AtomicBool,
    notify: Notify,
}

impl ReadinessEvent {
    pub fn new() -> Self {
        Self {
            set: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Fires the event. Idempotent: a second call is a no-op.
    pub fn fire(&self) {
        if !self.set.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::SeqCst)
    }

    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_set() {
            return;
        }
        notified.await;
    }
}

/// The five-boolean observable state machine from the supervision contract,
/// plus the `did_error` flag and their paired readiness events.
///
/// All `mark_*` writers are only ever called by the owning [`Supervisor`](crate::supervisor::Supervisor);
/// readers may run anywhere and never suspend.
#[derive(Debug, Default)]
pub struct LifecycleState {
    started: AtomicBool,
    running: AtomicBool,
    stopping: AtomicBool,
    cancelled: AtomicBool,
    finished: AtomicBool,
    did_error: AtomicBool,

    started_event: ReadinessEvent,
    stopping_event: ReadinessEvent,
    finished_event: ReadinessEvent,
}

impl LifecycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `started`. Idempotent; monotonic.
    pub fn mark_started(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            self.running.store(true, Ordering::SeqCst);
            self.started_event.fire();
        }
    }

    /// Marks `stopping` without implying `cancelled` (the graceful-exit path).
    pub fn mark_stopping(&self) {
        if !self.stopping.swap(true, Ordering::SeqCst) {
            self.stopping_event.fire();
        }
    }

    /// Marks `cancelled`. Idempotent; monotonic once true.
    pub fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Marks `did_error`. Idempotent.
    pub fn mark_errored(&self) {
        self.did_error.store(true, Ordering::SeqCst);
    }

    /// Marks `finished`. Clears `running` and `stopping` per invariant 1
    /// (`finished ⇒ ¬running ∧ ¬stopping`). Idempotent; terminal.
    pub fn mark_finished(&self) {
        if !self.finished.swap(true, Ordering::SeqCst) {
            self.running.store(false, Ordering::SeqCst);
            self.stopping.store(false, Ordering::SeqCst);
            self.finished_event.fire();
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn did_error(&self) -> bool {
        self.did_error.load(Ordering::SeqCst)
    }

    pub async fn wait_started(&self) {
        self.started_event.wait().await;
    }

    pub async fn wait_stopping(&self) {
        self.stopping_event.wait().await;
    }

    pub async fn wait_finished(&self) {
        self.finished_event.wait().await;
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
