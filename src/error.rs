//! Failure kinds surfaced by a supervised run.

use thiserror::Error;

/// Error type a [`Service`](crate::service::Service) body or a spawned task
/// may return. Boxed rather than generic so the supervisor can aggregate
/// failures of unrelated concrete error types into one composite.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced out of [`Manager::run`](crate::manager::Manager::run).
#[derive(Error, Debug)]
pub enum SupervisionError {
    /// A failure raised by the service body or a `regular`/`child-service` task.
    #[error("{0}")]
    User(#[source] BoxError),

    /// A daemon task exited (cleanly or with an error) before the supervisor
    /// entered `stopping`. Carries the daemon's name so the constituent is
    /// type-discriminated inside a [`Composite`](SupervisionError::Composite),
    /// not just a string.
    #[error("Daemon task {name} exited")]
    DaemonExit { name: String },

    /// Two or more of the above, in the order spec'd by the aggregation rule:
    /// the failure that initiated cancellation first, the rest in completion
    /// order. `constituents()` is the structured way to inspect these; the
    /// `Display` impl below falls back to `Debug` formatting of the list
    /// since thiserror's format strings can't fold a `Vec<Self>` through
    /// each element's own `Display`.
    #[error("{0:?}")]
    Composite(Vec<SupervisionError>),

    /// `Manager::run` was called more than once on the same instance. A
    /// service is single-use: it may be supervised at most once.
    #[error("service has already been started")]
    AlreadyStarted,
}

impl SupervisionError {
    /// True for the synthesized daemon-exit variant specifically, not for a
    /// composite that merely contains one.
    pub fn is_daemon_exit(&self) -> bool {
        matches!(self, SupervisionError::DaemonExit { .. })
    }

    /// Flattened view of the constituents: `[self]` unless this is a
    /// composite, in which case its own constituents (already flat, per the
    /// aggregation algorithm, which never nests composites).
    pub fn constituents(&self) -> Vec<&SupervisionError> {
        match self {
            SupervisionError::Composite(failures) => failures.iter().collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
