//! Bookkeeping of spawned tasks, the sole source of truth for "are there
//! still tasks to join".

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Opaque task identifier. Never exposed outside the crate - names and
/// kinds are used for diagnostics, identities are an internal bookkeeping
/// detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TaskId(u64);

/// What a task record represents in the supervision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// The service's own entry point, `run(handle)`.
    Body,
    /// An auxiliary task whose clean completion does not end the service.
    Regular,
    /// An auxiliary task whose early exit is itself an error.
    Daemon,
    /// A nested service supervised within this supervisor's scope.
    ChildService,
}

/// Per-spawned-unit bookkeeping record.
#[derive(Debug, Clone)]
pub(crate) struct TaskRecord {
    pub id: TaskId,
    pub kind: TaskKind,
    pub name: String,
    pub parent: Option<TaskId>,
}

/// The live set of spawned tasks.
#[derive(Debug, Default)]
pub(crate) struct TaskRegistry {
    next_id: AtomicU64,
    live: DashMap<TaskId, TaskRecord>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record in the live set. Caller must schedule the underlying
    /// task with no suspension point in between, so registration stays
    /// atomic with scheduling as the contract requires.
    pub fn register(&self, kind: TaskKind, name: String, parent: Option<TaskId>) -> TaskId {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.live.insert(
            id,
            TaskRecord {
                id,
                kind,
                name,
                parent,
            },
        );
        id
    }

    /// Removes a record once its completion has been observed. Idempotent.
    pub fn complete(&self, id: TaskId) {
        self.live.remove(&id);
    }

    pub fn snapshot_live(&self) -> Vec<TaskRecord> {
        self.live.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// The body task is always the first one registered by a [`Supervisor`](crate::supervisor::Supervisor).
    pub fn body_id() -> TaskId {
        TaskId(0)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
