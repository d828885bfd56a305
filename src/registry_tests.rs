use super::*;

#[test]
fn register_assigns_unique_ids_and_tracks_liveness() {
    let registry = TaskRegistry::new();
    let body = registry.register(TaskKind::Body, "body".to_string(), None);
    let regular = registry.register(TaskKind::Regular, "worker".to_string(), Some(body));

    assert_ne!(body, regular);
    assert_eq!(registry.snapshot_live().len(), 2);
    assert!(!registry.is_empty());
}

#[test]
fn complete_removes_from_live_set_and_is_idempotent() {
    let registry = TaskRegistry::new();
    let id = registry.register(TaskKind::Daemon, "heartbeat".to_string(), None);

    registry.complete(id);
    assert!(registry.is_empty());

    registry.complete(id);
    assert!(registry.is_empty());
}

#[test]
fn body_is_always_the_first_registered_task() {
    let registry = TaskRegistry::new();
    let body = registry.register(TaskKind::Body, "body".to_string(), None);
    assert_eq!(body, TaskRegistry::body_id());
}

#[test]
fn snapshot_reflects_parent_linkage() {
    let registry = TaskRegistry::new();
    let body = registry.register(TaskKind::Body, "body".to_string(), None);
    let child = registry.register(TaskKind::ChildService, "child".to_string(), Some(body));

    let snapshot = registry.snapshot_live();
    let record = snapshot.iter().find(|r| r.id == child).unwrap();
    assert_eq!(record.parent, Some(body));
    assert_eq!(record.kind, TaskKind::ChildService);
}
