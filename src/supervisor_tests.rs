use super::*;
use crate::manager::Manager;
use crate::service::as_service;
use tokio::sync::Notify;
use tracing_test::traced_test;

fn sleepy_service() -> impl Service {
    as_service(|_handle: Manager| async move {
        std::future::pending::<()>().await;
        Ok(())
    })
}

#[tokio::test]
async fn regular_task_failure_is_the_sole_aggregated_failure() {
    let manager = Manager::new(sleepy_service());
    let run = manager.clone();
    let join = tokio::spawn(async move { run.run().await });

    manager.wait_started().await;
    manager
        .inner
        .spawn_guarded(TaskKind::Regular, "flaky".to_string(), async move {
            Err(Box::<dyn std::error::Error + Send + Sync>::from(
                "task exception in run_task",
            ))
        });

    let result = join.await.unwrap();
    let err = result.expect_err("a failing regular task must fail the supervision");
    assert_eq!(err.to_string(), "task exception in run_task");
    assert!(manager.did_error());
    assert!(manager.is_cancelled());
}

#[tokio::test]
async fn daemon_completing_before_stopping_synthesizes_daemon_exit() {
    let manager = Manager::new(sleepy_service());
    let run = manager.clone();
    let join = tokio::spawn(async move { run.run().await });

    manager.wait_started().await;
    manager
        .inner
        .spawn_guarded(TaskKind::Daemon, "daemon_task_fn".to_string(), async move {
            Ok(())
        });

    let result = join.await.unwrap();
    let err = result.expect_err("an early daemon exit must fail the supervision");
    assert!(err.is_daemon_exit());
    assert_eq!(err.to_string(), "Daemon task daemon_task_fn exited");
}

#[tokio::test]
async fn daemon_completing_after_stopping_begins_contributes_nothing() {
    let notify = std::sync::Arc::new(Notify::new());
    let waiter = notify.clone();

    let service = as_service(move |_handle: Manager| {
        let waiter = waiter.clone();
        async move {
            waiter.notified().await;
            Ok(())
        }
    });

    let manager = Manager::new(service);
    let run = manager.clone();
    let join = tokio::spawn(async move { run.run().await });

    manager.wait_started().await;
    manager
        .inner
        .spawn_guarded(TaskKind::Daemon, "heartbeat".to_string(), async move {
            std::future::pending::<()>().await;
            Ok(())
        });

    notify.notify_one();

    let result = join.await.unwrap();
    assert!(result.is_ok(), "a daemon cancelled during graceful shutdown is not an error");
}

#[tokio::test]
async fn multiple_failures_compose_with_the_initiator_first() {
    let shared_event = std::sync::Arc::new(Notify::new());
    let body_event = shared_event.clone();
    let daemon_event = shared_event.clone();

    let service = as_service(move |_handle: Manager| {
        let body_event = body_event.clone();
        async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            body_event.notify_one();
            Err(Box::<dyn std::error::Error + Send + Sync>::from(
                "Exception inside Service.run()",
            ))
        }
    });

    let manager = Manager::new(service);
    let run = manager.clone();
    let join = tokio::spawn(async move { run.run().await });

    manager
        .inner
        .spawn_guarded(TaskKind::Daemon, "daemon_task_fn".to_string(), async move {
            daemon_event.notified().await;
            Ok(())
        });

    let result = join.await.unwrap();
    let err = result.expect_err("body failure plus a daemon exit must compose");
    let constituents = err.constituents();
    assert_eq!(constituents.len(), 2);
    assert_eq!(constituents[0].to_string(), "Exception inside Service.run()");
    assert!(constituents[1].is_daemon_exit());
}

#[traced_test]
#[tokio::test]
async fn started_and_finished_are_traced() {
    // The debug!/warn! calls in `run` go through the default subscriber
    // `traced_test` installs; this just confirms the run completes under
    // it without panicking the span/event machinery.
    let manager = Manager::new(sleepy_service());
    let run = manager.clone();
    let join = tokio::spawn(async move { run.run().await });

    manager.wait_started().await;
    manager.cancel();
    let result = join.await.unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let manager = Manager::new(sleepy_service());
    let run = manager.clone();
    let join = tokio::spawn(async move { run.run().await });

    manager.wait_started().await;
    manager.cancel();
    manager.cancel();
    manager.cancel();

    let result = join.await.unwrap();
    assert!(result.is_ok());
    assert!(manager.is_cancelled());
}
