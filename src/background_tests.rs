use super::*;
use crate::service::as_service;
use tokio::sync::Notify;

#[tokio::test]
async fn scope_is_running_inside_and_finished_after_shutdown() {
    let notify = std::sync::Arc::new(Notify::new());
    let waiter = notify.clone();

    let service = as_service(move |_handle: Manager| {
        let waiter = waiter.clone();
        async move {
            waiter.notified().await;
            Ok(())
        }
    });

    let scope = background_service(service).await;
    assert!(scope.manager().is_started());
    assert!(scope.manager().is_running());
    assert!(!scope.manager().is_cancelled());

    let result = scope.shutdown().await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn shutdown_always_leaves_the_service_cancelled_and_finished() {
    let service = as_service(|_handle: Manager| async move {
        std::future::pending::<()>().await;
        Ok(())
    });

    let scope = background_service(service).await;
    let manager = scope.manager().clone();

    scope.shutdown().await.expect("cancellation is filtered, not an error");
    assert!(manager.is_cancelled());
    assert!(manager.is_finished());
}
