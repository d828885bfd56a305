//! # Service Supervision Core
//!
//! A structured-concurrency runtime that gives a long-lived asynchronous
//! unit of work (a [`Service`]) a deterministic lifecycle, a supervised
//! tree of auxiliary tasks and child services, and well-defined aggregated
//! failure semantics.
//!
//! The host cooperative scheduler is Tokio: spawning is `tokio::spawn`,
//! the cancellation scope is [`tokio_util::sync::CancellationToken`], and
//! one-shot readiness is [`tokio::sync::Notify`]. No CLI, logging
//! subsystem, or transport ships here - only the supervision contract.
//!
//! ## Example
//!
//! ```no_run
//! use svc_supervisor::{as_service, Manager};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = as_service(|handle: Manager| async move {
//!     handle.run_task(Some("worker".to_string()), |_handle| async move {
//!         Ok(())
//!     });
//!     handle.wait_stopping().await;
//!     Ok(())
//! });
//!
//! let result = Manager::new(service).run().await;
//! assert!(result.is_ok());
//! # }
//! ```

mod background;
mod config;
mod error;
mod lifecycle;
mod manager;
mod registry;
mod service;
mod supervisor;

pub use background::{background_service, BackgroundScope};
pub use config::SupervisorConfig;
pub use error::{BoxError, SupervisionError};
pub use manager::Manager;
pub use registry::TaskKind;
pub use service::{as_service, FnService, Service};

// Re-exported so callers building task bodies can observe/forward
// cancellation without taking a direct dependency on tokio-util themselves.
pub use tokio_util::sync::CancellationToken;
