//! Core domain logic for ContactDesk.
//! This crate is the single source of truth for aggregate invariants and the
//! transient/durable store lifecycle.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::Appointment;
pub use model::contact::Contact;
pub use model::task::Task;
pub use model::validation::ValidationError;
pub use model::{Aggregate, DomainError};
pub use service::appointment_service::AppointmentService;
pub use service::contact_service::ContactService;
pub use service::task_service::TaskService;
pub use service::ServiceError;
pub use store::appointment_sqlite::SqliteAppointmentStore;
pub use store::contact_sqlite::SqliteContactStore;
pub use store::memory::MemoryStore;
pub use store::task_sqlite::SqliteTaskStore;
pub use store::{Store, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
