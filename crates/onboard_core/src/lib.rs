//! Core domain logic for employee onboarding.
//! This crate is the single source of truth for onboarding invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::checklist::{
    ChecklistItemId, Document, DocumentInput, DocumentStatus, Task, TaskInput, TaskStatus,
};
pub use model::employee::{
    Employee, EmployeeId, EmployeeStatus, EmployeeUpdate, EmployeeValidationError, NewEmployee,
};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::onboarding_service::{
    AddDocumentRequest, AddTaskRequest, ErrorKind, OnboardingError, OnboardingService,
};
pub use service::seed::{default_onboarding_tasks, SeedTask, ONBOARDING_TASK_TEMPLATE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
