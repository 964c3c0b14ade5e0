//! Onboarding domain model.
//!
//! # Responsibility
//! - Define the employee aggregate and its embedded checklists.
//! - Keep field normalization and validation next to the data it guards.
//!
//! # Invariants
//! - Every employee is identified by a stable `EmployeeId`.
//! - Documents and tasks exist only inside their owning employee.
//! - Deletion is a hard delete of the whole aggregate.

pub mod checklist;
pub mod employee;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
