//! Record store: repository contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define aggregate-level data access contracts.
//! - Isolate SQLite query details from lifecycle orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Employee::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateEmail`)
//!   in addition to DB transport errors.

pub mod employee_repo;
