//! Record store abstractions and SQLite persistence.
//!
//! # Responsibility
//! - Define the data access contract the service layer depends on.
//! - Isolate SQLite query details from reporting and orchestration.
//!
//! # Invariants
//! - Repository writes validate payloads before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateEmail`)
//!   in addition to DB transport errors.

pub mod employee_repo;
