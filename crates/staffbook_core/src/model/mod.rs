//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the record shape shared by the store, the service and reports.
//! - Own field-level validation so every write path applies the same rules.
//!
//! # Invariants
//! - Every persisted employee is identified by a store-assigned `EmployeeId`.
//! - `departure_date`, when set, is never earlier than `entry_date`.

pub mod employee;
pub mod stats;
