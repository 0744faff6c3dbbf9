//! Core domain logic for staffbook, an employee record manager.
//! This crate owns the record store, validation rules and aggregate reports.

pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::employee::{
    Employee, EmployeeId, EmployeeValidationError, EmploymentStatus, FieldUpdate, NewEmployee,
};
pub use model::stats::{DepartmentCount, StatusCounts};
pub use report::department::{
    group_snapshot_by_department, render_department_report, summarize_departments,
    DepartmentShare, DepartmentSummary,
};
pub use report::headcount::{
    headcount_from_snapshot, render_headcount, summarize_headcount, HeadcountSummary,
};
pub use report::tenure::{
    compute_tenure, compute_tenures, render_tenure_report, tenure_report_from_snapshot,
    TenureEntry, TenureReport, TenureResult,
};
pub use repo::employee_repo::{
    EmployeeFilter, EmployeeRepository, SqliteEmployeeRepository, StoreError, StoreResult,
};
pub use service::employee_service::EmployeeService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
