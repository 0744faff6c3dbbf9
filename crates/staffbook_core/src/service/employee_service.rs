//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the record and report entry points the shell calls.
//! - Pull snapshots/counts from the store and feed the pure report functions.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Log lines carry ids and counts only, never names or contact data.

use crate::model::employee::{Employee, EmployeeId, FieldUpdate, NewEmployee};
use crate::report::department::{summarize_departments, DepartmentSummary};
use crate::report::headcount::{summarize_headcount, HeadcountSummary};
use crate::report::tenure::{tenure_report_from_snapshot, TenureReport};
use crate::repo::employee_repo::{EmployeeFilter, EmployeeRepository, StoreError, StoreResult};
use chrono::NaiveDate;
use log::{info, warn};

/// Use-case facade over an [`EmployeeRepository`].
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores one employee, returning the assigned id.
    pub fn add_employee(&self, employee: &NewEmployee) -> StoreResult<EmployeeId> {
        let id = self
            .repo
            .insert(employee)
            .inspect_err(|err| log_failure("employee_add", err))?;
        info!("event=employee_add module=service status=ok employee_id={id}");
        Ok(id)
    }

    /// Stores a batch atomically; either every record is written or none.
    pub fn add_employees(&self, employees: &[NewEmployee]) -> StoreResult<usize> {
        let inserted = self
            .repo
            .insert_many(employees)
            .inspect_err(|err| log_failure("employee_add_batch", err))?;
        info!("event=employee_add_batch module=service status=ok count={inserted}");
        Ok(inserted)
    }

    pub fn get_employee(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        self.repo.get(id)
    }

    /// Lists employees matching `filter`, ordered by id.
    pub fn search(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let employees = self
            .repo
            .fetch_all(filter)
            .inspect_err(|err| log_failure("employee_search", err))?;
        info!(
            "event=employee_search module=service status=ok count={}",
            employees.len()
        );
        Ok(employees)
    }

    pub fn update_field(&self, id: EmployeeId, update: &FieldUpdate) -> StoreResult<()> {
        self.repo
            .update_field(id, update)
            .inspect_err(|err| log_failure("employee_update", err))?;
        info!(
            "event=employee_update module=service status=ok employee_id={id} field={}",
            update.column()
        );
        Ok(())
    }

    /// Marks an employee as departed on `departure_date`.
    pub fn record_departure(&self, id: EmployeeId, departure_date: NaiveDate) -> StoreResult<()> {
        self.update_field(id, &FieldUpdate::DepartureDate(Some(departure_date)))
    }

    pub fn delete_employee(&self, id: EmployeeId) -> StoreResult<()> {
        self.repo
            .delete(id)
            .inspect_err(|err| log_failure("employee_delete", err))?;
        info!("event=employee_delete module=service status=ok employee_id={id}");
        Ok(())
    }

    /// Tenure of every employee, measured against `as_of` for current staff.
    ///
    /// Repeated calls with different `as_of` values give different results
    /// for current employees; callers pass the local date or a fixed one.
    pub fn tenure_report(&self, as_of: NaiveDate) -> StoreResult<TenureReport> {
        let snapshot = self
            .repo
            .fetch_all(&EmployeeFilter::default())
            .inspect_err(|err| log_failure("report_tenure", err))?;
        let report = tenure_report_from_snapshot(&snapshot, as_of);
        info!(
            "event=report_tenure module=service status=ok employees={} as_of={as_of}",
            report.entries.len()
        );
        Ok(report)
    }

    pub fn headcount_report(&self) -> StoreResult<HeadcountSummary> {
        let counts = self
            .repo
            .count_by_status()
            .inspect_err(|err| log_failure("report_headcount", err))?;
        info!(
            "event=report_headcount module=service status=ok total={}",
            counts.total
        );
        Ok(summarize_headcount(counts))
    }

    pub fn department_report(&self) -> StoreResult<DepartmentSummary> {
        let groups = self
            .repo
            .group_by_department()
            .inspect_err(|err| log_failure("report_department", err))?;
        info!(
            "event=report_department module=service status=ok departments={}",
            groups.len()
        );
        Ok(summarize_departments(groups))
    }

    /// Total number of stored employees.
    pub fn count_employees(&self) -> StoreResult<u64> {
        self.repo.count_total()
    }
}

fn log_failure(event: &str, err: &StoreError) {
    warn!(
        "event={event} module=service status=error error_code={}",
        err.code()
    );
}
