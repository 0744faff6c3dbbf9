//! Tenure calculation.
//!
//! # Responsibility
//! - Measure employment from entry date to departure date (or `as_of`).
//! - Produce both a calendar breakdown and an average-year figure.
//!
//! # Invariants
//! - "Now" is always injected as `as_of`; nothing here reads the clock.
//! - Results preserve input order.
//! - An end date before the entry date is clamped to a zero interval.

use super::round_to;
use crate::model::employee::{Employee, EmployeeId};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Mean Gregorian year length used for `years_worked`.
const DAYS_PER_YEAR: f64 = 365.25;

/// Elapsed employment for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureResult {
    /// Whole days from entry to end.
    pub days_worked: i64,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    /// `days_worked / 365.25`, rounded to 2 decimals.
    pub years_worked: f64,
    /// `"<years> years, <months> months, <days> days"`.
    pub formatted: String,
}

/// Computes tenure for one entry/departure pair.
///
/// A missing `departure_date` measures against `as_of`. The calendar split
/// counts whole months first (anchoring on the entry day, clamped to the
/// month's last day) and then the days remaining after that anchor, so it is
/// independent of the fixed 365.25-day figure.
pub fn compute_tenure(
    entry_date: NaiveDate,
    departure_date: Option<NaiveDate>,
    as_of: NaiveDate,
) -> TenureResult {
    let end_date = departure_date.unwrap_or(as_of).max(entry_date);
    let days_worked = (end_date - entry_date).num_days();
    let (whole_months, days) = calendar_months_and_days(entry_date, end_date);
    let years = whole_months / 12;
    let months = whole_months % 12;

    TenureResult {
        days_worked,
        years,
        months,
        days,
        years_worked: round_to(days_worked as f64 / DAYS_PER_YEAR, 2),
        formatted: format!("{years} years, {months} months, {days} days"),
    }
}

/// Computes tenure for every `(entry_date, departure_date)` pair in order.
pub fn compute_tenures<I>(records: I, as_of: NaiveDate) -> Vec<TenureResult>
where
    I: IntoIterator<Item = (NaiveDate, Option<NaiveDate>)>,
{
    records
        .into_iter()
        .map(|(entry_date, departure_date)| compute_tenure(entry_date, departure_date, as_of))
        .collect()
}

/// Tenure of one employee in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureEntry {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub tenure: TenureResult,
}

/// Per-employee tenure over one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureReport {
    pub as_of: NaiveDate,
    /// Same order as the snapshot.
    pub entries: Vec<TenureEntry>,
    /// Mean of `years_worked` over all entries, rounded to 2 decimals;
    /// `0.0` for an empty snapshot.
    pub average_years_worked: f64,
}

/// Builds the tenure report for a snapshot.
pub fn tenure_report_from_snapshot(employees: &[Employee], as_of: NaiveDate) -> TenureReport {
    let results = compute_tenures(
        employees
            .iter()
            .map(|employee| (employee.entry_date, employee.departure_date)),
        as_of,
    );

    let average_years_worked = if results.is_empty() {
        0.0
    } else {
        let sum: f64 = results.iter().map(|result| result.years_worked).sum();
        round_to(sum / results.len() as f64, 2)
    };

    let entries = employees
        .iter()
        .zip(results)
        .map(|(employee, tenure)| TenureEntry {
            employee_id: employee.id,
            full_name: employee.full_name.clone(),
            tenure,
        })
        .collect();

    TenureReport {
        as_of,
        entries,
        average_years_worked,
    }
}

/// Renders one line per employee plus the average.
pub fn render_tenure_report(report: &TenureReport) -> String {
    if report.entries.is_empty() {
        return "No employees found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Time each employee has been working (as of {}):", report.as_of);
    for entry in &report.entries {
        let _ = writeln!(
            out,
            "#{} {}: {} ({:.2} years)",
            entry.employee_id, entry.full_name, entry.tenure.formatted, entry.tenure.years_worked
        );
    }
    let _ = writeln!(
        out,
        "Average tenure: {:.2} years",
        report.average_years_worked
    );
    out
}

/// Returns `(whole_months, remaining_days)` for `start <= end`.
fn calendar_months_and_days(start: NaiveDate, end: NaiveDate) -> (u32, u32) {
    let month_span = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut whole_months = u32::try_from(month_span).unwrap_or(0);

    // The estimate can overshoot by one when the end day precedes the
    // (clamped) entry day in the final month.
    let anchor = loop {
        match start.checked_add_months(Months::new(whole_months)) {
            Some(anchor) if anchor <= end => break anchor,
            _ if whole_months == 0 => break start,
            _ => whole_months -= 1,
        }
    };

    let days = u32::try_from((end - anchor).num_days()).unwrap_or(0);
    (whole_months, days)
}
