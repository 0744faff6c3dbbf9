//! Department breakdown: headcount per department and share of total.
//!
//! # Invariants
//! - Rows are ordered by count descending, then department name ascending
//!   (unassigned first among equals, matching SQLite's NULL ordering).
//! - Percentages are kept unrounded; rounding happens only when rendering.

use crate::model::employee::Employee;
use crate::model::stats::{department_key, department_label, DepartmentCount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const NAME_WIDTH: usize = 25;
const COLUMN_WIDTH: usize = 10;
const RULE_WIDTH: usize = 45;

pub const NO_DEPARTMENT_DATA: &str = "No department data available.";

/// One department row of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentShare {
    pub department: Option<String>,
    pub count: u64,
    /// Share of `total_employees` in percent, unrounded.
    pub percentage: f64,
}

impl DepartmentShare {
    pub fn label(&self) -> &str {
        department_label(self.department.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub rows: Vec<DepartmentShare>,
    pub total_employees: u64,
}

impl DepartmentSummary {
    /// True when there is nothing to tabulate.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Computes shares for pre-grouped department counts.
pub fn summarize_departments(mut groups: Vec<DepartmentCount>) -> DepartmentSummary {
    groups.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.department.cmp(&b.department))
    });

    let total_employees: u64 = groups.iter().map(|group| group.count).sum();
    let rows = groups
        .into_iter()
        .map(|group| DepartmentShare {
            percentage: if total_employees > 0 {
                group.count as f64 / total_employees as f64 * 100.0
            } else {
                0.0
            },
            department: group.department,
            count: group.count,
        })
        .collect();

    DepartmentSummary {
        rows,
        total_employees,
    }
}

/// Groups a snapshot by department in memory.
///
/// Blank departments join the unassigned group, as in the store's grouping.
pub fn group_snapshot_by_department(employees: &[Employee]) -> Vec<DepartmentCount> {
    let mut counts: BTreeMap<Option<&str>, u64> = BTreeMap::new();
    for employee in employees {
        *counts
            .entry(department_key(employee.department.as_deref()))
            .or_default() += 1;
    }

    let mut groups: Vec<DepartmentCount> = counts
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.map(str::to_string),
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Renders the fixed-width department table, or the no-data notice.
pub fn render_department_report(summary: &DepartmentSummary) -> String {
    if summary.is_empty() {
        return format!("{NO_DEPARTMENT_DATA}\n");
    }

    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$} {:<COLUMN_WIDTH$} {:<COLUMN_WIDTH$}",
        "Department", "Employees", "% of Total"
    );
    let _ = writeln!(out, "{rule}");
    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$} {:<COLUMN_WIDTH$} {:.1}%",
            row.label(),
            row.count,
            row.percentage
        );
    }
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$} {:<COLUMN_WIDTH$} {:.1}%",
        "TOTAL", summary.total_employees, 100.0
    );
    out
}
