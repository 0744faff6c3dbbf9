//! Pre-aggregated counts returned by the store for reporting.

use serde::{Deserialize, Serialize};

/// Total/current/former counts from one pass over the employee table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: u64,
    pub current: u64,
    pub former: u64,
}

/// Headcount of one department group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    /// `None` groups employees without a department.
    pub department: Option<String>,
    pub count: u64,
}

impl DepartmentCount {
    pub fn new(department: impl Into<String>, count: u64) -> Self {
        Self {
            department: Some(department.into()),
            count,
        }
    }

    /// Display label; unassigned employees are grouped as `(unassigned)`.
    pub fn label(&self) -> &str {
        department_label(self.department.as_deref())
    }
}

pub const UNASSIGNED_LABEL: &str = "(unassigned)";

/// Display label for a department group key.
pub fn department_label(department: Option<&str>) -> &str {
    department.unwrap_or(UNASSIGNED_LABEL)
}

/// Grouping key for a stored department: trimmed, with blank folded into `None`.
pub fn department_key(department: Option<&str>) -> Option<&str> {
    department.map(str::trim).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{department_key, department_label, UNASSIGNED_LABEL};

    #[test]
    fn blank_departments_share_the_unassigned_key() {
        assert_eq!(department_key(None), None);
        assert_eq!(department_key(Some("")), None);
        assert_eq!(department_key(Some("   ")), None);
        assert_eq!(department_key(Some(" Sales ")), Some("Sales"));
        assert_eq!(department_label(department_key(Some(""))), UNASSIGNED_LABEL);
    }
}
