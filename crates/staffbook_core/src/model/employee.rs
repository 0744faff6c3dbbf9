//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted employee record and its insert payload.
//! - Provide typed single-field updates for the contact/department/departure
//!   columns the shell can change.
//! - Validate required fields, email shape and the entry/departure window on
//!   write; reads only re-check the date window.
//!
//! # Invariants
//! - `email` is unique across records (enforced by the store, not here).
//! - `departure_date` must not precede `entry_date`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier (SQLite `INTEGER PRIMARY KEY`).
pub type EmployeeId = i64;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validation failures for employee payloads and field updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// A required text field is empty or whitespace only.
    BlankField(&'static str),
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Departure date is earlier than entry date.
    DepartureBeforeEntry {
        entry_date: NaiveDate,
        departure_date: NaiveDate,
    },
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::DepartureBeforeEntry {
                entry_date,
                departure_date,
            } => write!(
                f,
                "departure_date ({departure_date}) must be >= entry_date ({entry_date})"
            ),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Employment state derived from `departure_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// No departure date set.
    Current,
    /// Departure date set.
    Former,
}

/// Insert payload; everything but the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    /// `None` stores SQL `NULL`; reports show it as unassigned.
    pub department: Option<String>,
    pub entry_date: NaiveDate,
    pub departure_date: Option<NaiveDate>,
}

impl NewEmployee {
    /// Builds a current employee (no departure date).
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        phone_number: impl Into<String>,
        email: impl Into<String>,
        department: Option<String>,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            address: address.into(),
            phone_number: phone_number.into(),
            email: email.into(),
            department,
            entry_date,
            departure_date: None,
        }
    }

    /// Returns a copy with `departure_date` set.
    pub fn departed(mut self, departure_date: NaiveDate) -> Self {
        self.departure_date = Some(departure_date);
        self
    }

    /// Validates required fields, email shape and the date window.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        require_text("full_name", &self.full_name)?;
        require_text("address", &self.address)?;
        require_text("phone_number", &self.phone_number)?;
        validate_email(&self.email)?;
        validate_dates(self.entry_date, self.departure_date)
    }
}

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub department: Option<String>,
    pub entry_date: NaiveDate,
    pub departure_date: Option<NaiveDate>,
}

impl Employee {
    /// Combines a store id with an insert payload.
    pub fn from_new(id: EmployeeId, new: NewEmployee) -> Self {
        Self {
            id,
            full_name: new.full_name,
            address: new.address,
            phone_number: new.phone_number,
            email: new.email,
            department: new.department,
            entry_date: new.entry_date,
            departure_date: new.departure_date,
        }
    }

    pub fn status(&self) -> EmploymentStatus {
        if self.departure_date.is_some() {
            EmploymentStatus::Former
        } else {
            EmploymentStatus::Current
        }
    }

    pub fn is_current(&self) -> bool {
        self.status() == EmploymentStatus::Current
    }

    /// Checks only the entry/departure window, the one rule reports rely on.
    pub fn validate_dates(&self) -> Result<(), EmployeeValidationError> {
        validate_dates(self.entry_date, self.departure_date)
    }

    /// Applies a single-field update in memory.
    ///
    /// Only the changed column is validated, so records stored before the
    /// stricter write rules can still be edited. Leaves `self` untouched when
    /// validation fails.
    pub fn apply(&mut self, update: &FieldUpdate) -> Result<(), EmployeeValidationError> {
        match update {
            FieldUpdate::Email(value) => {
                validate_email(value)?;
                self.email = value.clone();
            }
            FieldUpdate::Address(value) => {
                require_text("address", value)?;
                self.address = value.clone();
            }
            FieldUpdate::PhoneNumber(value) => {
                require_text("phone_number", value)?;
                self.phone_number = value.clone();
            }
            FieldUpdate::Department(value) => self.department = value.clone(),
            FieldUpdate::DepartureDate(value) => {
                validate_dates(self.entry_date, *value)?;
                self.departure_date = *value;
            }
        }
        Ok(())
    }
}

/// One column change issued by the update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Email(String),
    Address(String),
    PhoneNumber(String),
    /// `None` clears the department.
    Department(Option<String>),
    /// `None` re-activates a former employee.
    DepartureDate(Option<NaiveDate>),
}

impl FieldUpdate {
    /// Column name this update writes.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Address(_) => "address",
            Self::PhoneNumber(_) => "phone_number",
            Self::Department(_) => "department",
            Self::DepartureDate(_) => "departure_date",
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), EmployeeValidationError> {
    if value.trim().is_empty() {
        return Err(EmployeeValidationError::BlankField(field));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), EmployeeValidationError> {
    require_text("email", value)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(EmployeeValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

fn validate_dates(
    entry_date: NaiveDate,
    departure_date: Option<NaiveDate>,
) -> Result<(), EmployeeValidationError> {
    match departure_date {
        Some(departure_date) if departure_date < entry_date => {
            Err(EmployeeValidationError::DepartureBeforeEntry {
                entry_date,
                departure_date,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeValidationError, FieldUpdate, NewEmployee};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> NewEmployee {
        NewEmployee::new(
            "Ada Lovelace",
            "12 St James's Square",
            "555-0100",
            "ada@example.com",
            Some("Engineering".to_string()),
            date(2020, 1, 1),
        )
    }

    #[test]
    fn same_day_departure_is_valid() {
        assert!(sample().departed(date(2020, 1, 1)).validate().is_ok());
    }

    #[test]
    fn rejects_departure_before_entry() {
        let err = sample().departed(date(2019, 12, 31)).validate().unwrap_err();
        assert_eq!(
            err,
            EmployeeValidationError::DepartureBeforeEntry {
                entry_date: date(2020, 1, 1),
                departure_date: date(2019, 12, 31),
            }
        );
    }

    #[test]
    fn rejects_blank_name_and_malformed_email() {
        let mut blank = sample();
        blank.full_name = "   ".to_string();
        assert_eq!(
            blank.validate().unwrap_err(),
            EmployeeValidationError::BlankField("full_name")
        );

        let mut bad_email = sample();
        bad_email.email = "ada.example.com".to_string();
        assert!(matches!(
            bad_email.validate().unwrap_err(),
            EmployeeValidationError::InvalidEmail(_)
        ));
    }

    #[test]
    fn apply_keeps_record_unchanged_on_invalid_update() {
        let mut employee = super::Employee::from_new(1, sample());
        let err = employee
            .apply(&FieldUpdate::DepartureDate(Some(date(2019, 1, 1))))
            .unwrap_err();
        assert!(matches!(
            err,
            EmployeeValidationError::DepartureBeforeEntry { .. }
        ));
        assert_eq!(employee.departure_date, None);

        employee
            .apply(&FieldUpdate::DepartureDate(Some(date(2022, 6, 30))))
            .unwrap();
        assert!(!employee.is_current());
    }

    #[test]
    fn apply_validates_only_the_changed_column() {
        let mut employee = super::Employee::from_new(1, sample());
        employee.email = "legacy".to_string();

        employee
            .apply(&FieldUpdate::Address("221B Baker Street".to_string()))
            .unwrap();
        assert_eq!(employee.address, "221B Baker Street");

        assert!(matches!(
            employee.apply(&FieldUpdate::Email("still-bad".to_string())),
            Err(EmployeeValidationError::InvalidEmail(_))
        ));
        assert_eq!(
            employee.apply(&FieldUpdate::PhoneNumber(" ".to_string())),
            Err(EmployeeValidationError::BlankField("phone_number"))
        );
        assert_eq!(employee.email, "legacy");
        assert_eq!(employee.phone_number, "555-0100");
    }
}
