//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and aggregate queries over the `employees` table.
//! - Compile structured filters into bound-parameter SQL.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - Write paths validate payloads before SQL mutations.
//! - Read paths reject rows whose dates are unparseable or reversed; contact
//!   fields stored by older tools are returned as-is.
//! - No caller-provided text is ever spliced into SQL.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{
    Employee, EmployeeId, EmployeeValidationError, EmploymentStatus, FieldUpdate, NewEmployee,
};
use crate::model::stats::{DepartmentCount, StatusCounts};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    full_name,
    address,
    phone_number,
    email,
    department,
    entry_date,
    departure_date
FROM employees";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for employee persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(EmployeeValidationError),
    Db(DbError),
    NotFound(EmployeeId),
    /// Unique constraint on `employees.email` rejected the write.
    DuplicateEmail(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl StoreError {
    /// Stable machine-readable kind, safe to log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::NotFound(_) => "not_found",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
        }
    }

    /// Returns whether the shell must stop instead of reporting and looping.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Db(err) => err.is_fatal(),
            Self::UninitializedConnection { .. } | Self::MissingRequiredTable(_) => true,
            _ => false,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::DuplicateEmail(email) => {
                write!(f, "an employee with email `{email}` already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for StoreError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Structured predicates for listing employees.
///
/// All set predicates are combined with `AND`. The default filter matches
/// every record, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub status: Option<EmploymentStatus>,
    /// Exact department match.
    pub department: Option<String>,
    /// Case-insensitive substring of `full_name`.
    pub name_contains: Option<String>,
    /// Exact email match.
    pub email: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl EmployeeFilter {
    pub fn with_status(status: EmploymentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_department(department: impl Into<String>) -> Self {
        Self {
            department: Some(department.into()),
            ..Self::default()
        }
    }

    pub fn with_name(fragment: impl Into<String>) -> Self {
        Self {
            name_contains: Some(fragment.into()),
            ..Self::default()
        }
    }

    fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = format!("{EMPLOYEE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match self.status {
            Some(EmploymentStatus::Current) => sql.push_str(" AND departure_date IS NULL"),
            Some(EmploymentStatus::Former) => sql.push_str(" AND departure_date IS NOT NULL"),
            None => {}
        }

        if let Some(department) = &self.department {
            sql.push_str(" AND department = ?");
            bind_values.push(Value::Text(department.clone()));
        }

        if let Some(fragment) = &self.name_contains {
            sql.push_str(" AND full_name LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(format!("%{}%", escape_like(fragment))));
        }

        if let Some(email) = &self.email {
            sql.push_str(" AND email = ?");
            bind_values.push(Value::Text(email.clone()));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(self.offset)));
        }

        (sql, bind_values)
    }
}

/// Repository interface for employee records and pre-aggregated counts.
pub trait EmployeeRepository {
    fn insert(&self, employee: &NewEmployee) -> StoreResult<EmployeeId>;
    /// Inserts all records in one transaction; nothing is written on failure.
    fn insert_many(&self, employees: &[NewEmployee]) -> StoreResult<usize>;
    fn get(&self, id: EmployeeId) -> StoreResult<Option<Employee>>;
    fn fetch_all(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>>;
    fn update_field(&self, id: EmployeeId, update: &FieldUpdate) -> StoreResult<()>;
    fn delete(&self, id: EmployeeId) -> StoreResult<()>;
    fn count_total(&self) -> StoreResult<u64>;
    fn count_by_status(&self) -> StoreResult<StatusCounts>;
    /// Department groups ordered by count descending, then name ascending.
    ///
    /// Blank and `NULL` departments share the unassigned group.
    fn group_by_department(&self) -> StoreResult<Vec<DepartmentCount>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    ///
    /// Rejects connections whose schema was never migrated or that lack the
    /// `employees` table.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version < expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'employees'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(StoreError::MissingRequiredTable("employees"));
        }

        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert(&self, employee: &NewEmployee) -> StoreResult<EmployeeId> {
        insert_row(self.conn, employee)
    }

    fn insert_many(&self, employees: &[NewEmployee]) -> StoreResult<usize> {
        for employee in employees {
            employee.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        for employee in employees {
            insert_row(&tx, employee)?;
        }
        tx.commit()?;

        Ok(employees.len())
    }

    fn get(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        select_by_id(self.conn, id)
    }

    fn fetch_all(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let (sql, bind_values) = filter.to_sql();
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn update_field(&self, id: EmployeeId, update: &FieldUpdate) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let mut employee = select_by_id(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        employee.apply(update)?;

        let value = match update {
            FieldUpdate::Email(value)
            | FieldUpdate::Address(value)
            | FieldUpdate::PhoneNumber(value) => Value::Text(value.trim().to_string()),
            FieldUpdate::Department(value) => optional_text(value.as_deref()),
            FieldUpdate::DepartureDate(value) => optional_text(value.map(format_date).as_deref()),
        };

        // `column()` only yields fixed identifiers, never caller text.
        tx.execute(
            &format!("UPDATE employees SET {} = ?1 WHERE id = ?2;", update.column()),
            params![value, id],
        )
        .map_err(|err| map_write_error(err, &employee.email))?;
        tx.commit()?;

        Ok(())
    }

    fn delete(&self, id: EmployeeId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn count_total(&self) -> StoreResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        to_count(total, "total")
    }

    fn count_by_status(&self) -> StoreResult<StatusCounts> {
        let (total, current, former): (i64, i64, i64) = self.conn.query_row(
            "SELECT
                COUNT(*),
                COUNT(CASE WHEN departure_date IS NULL THEN 1 END),
                COUNT(CASE WHEN departure_date IS NOT NULL THEN 1 END)
             FROM employees;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(StatusCounts {
            total: to_count(total, "total")?,
            current: to_count(current, "current")?,
            former: to_count(former, "former")?,
        })
    }

    fn group_by_department(&self) -> StoreResult<Vec<DepartmentCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT NULLIF(TRIM(department), '') AS department_name,
                    COUNT(*) AS num_employees
             FROM employees
             GROUP BY NULLIF(TRIM(department), '')
             ORDER BY num_employees DESC, department_name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();

        while let Some(row) = rows.next()? {
            let count: i64 = row.get("num_employees")?;
            groups.push(DepartmentCount {
                department: row.get("department_name")?,
                count: to_count(count, "num_employees")?,
            });
        }

        Ok(groups)
    }
}

fn insert_row(conn: &Connection, employee: &NewEmployee) -> StoreResult<EmployeeId> {
    employee.validate()?;

    conn.execute(
        "INSERT INTO employees (
            full_name,
            address,
            phone_number,
            email,
            department,
            entry_date,
            departure_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            employee.full_name.trim(),
            employee.address.trim(),
            employee.phone_number.trim(),
            employee.email.trim(),
            optional_text(employee.department.as_deref()),
            format_date(employee.entry_date),
            employee.departure_date.map(format_date),
        ],
    )
    .map_err(|err| map_write_error(err, employee.email.trim()))?;

    Ok(conn.last_insert_rowid())
}

fn select_by_id(conn: &Connection, id: EmployeeId) -> StoreResult<Option<Employee>> {
    let mut stmt = conn.prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_employee_row(row)?));
    }

    Ok(None)
}

fn parse_employee_row(row: &Row<'_>) -> StoreResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let entry_text: String = row.get("entry_date")?;
    let entry_date = parse_date(&entry_text, "entry_date")?;
    let departure_date = match row.get::<_, Option<String>>("departure_date")? {
        Some(value) => Some(parse_date(&value, "departure_date")?),
        None => None,
    };

    let employee = Employee {
        id,
        full_name: row.get("full_name")?,
        address: row.get("address")?,
        phone_number: row.get("phone_number")?,
        email: row.get("email")?,
        department: row.get("department")?,
        entry_date,
        departure_date,
    };
    employee
        .validate_dates()
        .map_err(|err| StoreError::InvalidData(format!("employee {id}: {err}")))?;
    Ok(employee)
}

fn parse_date(value: &str, column: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        StoreError::InvalidData(format!("invalid date `{value}` in employees.{column}"))
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Blank text is stored as `NULL`.
fn optional_text(value: Option<&str>) -> Value {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Value::Text(text.to_string()),
        _ => Value::Null,
    }
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn map_write_error(err: rusqlite::Error, email: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            && message.contains("employees.email")
        {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    err.into()
}

fn to_count(value: i64, what: &str) -> StoreResult<u64> {
    u64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("negative {what} count `{value}`")))
}
