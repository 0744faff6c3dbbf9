//! Line-oriented menu loop.
//!
//! # Responsibility
//! - Prompt for menu choices and record fields, re-prompting on bad input.
//! - Call the employee service and print its results as fixed-width text.
//!
//! # Invariants
//! - Store errors are printed and the loop continues, unless fatal.
//! - End of input behaves like choosing `exit`.

use chrono::NaiveDate;
use staffbook_core::{
    render_department_report, render_headcount, render_tenure_report, Employee, EmployeeFilter,
    EmployeeId, EmployeeRepository, EmployeeService, EmploymentStatus, FieldUpdate, NewEmployee,
    StoreError, StoreResult,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const DATE_FORMAT: &str = "%Y-%m-%d";

const MAIN_MENU: &str = "Enter your option:
    1. Add
    2. Delete
    3. Update
    4. Search
    5. Tenure report
    6. Headcount report
    7. Department report
    8. Exit
> ";

const UPDATE_MENU: &str = "What piece of data do you want to update?
    1. Email
    2. Address
    3. Phone number
    4. Department
    5. Departure date
    6. None
> ";

const SEARCH_MENU: &str = "Which employees?
    1. All
    2. Current
    3. Former
    4. By department
    5. By name
> ";

/// Errors that end the shell.
#[derive(Debug)]
pub enum ShellError {
    Io(io::Error),
    Store(StoreError),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
            Self::Store(err) => write!(f, "employee store unavailable: {err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<io::Error> for ShellError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    Delete,
    Update,
    Search,
    Tenure,
    Headcount,
    Department,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "add" => Some(Self::Add),
            "2" | "delete" => Some(Self::Delete),
            "3" | "update" => Some(Self::Update),
            "4" | "search" => Some(Self::Search),
            "5" | "tenure" | "average" => Some(Self::Tenure),
            "6" | "headcount" | "number" => Some(Self::Headcount),
            "7" | "department" | "stats" => Some(Self::Department),
            "8" | "exit" | "quit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive session over one service and one pair of streams.
pub struct Shell<R, I, O>
where
    R: EmployeeRepository,
    I: BufRead,
    O: Write,
{
    service: EmployeeService<R>,
    input: I,
    output: O,
    as_of: NaiveDate,
}

impl<R, I, O> Shell<R, I, O>
where
    R: EmployeeRepository,
    I: BufRead,
    O: Write,
{
    /// `as_of` is the date tenure reports measure current staff against.
    pub fn new(service: EmployeeService<R>, input: I, output: O, as_of: NaiveDate) -> Self {
        Self {
            service,
            input,
            output,
            as_of,
        }
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> ShellResult<()> {
        loop {
            let Some(line) = self.prompt(MAIN_MENU)? else {
                break;
            };
            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Invalid option.")?;
                continue;
            };

            let outcome = match choice {
                MenuChoice::Add => self.add_employees()?,
                MenuChoice::Delete => self.delete_employee()?,
                MenuChoice::Update => self.update_employee()?,
                MenuChoice::Search => self.search()?,
                MenuChoice::Tenure => self.tenure_report(),
                MenuChoice::Headcount => self.headcount_report(),
                MenuChoice::Department => self.department_report(),
                MenuChoice::Exit => break,
            };
            self.report_outcome(outcome)?;
        }

        writeln!(self.output, "Thank you, goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn report_outcome(&mut self, outcome: StoreResult<String>) -> ShellResult<()> {
        match outcome {
            Ok(text) => write!(self.output, "{text}")?,
            Err(err) if err.is_fatal() => return Err(ShellError::Store(err)),
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }

    fn add_employees(&mut self) -> ShellResult<StoreResult<String>> {
        loop {
            let Some(employee) = self.read_new_employee()? else {
                return Ok(Ok(String::new()));
            };
            match self.service.add_employee(&employee) {
                Ok(id) => writeln!(
                    self.output,
                    "{} was added to our list of employees! (id {id})",
                    employee.full_name
                )?,
                Err(err) if err.is_fatal() => return Ok(Err(err)),
                Err(err) => writeln!(self.output, "Error: {err}")?,
            }

            let again = self
                .prompt("Would you like to add another employee? (yes/no): ")?
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !matches!(again.as_str(), "yes" | "y" | "1") {
                return Ok(Ok("Finished adding employees.\n".to_string()));
            }
        }
    }

    fn read_new_employee(&mut self) -> ShellResult<Option<NewEmployee>> {
        let Some(full_name) = self.prompt("Enter full name: ")? else {
            return Ok(None);
        };
        let Some(address) = self.prompt("Enter address: ")? else {
            return Ok(None);
        };
        let Some(phone_number) = self.prompt("Enter phone number: ")? else {
            return Ok(None);
        };
        let Some(email) = self.prompt("Enter email: ")? else {
            return Ok(None);
        };
        let Some(department) = self.prompt("Enter department (blank for none): ")? else {
            return Ok(None);
        };
        let Some(entry_date) = self.prompt_date("Enter entry date (YYYY-MM-DD): ")? else {
            return Ok(None);
        };
        let Some(departure_date) =
            self.prompt_optional_date("Enter departure date (YYYY-MM-DD, blank if current): ")?
        else {
            return Ok(None);
        };

        Ok(Some(NewEmployee {
            full_name,
            address,
            phone_number,
            email,
            department: non_blank(department),
            entry_date,
            departure_date,
        }))
    }

    fn delete_employee(&mut self) -> ShellResult<StoreResult<String>> {
        let Some(id) = self.prompt_id("Enter employee ID: ")? else {
            return Ok(Ok(String::new()));
        };
        Ok(self
            .service
            .delete_employee(id)
            .map(|()| format!("Employee ID {id} was deleted!\n")))
    }

    fn update_employee(&mut self) -> ShellResult<StoreResult<String>> {
        let Some(id) = self.prompt_id("Enter the employee's ID: ")? else {
            return Ok(Ok(String::new()));
        };
        let Some(choice) = self.prompt(UPDATE_MENU)? else {
            return Ok(Ok(String::new()));
        };

        let update = match choice.trim().to_ascii_lowercase().as_str() {
            "1" | "email" => self.prompt("Enter new email: ")?.map(FieldUpdate::Email),
            "2" | "address" => self.prompt("Enter new address: ")?.map(FieldUpdate::Address),
            "3" | "phone" | "phone number" => self
                .prompt("Enter new phone number: ")?
                .map(FieldUpdate::PhoneNumber),
            "4" | "department" => self
                .prompt("Enter new department (blank for none): ")?
                .map(|value| FieldUpdate::Department(non_blank(value))),
            "5" | "departure" | "departure date" => self
                .prompt_optional_date("Enter departure date (YYYY-MM-DD, blank to clear): ")?
                .map(FieldUpdate::DepartureDate),
            "6" | "none" => {
                return Ok(Ok("Nothing changed.\n".to_string()));
            }
            _ => return Ok(Ok("Invalid option.\n".to_string())),
        };

        let Some(update) = update else {
            return Ok(Ok(String::new()));
        };
        Ok(self
            .service
            .update_field(id, &update)
            .map(|()| format!("Employee ID {id}: {} updated.\n", update.column())))
    }

    fn search(&mut self) -> ShellResult<StoreResult<String>> {
        let Some(choice) = self.prompt(SEARCH_MENU)? else {
            return Ok(Ok(String::new()));
        };
        let filter = match choice.trim().to_ascii_lowercase().as_str() {
            "" | "1" | "all" => EmployeeFilter::default(),
            "2" | "current" => EmployeeFilter::with_status(EmploymentStatus::Current),
            "3" | "former" => EmployeeFilter::with_status(EmploymentStatus::Former),
            "4" | "department" => match self.prompt("Department: ")? {
                Some(value) => EmployeeFilter::with_department(value.trim()),
                None => return Ok(Ok(String::new())),
            },
            "5" | "name" => match self.prompt("Name contains: ")? {
                Some(value) => EmployeeFilter::with_name(value.trim()),
                None => return Ok(Ok(String::new())),
            },
            _ => return Ok(Ok("Invalid option.\n".to_string())),
        };

        Ok(self
            .service
            .search(&filter)
            .map(|employees| render_employee_table(&employees)))
    }

    fn tenure_report(&mut self) -> StoreResult<String> {
        self.service
            .tenure_report(self.as_of)
            .map(|report| render_tenure_report(&report))
    }

    fn headcount_report(&mut self) -> StoreResult<String> {
        self.service
            .headcount_report()
            .map(|summary| render_headcount(&summary))
    }

    fn department_report(&mut self) -> StoreResult<String> {
        self.service
            .department_report()
            .map(|summary| render_department_report(&summary))
    }

    /// Prints `label` and reads one line; `None` on end of input.
    fn prompt(&mut self, label: &str) -> ShellResult<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_id(&mut self, label: &str) -> ShellResult<Option<EmployeeId>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match line.trim().parse::<EmployeeId>() {
                Ok(id) if id > 0 => return Ok(Some(id)),
                _ => writeln!(self.output, "Invalid ID.")?,
            }
        }
    }

    fn prompt_date(&mut self, label: &str) -> ShellResult<Option<NaiveDate>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse_date(&line) {
                Some(date) => return Ok(Some(date)),
                None => writeln!(self.output, "Invalid date, expected YYYY-MM-DD.")?,
            }
        }
    }

    /// Outer `None` is end of input; inner `None` is a blank answer.
    fn prompt_optional_date(&mut self, label: &str) -> ShellResult<Option<Option<NaiveDate>>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                return Ok(Some(None));
            }
            match parse_date(&line) {
                Some(date) => return Ok(Some(Some(date))),
                None => writeln!(self.output, "Invalid date, expected YYYY-MM-DD.")?,
            }
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn render_employee_table(employees: &[Employee]) -> String {
    use std::fmt::Write as _;

    if employees.is_empty() {
        return "No employees matched.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<25} {:<30} {:<15} {:<20} {:<10} {:<10}",
        "ID", "Name", "Email", "Phone", "Department", "Entry", "Departure"
    );
    let _ = writeln!(out, "{}", "-".repeat(121));
    for employee in employees {
        let departure = employee
            .departure_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<5} {:<25} {:<30} {:<15} {:<20} {:<10} {:<10}",
            employee.id,
            employee.full_name,
            employee.email,
            employee.phone_number,
            employee.department.as_deref().unwrap_or("-"),
            employee.entry_date,
            departure
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{MenuChoice, Shell};
    use chrono::NaiveDate;
    use staffbook_core::db::open_db_in_memory;
    use staffbook_core::{EmployeeService, SqliteEmployeeRepository};
    use std::io::Cursor;

    fn run_script(conn: &rusqlite::Connection, script: &str) -> String {
        let service = EmployeeService::new(SqliteEmployeeRepository::try_new(conn).unwrap());
        let mut output = Vec::new();
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Shell::new(service, Cursor::new(script.to_string()), &mut output, as_of)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    const ADD_ADA: &str = "1\nAda Lovelace\n12 Square\n555-0100\nada@example.com\nEngineering\n\
2020-01-01\n2021-02-05\nno\n";

    #[test]
    fn menu_accepts_numbers_and_keywords() {
        assert_eq!(MenuChoice::parse(" 7 "), Some(MenuChoice::Department));
        assert_eq!(MenuChoice::parse("EXIT"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("9"), None);
    }

    #[test]
    fn add_then_reports() {
        let conn = open_db_in_memory().unwrap();
        let script = format!("{ADD_ADA}5\n6\n7\n8\n");
        let output = run_script(&conn, &script);

        assert!(output.contains("Ada Lovelace was added to our list of employees! (id 1)"));
        assert!(output.contains("#1 Ada Lovelace: 1 years, 1 months, 4 days (1.10 years)"));
        assert!(output.contains("Former employees: 1 (100.0%)"));
        assert!(output.contains("TOTAL                     1          100.0%"));
        assert!(output.ends_with("Thank you, goodbye!\n"));
    }

    #[test]
    fn bad_input_reprompts_without_touching_the_store() {
        let conn = open_db_in_memory().unwrap();
        let script = "banana\n2\nabc\n-3\n99\n1\nBob\nx\ny\nbob@example.com\n\n\
not-a-date\n2022-02-02\n\nno\n4\n1\nexit\n";
        let output = run_script(&conn, script);

        assert!(output.contains("Invalid option."));
        assert_eq!(output.matches("Invalid ID.").count(), 2);
        assert!(output.contains("Error: employee not found: 99"));
        assert!(output.contains("Invalid date, expected YYYY-MM-DD."));
        assert!(output.contains("Bob was added"));
        assert!(output.contains("bob@example.com"));
    }

    #[test]
    fn store_errors_are_reported_and_loop_continues() {
        let conn = open_db_in_memory().unwrap();
        let duplicate = ADD_ADA.replace("Ada Lovelace", "Ada Clone");
        let script = format!("{ADD_ADA}{duplicate}3\n1\n1\nnot-an-email\n6\n");
        let output = run_script(&conn, &script);

        assert!(output.contains("Error: an employee with email `ada@example.com` already exists"));
        assert!(output.contains("Error: invalid email address `not-an-email`"));
        assert!(output.contains("Total employees in database: 1"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let conn = open_db_in_memory().unwrap();
        let output = run_script(&conn, "6\n");
        assert!(output.contains("Total employees in database: 0"));
        assert!(output.ends_with("Thank you, goodbye!\n"));
    }
}
