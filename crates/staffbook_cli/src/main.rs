//! Interactive employee record manager.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Own the database connection for the lifetime of the menu loop.
//! - Map shell outcomes to the process exit status.

mod shell;

use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{error, info};
use staffbook_core::db::open_db;
use staffbook_core::{
    default_log_level, init_logging, EmployeeService, LogLevel, SqliteEmployeeRepository,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "staffbook",
    about = "Manage employee records and print tenure, headcount and department reports",
    version
)]
struct Cli {
    /// SQLite database file; created on first use
    #[arg(long, env = "STAFFBOOK_DB", default_value = "employees.db")]
    db: PathBuf,
    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "STAFFBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, env = "STAFFBOOK_LOG_LEVEL", default_value_t = default_log_level())]
    log_level: LogLevel,
    /// Fixed "today" for tenure reports (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let started = std::path::absolute(log_dir)
            .map_err(|err| err.to_string())
            .and_then(|dir| init_logging(cli.log_level, &dir).map_err(|err| err.to_string()));
        if let Err(message) = started {
            eprintln!("warning: logging disabled: {message}");
        }
    }

    let conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Error: cannot open `{}`: {err}", cli.db.display());
            return ExitCode::FAILURE;
        }
    };

    let repo = match SqliteEmployeeRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    let stdin = io::stdin();
    let mut shell = shell::Shell::new(
        EmployeeService::new(repo),
        stdin.lock(),
        io::stdout().lock(),
        as_of,
    );

    match shell.run() {
        Ok(()) => {
            info!("event=app_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
