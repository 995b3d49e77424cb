//! Classroom CLI - log in and work with assignments from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and log in
//! classroom signup -u ms_frizzle -p hunter2 -r teacher
//! classroom login -u ms_frizzle -p hunter2
//!
//! # Teachers
//! classroom teacher create --title "Bus trip report" --description "One page." --due 2025-09-01T17:00
//! classroom teacher assignments
//! classroom teacher submissions <ASSIGNMENT_ID>
//!
//! # Students
//! classroom student assignments
//! classroom student submit <ASSIGNMENT_ID> --text "My report" --file report.pdf
//! classroom student submissions
//!
//! classroom whoami
//! classroom logout
//! ```
//!
//! # Environment Variables
//!
//! - `CLASSROOM_API_BASE_URL` - Backend API root
//! - `CLASSROOM_SESSION_FILE` - Where the session is kept between runs
//! - `CLASSROOM_PASSWORD` - Password for `login` and `signup` when `-p` is omitted
//! - `RUST_LOG` - Log filter (default: `warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use classroom_client::{ClassroomClient, ClientConfig, FileStore, Portal};
use classroom_core::{AssignmentId, Role};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "classroom")]
#[command(author, version, about = "Classroom assignment portal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "CLASSROOM_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role (`teacher`, `student`)
        #[arg(short, long)]
        role: Role,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "CLASSROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Teacher dashboard
    Teacher {
        #[command(subcommand)]
        action: TeacherAction,
    },
    /// Student dashboard
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },
}

#[derive(Subcommand)]
enum TeacherAction {
    /// List assignments you created
    Assignments,
    /// Create an assignment
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Due date, RFC 3339 or `YYYY-MM-DDTHH:MM` in local time
        #[arg(long, value_parser = display::parse_due_date)]
        due: DateTime<Utc>,
    },
    /// List submissions for one of your assignments
    Submissions { assignment_id: String },
}

#[derive(Subcommand)]
enum StudentAction {
    /// List available assignments
    Assignments,
    /// List your submissions
    Submissions,
    /// Submit work for an assignment
    Submit {
        assignment_id: String,

        #[arg(long)]
        text: String,

        /// File to attach
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        display::report(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let api = ClassroomClient::new(&config.api_base_url)?;
    let mut portal = Portal::new(FileStore::open(config.session_file), api);

    match cli.command {
        Commands::Signup {
            username,
            password,
            role,
        } => commands::auth::signup(&portal, username, password, role).await,
        Commands::Login { username, password } => {
            commands::auth::login(&mut portal, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&mut portal),
        Commands::Whoami => {
            commands::auth::whoami(&portal);
            Ok(())
        }
        Commands::Teacher { action } => match action {
            TeacherAction::Assignments => commands::teacher::assignments(&portal).await,
            TeacherAction::Create {
                title,
                description,
                due,
            } => commands::teacher::create(&portal, title, description, due).await,
            TeacherAction::Submissions { assignment_id } => {
                commands::teacher::submissions(&portal, &AssignmentId::new(assignment_id)).await
            }
        },
        Commands::Student { action } => match action {
            StudentAction::Assignments => commands::student::assignments(&portal).await,
            StudentAction::Submissions => commands::student::submissions(&portal).await,
            StudentAction::Submit {
                assignment_id,
                text,
                file,
            } => {
                commands::student::submit(
                    &portal,
                    &AssignmentId::new(assignment_id),
                    text,
                    file.as_deref(),
                )
                .await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_teacher_create() {
        let cli = Cli::try_parse_from([
            "classroom",
            "teacher",
            "create",
            "--title",
            "Bus trip report",
            "--description",
            "One page.",
            "--due",
            "2025-09-01T17:00:00Z",
        ])
        .unwrap();
        let Commands::Teacher {
            action: TeacherAction::Create { title, due, .. },
        } = cli.command
        else {
            panic!("expected teacher create");
        };
        assert_eq!(title, "Bus trip report");
        assert_eq!(due.to_rfc3339(), "2025-09-01T17:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        let result = Cli::try_parse_from([
            "classroom", "signup", "-u", "x", "-p", "y", "-r", "principal",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_submit_with_file() {
        let cli = Cli::try_parse_from([
            "classroom",
            "student",
            "submit",
            "a1",
            "--text",
            "done",
            "--file",
            "report.pdf",
        ])
        .unwrap();
        let Commands::Student {
            action: StudentAction::Submit { file, .. },
        } = cli.command
        else {
            panic!("expected student submit");
        };
        assert_eq!(file, Some(PathBuf::from("report.pdf")));
    }
}
