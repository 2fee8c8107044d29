mod app;
mod commands;
mod domain;
mod logging;
mod persistence;
mod report;
mod ui;

use anyhow::{Context, Result};
use app::Tracker;
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use domain::{TaskEdit, TaskStatus};
use persistence::{
    init_local_data_dir, load_settings, resolve_data_dir, NoteStore, TaskStore, CONFIG_FILE,
    NOTES_FILE, TASKS_FILE,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "daily")]
#[command(about = "Daily task planner with time tracking", long_about = None)]
struct Cli {
    /// Storage directory. Defaults to the nearest .daily directory, then ~/.daily
    #[arg(long, global = true, env = "DAILY_DIR")]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .daily directory in the current directory
    Init,
    /// Add a new task
    Add {
        title: String,
        /// Estimated minutes
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
        /// Plan the task for tomorrow instead of today
        #[arg(short, long)]
        tomorrow: bool,
    },
    /// List tasks with daily progress
    Ls {
        /// List tomorrow's tasks
        #[arg(short, long)]
        tomorrow: bool,
    },
    /// Set the status of a task (pending, started, done, cancelled)
    Status { index: usize, status: TaskStatus },
    /// Edit a task's title, estimate or worked minutes
    Edit {
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        estimate: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        actual: Option<i64>,
    },
    /// Start the next pending task
    Next {
        /// Only show the candidate, don't start it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the currently active task
    Current,
    /// Mark the current task as done
    Finish,
    /// Stop the current task (back to pending)
    Stop,
    /// Delete a task
    Delete { index: usize },
    /// Follow progress of the current task
    Follow,
    /// Show tasks from yesterday
    Yesterday,
    /// Show or add notes for today
    #[command(args_conflicts_with_subcommands = true)]
    Note {
        #[command(subcommand)]
        action: Option<NoteAction>,
        /// Note text to add for today
        text: Vec<String>,
    },
}

#[derive(Subcommand)]
enum NoteAction {
    /// Edit a day's notes in an editor (YYYY-MM-DD, defaults to today)
    Edit { date: Option<String> },
    /// Edit yesterday's notes in an editor
    EditYesterday,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::enable_logging(cli.verbose)?;

    if let Commands::Init = cli.command {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&current_dir)?;
        println!("Initialized daily directory: {}", data_dir.display());
        return Ok(());
    }

    let data_dir = resolve_data_dir(cli.data_dir)?;
    debug!(data_dir = %data_dir.display(), "using data directory");

    let settings = load_settings(&data_dir.join(CONFIG_FILE))?;
    let tracker = Tracker::new(
        TaskStore::new(data_dir.join(TASKS_FILE)),
        NoteStore::new(data_dir.join(NOTES_FILE)),
        settings.calendar,
    );

    let now = Local::now();
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);
    let yesterday = today - Duration::days(1);

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Add {
            title,
            minutes,
            tomorrow: for_tomorrow,
        } => {
            let date = if for_tomorrow { tomorrow } else { today };
            commands::add(&tracker, date, &title, minutes)
        }
        Commands::Ls { tomorrow: true } => commands::list(&tracker, tomorrow, now, false),
        Commands::Ls { tomorrow: false } => commands::list(&tracker, today, now, true),
        Commands::Status { index, status } => {
            commands::set_status(&tracker, today, index, status, now)
        }
        Commands::Edit {
            index,
            title,
            estimate,
            actual,
        } => {
            let edit = TaskEdit {
                title,
                estimated_minutes: estimate,
                actual_minutes: actual,
            };
            commands::edit(&tracker, today, index, &edit)
        }
        Commands::Next { dry_run } => commands::next(&tracker, today, now, dry_run),
        Commands::Current => commands::current(&tracker, today, now),
        Commands::Finish => commands::settle_current(&tracker, today, TaskStatus::Done, now),
        Commands::Stop => commands::settle_current(&tracker, today, TaskStatus::Pending, now),
        Commands::Delete { index } => commands::delete(&tracker, today, index),
        Commands::Follow => commands::follow(&tracker, today),
        Commands::Yesterday => commands::yesterday(&tracker, yesterday),
        Commands::Note { action, text } => match action {
            Some(NoteAction::Edit { date }) => {
                let date = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);
                commands::edit_notes(&tracker, date, &settings.editor_command())
            }
            Some(NoteAction::EditYesterday) => {
                commands::edit_notes(&tracker, yesterday, &settings.editor_command())
            }
            None if text.is_empty() => commands::show_notes(&tracker, today),
            None => commands::add_note(&tracker, today, &text.join(" ")),
        },
    }
}
