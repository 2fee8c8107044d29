use crate::app::Tracker;
use crate::domain::{
    CapacityOverflow, NextTask, RunningTask, Task, TaskEdit, TaskStatus, TransitionOutcome,
};
use crate::report::{DayMetrics, DaySummary};
use crate::ui::{load_band, progress_band, render_bar, run_follow, BAR_WIDTH};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const NO_RUNNING_TASK: &str = "No task is currently started.";

fn print_task_line(index: usize, task: &Task) {
    println!(
        "[{}] {} ({}, est: {}min, act: {}min)",
        index, task.title, task.status, task.estimated_minutes, task.actual_minutes
    );
}

fn print_already_running(running: &RunningTask) {
    println!(
        "A task is already started: [{}] {}. Please finish it before starting another one.",
        running.index, running.title
    );
}

fn print_overflow(overflow: &CapacityOverflow) {
    println!(
        "Warning: total estimated time ({} min) exceeds the daily capacity of {} min.",
        overflow.planned_minutes, overflow.capacity_minutes
    );
}

pub fn add(tracker: &Tracker, date: NaiveDate, title: &str, minutes: i64) -> Result<()> {
    let created = tracker.create_task(date, title, minutes)?;
    if let Some(overflow) = &created.overflow {
        print_overflow(overflow);
    }
    println!(
        "Added [{}] {} ({} min) for {}",
        created.index, created.task.title, created.task.estimated_minutes, date
    );
    Ok(())
}

/// List a day's tasks. `with_progress` adds the worked/achieved/remaining bars.
pub fn list(tracker: &Tracker, date: NaiveDate, now: DateTime<Local>, with_progress: bool) -> Result<()> {
    let tasks = tracker.list_tasks(date)?;
    if tasks.is_empty() {
        println!("No tasks available.");
        return Ok(());
    }

    let metrics = tracker.compute_metrics(date, now)?;
    print_metrics(&metrics, with_progress);

    for (index, task) in tasks.iter().enumerate() {
        print_task_line(index, task);
    }
    Ok(())
}

fn print_metrics(metrics: &DayMetrics, with_progress: bool) {
    let planned = metrics.planned_ratio();
    println!(
        "Daily Plan:     {} [{}/{} min planned]\n",
        render_bar(planned, load_band(planned), BAR_WIDTH),
        metrics.total_estimated,
        metrics.capacity_minutes
    );
    if !with_progress {
        return;
    }

    let worked = metrics.worked_ratio();
    println!(
        "Daily Worked:   {} [{}/{} min worked]\n",
        render_bar(worked, progress_band(worked), BAR_WIDTH),
        metrics.total_actual,
        metrics.capacity_minutes
    );

    let achieved = metrics.achieved_ratio();
    println!(
        "Daily Achieved: {} [{}/{} min achieved]\n",
        render_bar(achieved, progress_band(achieved), BAR_WIDTH),
        metrics.achieved_work,
        metrics.total_estimated
    );

    let load = metrics.workload_ratio;
    println!(
        "Remaining Work vs Time Left: {} [{} min left vs {} min to do]\n",
        render_bar(load, load_band(load), BAR_WIDTH),
        metrics.remaining_minutes,
        metrics.remaining_work
    );
}

pub fn set_status(
    tracker: &Tracker,
    date: NaiveDate,
    index: usize,
    status: TaskStatus,
    now: DateTime<Local>,
) -> Result<()> {
    match tracker.transition(date, index, status, now)? {
        TransitionOutcome::Applied {
            task,
            settled_minutes,
        } => {
            println!("[{}] {} is now {}", index, task.title, task.status);
            if settled_minutes > 0 {
                println!("Logged {} min (total {} min)", settled_minutes, task.actual_minutes);
            }
        }
        TransitionOutcome::AlreadyRunning(running) => print_already_running(&running),
    }
    Ok(())
}

pub fn edit(tracker: &Tracker, date: NaiveDate, index: usize, edit: &TaskEdit) -> Result<()> {
    if edit.is_empty() {
        anyhow::bail!("nothing to edit: pass --title, --estimate or --actual");
    }
    let task = tracker.edit_task(date, index, edit)?;
    print_task_line(index, &task);
    Ok(())
}

pub fn next(tracker: &Tracker, date: NaiveDate, now: DateTime<Local>, dry_run: bool) -> Result<()> {
    match tracker.start_next(date)? {
        NextTask::AlreadyRunning(running) => print_already_running(&running),
        NextTask::NothingToStart => println!("No pending tasks to start."),
        NextTask::Candidate { index, task } if dry_run => {
            println!("Next Task: [{}] {} ({} min)", index, task.title, task.estimated_minutes);
        }
        NextTask::Candidate { index, task } => {
            println!("Starting '{}'...", task.title);
            set_status(tracker, date, index, TaskStatus::Started, now)?;
        }
    }
    Ok(())
}

pub fn current(tracker: &Tracker, date: NaiveDate, now: DateTime<Local>) -> Result<()> {
    let Some((index, task)) = tracker.current(date)? else {
        println!("{}", NO_RUNNING_TASK);
        return Ok(());
    };

    let elapsed = task.elapsed_minutes(now);
    let clock = elapsed as f64 / task.estimated_minutes.max(1) as f64;
    println!(
        "Task Clock: {} [{}/{} min used]\n",
        render_bar(clock, load_band(clock), BAR_WIDTH),
        elapsed,
        task.estimated_minutes
    );
    println!("Current task: [{}] {} - started {}min ago", index, task.title, elapsed);
    Ok(())
}

/// Finish (done) or stop (pending) the running task
pub fn settle_current(
    tracker: &Tracker,
    date: NaiveDate,
    status: TaskStatus,
    now: DateTime<Local>,
) -> Result<()> {
    match tracker.settle_current(date, status, now)? {
        Some((index, TransitionOutcome::Applied { task, settled_minutes })) => {
            println!(
                "[{}] {} is now {} (+{} min, total {} min)",
                index, task.title, task.status, settled_minutes, task.actual_minutes
            );
        }
        Some((_, TransitionOutcome::AlreadyRunning(running))) => print_already_running(&running),
        None => println!("{}", NO_RUNNING_TASK),
    }
    Ok(())
}

pub fn delete(tracker: &Tracker, date: NaiveDate, index: usize) -> Result<()> {
    let removed = tracker.delete_task(date, index)?;
    println!("Deleted [{}] {}", index, removed.title);
    Ok(())
}

pub fn follow(tracker: &Tracker, date: NaiveDate) -> Result<()> {
    let Some((_, task)) = tracker.current(date)? else {
        println!("{}", NO_RUNNING_TASK);
        return Ok(());
    };
    run_follow(&task)
}

pub fn yesterday(tracker: &Tracker, date: NaiveDate) -> Result<()> {
    let tasks = tracker.list_tasks(date)?;
    if tasks.is_empty() {
        println!("No tasks found for yesterday.");
        return Ok(());
    }

    println!("Tasks from yesterday ({}):\n", date);
    for (index, task) in tasks.iter().enumerate() {
        println!("[{}] {}", index, task.title);
        println!("    Status: {}", task.status);
        println!("    Estimated: {} minutes", task.estimated_minutes);
        println!("    Actual: {} minutes", task.actual_minutes);
        if index + 1 < tasks.len() {
            println!();
        }
    }

    let summary = DaySummary::from_tasks(&tasks);
    println!(
        "\nSummary: {} tasks, {}/{} minutes ({:.1}%)",
        summary.task_count,
        summary.total_actual,
        summary.total_estimated,
        summary.actual_percent()
    );
    Ok(())
}

pub fn show_notes(tracker: &Tracker, date: NaiveDate) -> Result<()> {
    let notes = tracker.notes(date)?;
    if notes.is_empty() {
        println!("No notes for {}.", date);
        return Ok(());
    }
    println!("Notes for {}:", date);
    for (i, note) in notes.iter().enumerate() {
        println!("{}. {}", i + 1, note);
    }
    Ok(())
}

pub fn add_note(tracker: &Tracker, date: NaiveDate, text: &str) -> Result<()> {
    tracker.add_note(date, text)?;
    println!("Note added for {}.", date);
    Ok(())
}

/// Open the day's notes in `editor`; the edited non-empty lines replace them
pub fn edit_notes(tracker: &Tracker, date: NaiveDate, editor: &str) -> Result<()> {
    let notes = tracker.notes(date)?;

    let mut temp_file = NamedTempFile::new().context("Failed to create temporary notes file")?;
    for note in &notes {
        writeln!(temp_file, "{}", note)?;
    }
    let temp_path = temp_file.into_temp_path();

    let status = Command::new(editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;
    if !status.success() {
        anyhow::bail!("Editor '{}' exited with {}; notes unchanged", editor, status);
    }

    let content = fs::read_to_string(&temp_path).context("Failed to read edited notes")?;
    tracker.replace_notes(date, &parse_note_lines(&content))?;
    println!("Notes for {} updated.", date);
    Ok(())
}

/// Trimmed, non-empty lines of an edited notes buffer
pub fn parse_note_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
