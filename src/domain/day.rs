use super::enums::TaskStatus;
use super::error::TaskError;
use super::task::{validate_actual, validate_estimate, validate_title, Task};
use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info, warn};

/// Date key format used for day buckets
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a date as a day bucket key (YYYY-MM-DD)
pub fn day_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// The running task of a day, reported when a start is refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTask {
    pub index: usize,
    pub title: String,
}

/// Summed estimates went over the daily capacity (advisory only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow {
    pub planned_minutes: u32,
    pub capacity_minutes: u32,
}

/// Result of adding a task to a day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub index: usize,
    pub task: Task,
    pub overflow: Option<CapacityOverflow>,
}

/// Result of a status transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task was updated; `settled_minutes` were added to its actual time
    Applied { task: Task, settled_minutes: u32 },
    /// Another task is running, nothing was changed
    AlreadyRunning(RunningTask),
}

/// Result of looking for the next task to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTask {
    Candidate { index: usize, task: Task },
    AlreadyRunning(RunningTask),
    NothingToStart,
}

/// Field changes for an explicit edit; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub actual_minutes: Option<i64>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.estimated_minutes.is_none() && self.actual_minutes.is_none()
    }
}

/// The ordered task list of one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    date: NaiveDate,
    tasks: Vec<Task>,
}

impl DayPlan {
    pub fn new(date: NaiveDate, tasks: Vec<Task>) -> Self {
        Self { date, tasks }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Result<&Task, TaskError> {
        let len = self.tasks.len();
        self.tasks.get(index).ok_or(TaskError::Index { index, len })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Task, TaskError> {
        let len = self.tasks.len();
        self.tasks.get_mut(index).ok_or(TaskError::Index { index, len })
    }

    /// Sum of all estimates in the day
    pub fn planned_minutes(&self) -> u32 {
        self.tasks
            .iter()
            .fold(0u32, |sum, t| sum.saturating_add(t.estimated_minutes))
    }

    /// Append a new pending task. Going over `capacity_minutes` is reported, not refused.
    pub fn create(
        &mut self,
        title: &str,
        estimated_minutes: i64,
        capacity_minutes: u32,
    ) -> Result<Created, TaskError> {
        let task = Task::new(title, estimated_minutes)?;

        let planned_minutes = self.planned_minutes().saturating_add(task.estimated_minutes);
        let overflow = if planned_minutes > capacity_minutes {
            warn!(
                date = %self.date,
                planned_minutes,
                capacity_minutes,
                "planned time exceeds the daily capacity"
            );
            Some(CapacityOverflow {
                planned_minutes,
                capacity_minutes,
            })
        } else {
            None
        };

        self.tasks.push(task.clone());
        let index = self.tasks.len() - 1;
        info!(date = %self.date, index, title = %task.title, "task created");

        Ok(Created {
            index,
            task,
            overflow,
        })
    }

    /// The single started task of the day, if any
    pub fn find_started(&self) -> Option<(usize, &Task)> {
        self.tasks.iter().enumerate().find(|(_, t)| t.is_running())
    }

    /// Change a task's status, settling running time when it leaves `started`.
    /// Starting is refused while a different task is running.
    pub fn transition(
        &mut self,
        index: usize,
        status: TaskStatus,
        now: DateTime<Local>,
    ) -> Result<TransitionOutcome, TaskError> {
        self.get(index)?;

        if status == TaskStatus::Started {
            if let Some((running_index, running)) = self.find_started() {
                if running_index != index {
                    debug!(
                        date = %self.date,
                        index,
                        running_index,
                        "start refused, another task is running"
                    );
                    return Ok(TransitionOutcome::AlreadyRunning(RunningTask {
                        index: running_index,
                        title: running.title.clone(),
                    }));
                }
            }
        }

        let task = self.get_mut(index)?;
        let from = task.status;
        let settled_minutes = task.apply_status(status, now);
        debug!(
            index,
            from = %from,
            to = %status,
            settled_minutes,
            actual_minutes = task.actual_minutes,
            "task transitioned"
        );

        Ok(TransitionOutcome::Applied {
            task: task.clone(),
            settled_minutes,
        })
    }

    /// First pending task in order, unless some task is already running
    pub fn start_next(&self) -> NextTask {
        if let Some((index, running)) = self.find_started() {
            return NextTask::AlreadyRunning(RunningTask {
                index,
                title: running.title.clone(),
            });
        }

        self.tasks
            .iter()
            .enumerate()
            .find(|(_, t)| t.status == TaskStatus::Pending)
            .map(|(index, task)| NextTask::Candidate {
                index,
                task: task.clone(),
            })
            .unwrap_or(NextTask::NothingToStart)
    }

    /// Remove a task; later tasks shift down by one.
    /// A running task's unsettled time is dropped with it.
    pub fn delete(&mut self, index: usize) -> Result<Task, TaskError> {
        self.get(index)?;
        let removed = self.tasks.remove(index);
        info!(
            date = %self.date,
            index,
            title = %removed.title,
            running = removed.is_running(),
            "task deleted"
        );
        Ok(removed)
    }

    /// Overwrite title/estimate/actual directly. This is the only path that
    /// may lower `actual_minutes`; the running timer is left untouched.
    pub fn edit(&mut self, index: usize, edit: &TaskEdit) -> Result<Task, TaskError> {
        let title = edit.title.as_deref().map(validate_title).transpose()?;
        let estimated = edit.estimated_minutes.map(validate_estimate).transpose()?;
        let actual = edit.actual_minutes.map(validate_actual).transpose()?;

        let task = self.get_mut(index)?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(estimated) = estimated {
            task.estimated_minutes = estimated;
        }
        if let Some(actual) = actual {
            task.actual_minutes = actual;
        }
        debug!(index, title = %task.title, "task edited");
        Ok(task.clone())
    }
}
