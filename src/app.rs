use crate::domain::{
    Created, DayPlan, NextTask, Task, TaskEdit, TaskError, TaskStatus, TransitionOutcome,
};
use crate::persistence::{NoteStore, TaskStore};
use crate::report::{DayMetrics, WorkCalendar};
use chrono::{DateTime, Local, NaiveDate};
use tracing::debug;

/// Date-addressed operations over the task and note stores.
///
/// Each call loads the day, runs one engine operation and writes the day
/// back only if something changed.
#[derive(Debug, Clone)]
pub struct Tracker {
    tasks: TaskStore,
    notes: NoteStore,
    calendar: WorkCalendar,
}

impl Tracker {
    pub fn new(tasks: TaskStore, notes: NoteStore, calendar: WorkCalendar) -> Self {
        Self {
            tasks,
            notes,
            calendar,
        }
    }

    fn load_plan(&self, date: NaiveDate) -> Result<DayPlan, TaskError> {
        Ok(DayPlan::new(date, self.tasks.load_day(date)?))
    }

    fn save_plan(&self, plan: &DayPlan) -> Result<(), TaskError> {
        self.tasks.save_day(plan.date(), plan.tasks())
    }

    pub fn create_task(
        &self,
        date: NaiveDate,
        title: &str,
        estimated_minutes: i64,
    ) -> Result<Created, TaskError> {
        let mut plan = self.load_plan(date)?;
        let created = plan.create(title, estimated_minutes, self.calendar.capacity_minutes())?;
        self.save_plan(&plan)?;
        Ok(created)
    }

    pub fn list_tasks(&self, date: NaiveDate) -> Result<Vec<Task>, TaskError> {
        self.tasks.load_day(date)
    }

    pub fn transition(
        &self,
        date: NaiveDate,
        index: usize,
        status: TaskStatus,
        now: DateTime<Local>,
    ) -> Result<TransitionOutcome, TaskError> {
        let mut plan = self.load_plan(date)?;
        let outcome = plan.transition(index, status, now)?;
        if let TransitionOutcome::Applied { .. } = outcome {
            self.save_plan(&plan)?;
        }
        Ok(outcome)
    }

    pub fn delete_task(&self, date: NaiveDate, index: usize) -> Result<Task, TaskError> {
        let mut plan = self.load_plan(date)?;
        let removed = plan.delete(index)?;
        self.save_plan(&plan)?;
        Ok(removed)
    }

    pub fn edit_task(
        &self,
        date: NaiveDate,
        index: usize,
        edit: &TaskEdit,
    ) -> Result<Task, TaskError> {
        let mut plan = self.load_plan(date)?;
        let edited = plan.edit(index, edit)?;
        self.save_plan(&plan)?;
        Ok(edited)
    }

    /// Next pending task to start; never mutates
    pub fn start_next(&self, date: NaiveDate) -> Result<NextTask, TaskError> {
        Ok(self.load_plan(date)?.start_next())
    }

    pub fn current(&self, date: NaiveDate) -> Result<Option<(usize, Task)>, TaskError> {
        let plan = self.load_plan(date)?;
        Ok(plan.find_started().map(|(index, task)| (index, task.clone())))
    }

    /// Move the running task to `status` (finish = done, stop = pending).
    /// `None` when no task is running.
    pub fn settle_current(
        &self,
        date: NaiveDate,
        status: TaskStatus,
        now: DateTime<Local>,
    ) -> Result<Option<(usize, TransitionOutcome)>, TaskError> {
        let mut plan = self.load_plan(date)?;
        let Some((index, _)) = plan.find_started() else {
            debug!(date = %date, "no running task");
            return Ok(None);
        };
        let outcome = plan.transition(index, status, now)?;
        self.save_plan(&plan)?;
        Ok(Some((index, outcome)))
    }

    pub fn compute_metrics(
        &self,
        date: NaiveDate,
        now: DateTime<Local>,
    ) -> Result<DayMetrics, TaskError> {
        let tasks = self.tasks.load_day(date)?;
        Ok(DayMetrics::compute(&tasks, &self.calendar, now.time()))
    }

    pub fn notes(&self, date: NaiveDate) -> Result<Vec<String>, TaskError> {
        self.notes.load_day(date)
    }

    pub fn add_note(&self, date: NaiveDate, note: &str) -> Result<(), TaskError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(TaskError::validation("note must not be empty"));
        }
        let mut notes = self.notes.load_day(date)?;
        notes.push(note.to_string());
        self.notes.save_day(date, &notes)
    }

    pub fn replace_notes(&self, date: NaiveDate, notes: &[String]) -> Result<(), TaskError> {
        self.notes.save_day(date, notes)
    }
}
