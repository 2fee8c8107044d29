use crate::domain::{Task, TaskStatus};
use crate::report::calendar::WorkCalendar;
use chrono::NaiveTime;

/// Aggregate time figures for one day's tasks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMetrics {
    /// Sum of all estimates
    pub total_estimated: u32,
    /// Sum of all settled worked time
    pub total_actual: u32,
    /// Estimates of finished tasks
    pub achieved_work: u32,
    /// Unworked estimate of tasks still open
    pub remaining_work: u32,
    /// Work minutes left on the calendar
    pub remaining_minutes: u32,
    /// `remaining_work / remaining_minutes`, 1.0 once the day is over
    pub workload_ratio: f64,
    /// Full-day capacity the plan is measured against
    pub capacity_minutes: u32,
}

impl DayMetrics {
    /// Compute the metrics for `tasks` at local time `now`
    pub fn compute(tasks: &[Task], calendar: &WorkCalendar, now: NaiveTime) -> Self {
        let mut total_estimated = 0u32;
        let mut total_actual = 0u32;
        let mut achieved_work = 0u32;
        let mut remaining_work = 0u32;

        for task in tasks {
            total_estimated = total_estimated.saturating_add(task.estimated_minutes);
            total_actual = total_actual.saturating_add(task.actual_minutes);
            if task.status == TaskStatus::Done {
                achieved_work = achieved_work.saturating_add(task.estimated_minutes);
            } else if !task.status.is_closed() {
                remaining_work = remaining_work.saturating_add(task.remaining_minutes());
            }
        }

        let remaining_minutes = calendar.remaining_minutes(now);

        Self {
            total_estimated,
            total_actual,
            achieved_work,
            remaining_work,
            remaining_minutes,
            workload_ratio: workload_ratio(remaining_work, remaining_minutes),
            capacity_minutes: calendar.capacity_minutes(),
        }
    }

    /// Planned estimates against the day's capacity
    pub fn planned_ratio(&self) -> f64 {
        ratio(self.total_estimated, self.capacity_minutes)
    }

    /// Worked time against the day's capacity
    pub fn worked_ratio(&self) -> f64 {
        ratio(self.total_actual, self.capacity_minutes)
    }

    /// Finished estimates against everything planned
    pub fn achieved_ratio(&self) -> f64 {
        ratio(self.achieved_work, self.total_estimated)
    }
}

/// Remaining work over remaining time; saturates at 1.0 when no time is left
pub fn workload_ratio(remaining_work: u32, remaining_minutes: u32) -> f64 {
    if remaining_minutes > 0 {
        remaining_work as f64 / remaining_minutes as f64
    } else {
        1.0
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}

/// Totals for a past day ("yesterday" view)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySummary {
    pub task_count: usize,
    pub total_estimated: u32,
    pub total_actual: u32,
}

impl DaySummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            task_count: tasks.len(),
            total_estimated: tasks
                .iter()
                .fold(0u32, |sum, t| sum.saturating_add(t.estimated_minutes)),
            total_actual: tasks
                .iter()
                .fold(0u32, |sum, t| sum.saturating_add(t.actual_minutes)),
        }
    }

    /// Worked time as a percentage of the estimate
    pub fn actual_percent(&self) -> f64 {
        ratio(self.total_actual, self.total_estimated) * 100.0
    }
}
