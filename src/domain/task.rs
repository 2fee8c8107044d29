use super::enums::TaskStatus;
use super::error::TaskError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A unit of work scheduled for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    /// Planned duration in minutes
    #[serde(rename = "estimated")]
    pub estimated_minutes: u32,
    /// Worked minutes settled so far
    #[serde(rename = "actual")]
    pub actual_minutes: u32,
    pub status: TaskStatus,
    /// Unix timestamp of the latest transition into `started`, 0 when not running
    #[serde(rename = "started_at")]
    pub started_at: i64,
}

impl Task {
    /// Create a pending task, validating title and estimate
    pub fn new(title: &str, estimated_minutes: i64) -> Result<Self, TaskError> {
        Ok(Self {
            title: validate_title(title)?,
            estimated_minutes: validate_estimate(estimated_minutes)?,
            actual_minutes: 0,
            status: TaskStatus::Pending,
            started_at: 0,
        })
    }

    pub fn is_running(&self) -> bool {
        self.status == TaskStatus::Started
    }

    /// Whole minutes of the current running span; 0 unless started
    pub fn elapsed_minutes(&self, now: DateTime<Local>) -> u32 {
        if !self.is_running() || self.started_at == 0 {
            return 0;
        }
        whole_minutes_between(self.started_at, now.timestamp())
    }

    /// Move the running span into `actual_minutes` and clear the timer.
    /// Returns the settled minutes; a no-op when no span is open.
    pub fn settle(&mut self, now: DateTime<Local>) -> u32 {
        if self.started_at == 0 {
            return 0;
        }
        let minutes = whole_minutes_between(self.started_at, now.timestamp());
        self.actual_minutes = self.actual_minutes.saturating_add(minutes);
        self.started_at = 0;
        minutes
    }

    /// Apply the lifecycle rule for a move to `status`
    pub(crate) fn apply_status(&mut self, status: TaskStatus, now: DateTime<Local>) -> u32 {
        match status {
            TaskStatus::Started => {
                self.started_at = now.timestamp();
                self.status = TaskStatus::Started;
                0
            }
            TaskStatus::Pending | TaskStatus::Done | TaskStatus::Cancelled => {
                let settled = self.settle(now);
                self.status = status;
                settled
            }
        }
    }

    /// Remaining planned work: estimate minus worked time, never negative
    pub fn remaining_minutes(&self) -> u32 {
        self.estimated_minutes.saturating_sub(self.actual_minutes)
    }
}

/// Floor of the elapsed seconds in minutes; clock skew backwards counts as zero
fn whole_minutes_between(from: i64, to: i64) -> u32 {
    let minutes = (to - from).max(0) / 60;
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

pub(crate) fn validate_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::validation("task title must not be empty"));
    }
    Ok(title.to_string())
}

pub(crate) fn validate_estimate(minutes: i64) -> Result<u32, TaskError> {
    if minutes <= 0 {
        return Err(TaskError::validation(format!(
            "estimated minutes must be positive, got {}",
            minutes
        )));
    }
    u32::try_from(minutes)
        .map_err(|_| TaskError::validation(format!("estimated minutes too large: {}", minutes)))
}

pub(crate) fn validate_actual(minutes: i64) -> Result<u32, TaskError> {
    if minutes < 0 {
        return Err(TaskError::validation(format!(
            "actual minutes must not be negative, got {}",
            minutes
        )));
    }
    u32::try_from(minutes)
        .map_err(|_| TaskError::validation(format!("actual minutes too large: {}", minutes)))
}
