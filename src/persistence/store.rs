use crate::domain::{day_key, Task, TaskError};
use crate::persistence::files::{atomic_write, read_optional};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::debug;

/// Day-keyed entries as stored on disk ("YYYY-MM-DD" -> ordered list)
pub type Buckets<T> = BTreeMap<String, Vec<T>>;

/// A JSON file holding one ordered list per calendar day.
///
/// Every save rewrites the whole file. There is no locking: two processes
/// saving at the same time race and the last writer wins.
#[derive(Debug, Clone)]
pub struct BucketFile<T> {
    path: PathBuf,
    _entry: PhantomData<T>,
}

/// Task buckets (tasks.json)
pub type TaskStore = BucketFile<Task>;

/// Note buckets (notes.json)
pub type NoteStore = BucketFile<String>;

impl<T> BucketFile<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entry: PhantomData,
        }
    }

    /// Load every day; a missing file is an empty mapping
    pub fn load_all(&self) -> Result<Buckets<T>, TaskError> {
        let content = read_optional(&self.path).map_err(|source| TaskError::Io {
            path: self.path.clone(),
            source,
        })?;

        let Some(content) = content else {
            return Ok(Buckets::new());
        };
        if content.trim().is_empty() {
            return Ok(Buckets::new());
        }

        serde_json::from_str(&content).map_err(|source| TaskError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save_all(&self, buckets: &Buckets<T>) -> Result<(), TaskError> {
        let json = serde_json::to_string_pretty(buckets).map_err(|source| TaskError::Parse {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &json).map_err(|source| TaskError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Entries for one day, empty if the day was never written
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<T>, TaskError> {
        let mut buckets = self.load_all()?;
        let entries = buckets.remove(&day_key(date)).unwrap_or_default();
        debug!(path = %self.path.display(), date = %date, count = entries.len(), "loaded day");
        Ok(entries)
    }

    /// Replace one day's entries, keeping all other days as they are
    pub fn save_day(&self, date: NaiveDate, entries: &[T]) -> Result<(), TaskError> {
        let mut buckets = self.load_all()?;
        buckets.insert(day_key(date), entries.to_vec());
        self.save_all(&buckets)?;
        debug!(path = %self.path.display(), date = %date, count = entries.len(), "saved day");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut running = Task::new("Review PR", 30).unwrap();
        running.status = TaskStatus::Started;
        running.started_at = 1_741_597_200;
        running.actual_minutes = 12;

        let mut done = Task::new("Standup", 15).unwrap();
        done.status = TaskStatus::Done;
        done.actual_minutes = 17;

        vec![Task::new("Write docs", 60).unwrap(), running, done]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = tempdir().unwrap();
        let store = TaskStore::new(temp_dir.path().join("tasks.json"));

        assert!(store.load_day(date(10)).unwrap().is_empty());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = tempdir().unwrap();
        let store = TaskStore::new(temp_dir.path().join("tasks.json"));
        let tasks = sample_tasks();

        store.save_day(date(10), &tasks).unwrap();
        assert_eq!(store.load_day(date(10)).unwrap(), tasks);
    }

    #[test]
    fn test_save_day_keeps_other_days() {
        let temp_dir = tempdir().unwrap();
        let store = TaskStore::new(temp_dir.path().join("tasks.json"));

        store.save_day(date(9), &sample_tasks()).unwrap();
        store.save_day(date(10), &[Task::new("Only", 5).unwrap()]).unwrap();

        assert_eq!(store.load_day(date(9)).unwrap().len(), 3);
        assert_eq!(store.load_day(date(10)).unwrap().len(), 1);

        let keys: Vec<String> = store.load_all().unwrap().into_keys().collect();
        assert_eq!(keys, vec!["2025-03-09".to_string(), "2025-03-10".to_string()]);
    }

    #[test]
    fn test_file_shape() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let store = TaskStore::new(&path);
        store.save_day(date(10), &[Task::new("Email", 15).unwrap()]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["2025-03-10"][0]["title"], "Email");
        assert_eq!(raw["2025-03-10"][0]["estimated"], 15);
        assert_eq!(raw["2025-03-10"][0]["status"], "pending");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = TaskStore::new(&path);
        assert!(matches!(store.load_day(date(10)), Err(TaskError::Parse { .. })));
    }

    #[test]
    fn test_unknown_status_in_file_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"{"2025-03-10":[{"title":"x","estimated":5,"actual":0,"status":"blocked","started_at":0}]}"#,
        )
        .unwrap();

        let store = TaskStore::new(&path);
        assert!(matches!(store.load_day(date(10)), Err(TaskError::Parse { .. })));
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let temp_dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as a file
        let path = temp_dir.path().join("tasks.json");
        std::fs::create_dir(&path).unwrap();

        let store = TaskStore::new(&path);
        assert!(matches!(store.load_day(date(10)), Err(TaskError::Io { .. })));
    }

    #[test]
    fn test_note_store_round_trip() {
        let temp_dir = tempdir().unwrap();
        let store = NoteStore::new(temp_dir.path().join("notes.json"));
        let notes = vec!["called the bank".to_string(), "ship v2 friday".to_string()];

        store.save_day(date(10), &notes).unwrap();
        assert_eq!(store.load_day(date(10)).unwrap(), notes);
        assert!(store.load_day(date(11)).unwrap().is_empty());
    }
}
