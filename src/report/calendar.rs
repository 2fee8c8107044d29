use crate::domain::TaskError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Working hours of a day: a morning and an afternoon session split by lunch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    #[serde(with = "hhmm")]
    pub work_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub lunch_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub lunch_end: NaiveTime,
    #[serde(with = "hhmm")]
    pub work_end: NaiveTime,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            work_start: hm(8, 30),
            lunch_start: hm(12, 30),
            lunch_end: hm(13, 30),
            work_end: hm(17, 30),
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn minutes_between(from: NaiveTime, to: NaiveTime) -> u32 {
    u32::try_from(to.signed_duration_since(from).num_minutes().max(0)).unwrap_or(0)
}

impl WorkCalendar {
    /// Check the four boundaries are in chronological order
    pub fn validate(&self) -> Result<(), TaskError> {
        let ordered = self.work_start <= self.lunch_start
            && self.lunch_start <= self.lunch_end
            && self.lunch_end <= self.work_end;
        if !ordered {
            return Err(TaskError::validation(format!(
                "work calendar out of order: {} / {}-{} / {}",
                self.work_start.format("%H:%M"),
                self.lunch_start.format("%H:%M"),
                self.lunch_end.format("%H:%M"),
                self.work_end.format("%H:%M"),
            )));
        }
        Ok(())
    }

    pub fn morning_minutes(&self) -> u32 {
        minutes_between(self.work_start, self.lunch_start)
    }

    pub fn afternoon_minutes(&self) -> u32 {
        minutes_between(self.lunch_end, self.work_end)
    }

    /// Productive minutes in a full day (480 with the default calendar)
    pub fn capacity_minutes(&self) -> u32 {
        self.morning_minutes() + self.afternoon_minutes()
    }

    /// Work minutes left in the day at local time `now`
    pub fn remaining_minutes(&self, now: NaiveTime) -> u32 {
        if now < self.work_start {
            return self.capacity_minutes();
        }
        if now > self.work_end {
            return 0;
        }

        if now < self.lunch_start {
            minutes_between(now, self.lunch_start) + self.afternoon_minutes()
        } else if now < self.lunch_end {
            self.afternoon_minutes()
        } else {
            minutes_between(now, self.work_end)
        }
    }
}

/// Serde helpers storing times as "HH:MM"
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_capacity() {
        let calendar = WorkCalendar::default();
        assert_eq!(calendar.morning_minutes(), 240);
        assert_eq!(calendar.afternoon_minutes(), 240);
        assert_eq!(calendar.capacity_minutes(), 480);
    }

    #[test]
    fn test_remaining_minutes_reference_points() {
        let calendar = WorkCalendar::default();
        assert_eq!(calendar.remaining_minutes(t(8, 0)), 480);
        assert_eq!(calendar.remaining_minutes(t(12, 0)), 270);
        assert_eq!(calendar.remaining_minutes(t(13, 0)), 240);
        assert_eq!(calendar.remaining_minutes(t(15, 0)), 150);
        assert_eq!(calendar.remaining_minutes(t(18, 0)), 0);
    }

    #[test]
    fn test_remaining_minutes_boundaries() {
        let calendar = WorkCalendar::default();
        assert_eq!(calendar.remaining_minutes(t(8, 30)), 480);
        assert_eq!(calendar.remaining_minutes(t(12, 30)), 240);
        assert_eq!(calendar.remaining_minutes(t(13, 30)), 240);
        assert_eq!(calendar.remaining_minutes(t(17, 30)), 0);
    }

    #[test]
    fn test_remaining_minutes_truncates_seconds() {
        let calendar = WorkCalendar::default();
        let now = NaiveTime::from_hms_opt(12, 0, 30).unwrap();
        assert_eq!(calendar.remaining_minutes(now), 29 + 240);
    }

    #[test]
    fn test_serde_uses_hh_mm() {
        let json = serde_json::to_value(WorkCalendar::default()).unwrap();
        assert_eq!(json["work_start"], "08:30");
        assert_eq!(json["work_end"], "17:30");

        let parsed: WorkCalendar = serde_json::from_str(
            r#"{"work_start":"09:00","lunch_start":"12:00","lunch_end":"12:45","work_end":"18:00"}"#,
        )
        .unwrap();
        assert_eq!(parsed.morning_minutes(), 180);
        assert_eq!(parsed.afternoon_minutes(), 315);
    }

    #[test]
    fn test_validate_rejects_out_of_order() {
        let calendar = WorkCalendar {
            lunch_start: t(14, 0),
            lunch_end: t(13, 0),
            ..WorkCalendar::default()
        };
        assert!(matches!(calendar.validate(), Err(TaskError::Validation(_))));
        assert!(WorkCalendar::default().validate().is_ok());
    }
}
