pub mod calendar;
pub mod stats;

pub use calendar::WorkCalendar;
pub use stats::{DayMetrics, DaySummary};
