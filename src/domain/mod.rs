pub mod day;
pub mod enums;
pub mod error;
pub mod task;

pub use day::{
    day_key, CapacityOverflow, Created, DayPlan, NextTask, RunningTask, TaskEdit,
    TransitionOutcome,
};
pub use enums::TaskStatus;
pub use error::TaskError;
pub use task::Task;
