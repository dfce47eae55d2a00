pub mod stats;
pub mod task;
pub mod views;

pub use stats::{DailyStats, TaskTime};
pub use task::{validate_title, NewTask, Task, TaskId, TaskPatch};
pub use views::{compute_totals, format_date, format_time, sort_for_display, status_badge};
