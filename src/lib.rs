//! Local task list with per-task focus timers, daily statistics and a
//! midnight rollover that archives the day and clears its tasks.
//!
//! [`Tracker`] bundles the stores and a [`Clock`]; the functions in
//! [`engine`] can also be driven directly with explicit stores.

pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod report;
pub mod scheduler;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::{DailyStats, NewTask, Task, TaskId, TaskPatch, TaskTime};
pub use error::{StoreError, TrackerError};
pub use tracker::Tracker;
