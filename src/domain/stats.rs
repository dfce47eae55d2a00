use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of a day's breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTime {
    pub title: String,
    /// Effective seconds at the time the snapshot was taken
    pub time: u64,
    pub completed: bool,
}

/// Focus statistics for one calendar day.
///
/// For the current day this is a snapshot computed on demand. Once the day
/// rolls over it is archived and no longer changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_focus_time: u64,
    pub completed_tasks: usize,
    #[serde(default)]
    pub task_breakdown: Vec<TaskTime>,
}

impl DailyStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_focus_time: 0,
            completed_tasks: 0,
            task_breakdown: Vec::new(),
        }
    }

    /// Number of tasks with any tracked time
    pub fn tasks_worked_on(&self) -> usize {
        self.task_breakdown.len()
    }
}
