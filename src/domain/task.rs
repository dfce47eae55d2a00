use crate::clock::elapsed_seconds;
use crate::error::{Result, TrackerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell tasks apart in a listing
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A unit of trackable work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub completed: bool,
    /// Seconds accumulated across closed sessions
    #[serde(default)]
    pub total_time: u64,
    /// Start of the open session, if any
    #[serde(default)]
    pub current_session_start: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub(crate) fn new(fields: NewTask, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: TaskId::new(),
            title: validate_title(&fields.title)?,
            description: fields.description,
            due_date: fields.due_date,
            pinned: fields.pinned,
            completed: false,
            total_time: 0,
            current_session_start: None,
            created_at: now,
        })
    }

    pub fn is_timer_running(&self) -> bool {
        self.current_session_start.is_some()
    }

    /// Seconds of the open session so far (0 when stopped)
    pub fn live_elapsed(&self, now: DateTime<Utc>) -> u64 {
        self.current_session_start
            .map(|start| elapsed_seconds(start, now))
            .unwrap_or(0)
    }

    /// Accumulated time plus the open session, without folding it in
    pub fn effective_time(&self, now: DateTime<Utc>) -> u64 {
        self.total_time + self.live_elapsed(now)
    }

    /// Open a session. Returns false if one is already open or the task is
    /// completed; a completed task never runs its timer.
    pub fn start_session(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed || self.is_timer_running() {
            return false;
        }
        self.current_session_start = Some(now);
        true
    }

    /// Close the open session and fold its whole seconds into `total_time`.
    /// Returns false if no session was open.
    pub fn close_session(&mut self, now: DateTime<Utc>) -> bool {
        match self.current_session_start.take() {
            Some(start) => {
                self.total_time += elapsed_seconds(start, now);
                true
            }
            None => false,
        }
    }

    /// Flip completion, closing any open session first so no timer time is
    /// lost and a completed task never keeps a running timer
    pub fn toggle_complete(&mut self, now: DateTime<Utc>) {
        self.close_session(now);
        self.completed = !self.completed;
    }

    /// Merge the supplied fields over this task
    pub(crate) fn apply(&mut self, patch: TaskPatch) -> Result<()> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
        Ok(())
    }
}

/// Fields for creating a task; anything unset takes its default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub pinned: bool,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// Partial update. `None` leaves a field untouched; for `due_date`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub pinned: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.pinned.is_none()
    }
}

/// Titles are stored trimmed and must not be blank
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::Validation("title must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::instant;
    use chrono::Duration;

    fn task_at(now: DateTime<Utc>) -> Task {
        Task::new(NewTask::titled("Write report"), now).unwrap()
    }

    #[test]
    fn test_task_new_defaults() {
        let now = instant("2024-01-01T10:00:00Z");
        let task = Task::new(NewTask::titled("  Write report ").description("Q4"), now).unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "Q4");
        assert!(!task.completed);
        assert!(!task.pinned);
        assert_eq!(task.total_time, 0);
        assert!(!task.is_timer_running());
        assert_eq!(task.created_at, now);
    }

    #[test]
    fn test_blank_title_rejected() {
        let now = instant("2024-01-01T10:00:00Z");
        let result = Task::new(NewTask::titled("   "), now);
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_start_session_is_idempotent() {
        let start = instant("2024-01-01T10:00:00Z");
        let mut task = task_at(start);

        assert!(task.start_session(start));
        assert!(!task.start_session(start + Duration::seconds(40)));
        assert_eq!(task.current_session_start, Some(start));
        assert_eq!(task.total_time, 0);
    }

    #[test]
    fn test_close_session_truncates_each_session() {
        let start = instant("2024-01-01T10:00:00Z");
        let mut task = task_at(start);

        task.start_session(start);
        task.close_session(start + Duration::milliseconds(1_900));
        let second = start + Duration::seconds(10);
        task.start_session(second);
        task.close_session(second + Duration::milliseconds(1_900));

        // 1.9s + 1.9s truncated independently
        assert_eq!(task.total_time, 2);
        assert!(!task.close_session(second + Duration::seconds(5)));
        assert_eq!(task.total_time, 2);
    }

    #[test]
    fn test_effective_time_does_not_mutate() {
        let start = instant("2024-01-01T10:00:00Z");
        let mut task = task_at(start);
        task.total_time = 100;
        task.start_session(start);

        assert_eq!(task.effective_time(start + Duration::seconds(25)), 125);
        assert_eq!(task.total_time, 100);
        assert!(task.is_timer_running());
    }

    #[test]
    fn test_toggle_complete_closes_session() {
        let start = instant("2024-01-01T10:00:00Z");
        let mut task = task_at(start);
        task.start_session(start);

        task.toggle_complete(start + Duration::seconds(90));
        assert!(task.completed);
        assert!(!task.is_timer_running());
        assert_eq!(task.total_time, 90);

        task.toggle_complete(start + Duration::seconds(200));
        assert!(!task.completed);
        assert_eq!(task.total_time, 90);
    }

    #[test]
    fn test_apply_patch_leaves_untouched_fields() {
        let now = instant("2024-01-01T10:00:00Z");
        let due = instant("2024-01-01T17:00:00Z");
        let mut task = Task::new(NewTask::titled("Draft").description("notes").due(due), now).unwrap();
        let before = task.clone();

        task.apply(TaskPatch {
            pinned: Some(true),
            ..TaskPatch::default()
        })
        .unwrap();

        assert!(task.pinned);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn test_apply_patch_clears_due_date() {
        let now = instant("2024-01-01T10:00:00Z");
        let mut task = Task::new(NewTask::titled("Draft").due(now), now).unwrap();
        task.apply(TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        })
        .unwrap();
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_apply_blank_title_changes_nothing() {
        let now = instant("2024-01-01T10:00:00Z");
        let mut task = task_at(now);
        let result = task.apply(TaskPatch {
            title: Some(" ".to_string()),
            pinned: Some(true),
            ..TaskPatch::default()
        });
        assert!(result.is_err());
        assert_eq!(task.title, "Write report");
        assert!(!task.pinned);
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let now = instant("2024-01-01T10:00:00Z");
        let task = task_at(now);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["totalTime"], 0);
        assert_eq!(json["createdAt"], "2024-01-01T10:00:00Z");
        assert!(json["currentSessionStart"].is_null());
        assert!(json.get("isTimerRunning").is_none());
    }

    #[test]
    fn test_running_flag_ignored_when_loading() {
        // Older records carried the flag; only the session start decides
        let json = r#"{
            "id": "6f1c9a52-3b7e-4c1d-9a2f-0d4e5b6c7a8b",
            "title": "Legacy",
            "isTimerRunning": true,
            "createdAt": "2024-01-01T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.is_timer_running());
        assert_eq!(task.total_time, 0);
    }

    #[test]
    fn test_completed_task_does_not_start() {
        let now = instant("2024-01-01T10:00:00Z");
        let mut task = task_at(now);
        task.toggle_complete(now);

        assert!(!task.start_session(now));
        assert!(!task.is_timer_running());
    }

    #[test]
    fn test_task_id_short_and_parse() {
        let id = TaskId::new();
        assert_eq!(id.short().len(), 8);
        assert_eq!(id.to_string().parse::<TaskId>().unwrap(), id);
    }
}
