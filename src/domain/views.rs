use super::task::Task;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

/// Order tasks for display: pinned first, then newest first
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.pinned, b.pinned) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.created_at.cmp(&a.created_at),
    });
}

/// Sum of effective time across a listing, including running sessions
pub fn compute_totals(tasks: &[Task], now: DateTime<Utc>) -> u64 {
    tasks.iter().map(|task| task.effective_time(now)).sum()
}

/// Format seconds as "HH:MM:SS". Hours are not wrapped at 24.
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a date for history headings, e.g. "Feb 3, 2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Get status badge text
pub fn status_badge(task: &Task) -> &'static str {
    if task.completed {
        "✓ DONE"
    } else if task.is_timer_running() {
        "⏱ RUNNING"
    } else if task.total_time > 0 {
        "⏸ PAUSED"
    } else {
        "🌿 IDLE"
    }
}
