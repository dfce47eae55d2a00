use crate::domain::{compute_totals, format_date, format_time, status_badge, DailyStats, Task};
use chrono::{DateTime, FixedOffset, Utc};

/// One line per task: badge, short id, effective time, title
pub fn render_task_list(tasks: &[Task], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return "No tasks yet. Add one with `dayfocus add <title>`.\n".to_string();
    }

    let mut out = String::new();
    for task in tasks {
        let pin = if task.pinned { " [pinned]" } else { "" };
        out.push_str(&format!(
            "{:<10} {}  {}  {}{}\n",
            status_badge(task),
            task.id.short(),
            format_time(task.effective_time(now)),
            task.title,
            pin
        ));
    }
    out.push_str(&format!("\nTotal: {}\n", format_time(compute_totals(tasks, now))));
    out
}

/// Every field of a single task, instants shown in `offset`
pub fn render_task_detail(task: &Task, now: DateTime<Utc>, offset: FixedOffset) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", task.title));
    out.push_str(&format!("  id:       {}\n", task.id));
    out.push_str(&format!("  status:   {}\n", status_badge(task)));
    out.push_str(&format!("  time:     {}\n", format_time(task.effective_time(now))));
    if let Some(start) = task.current_session_start {
        let start = start.with_timezone(&offset);
        out.push_str(&format!("  session:  since {}\n", start.format("%H:%M:%S %:z")));
    }
    if let Some(due) = task.due_date {
        let due = due.with_timezone(&offset);
        out.push_str(&format!("  due:      {}\n", due.format("%Y-%m-%d %H:%M %:z")));
    }
    out.push_str(&format!("  pinned:   {}\n", if task.pinned { "yes" } else { "no" }));
    let created = task.created_at.with_timezone(&offset);
    out.push_str(&format!("  created:  {}\n", created.format("%Y-%m-%d %H:%M:%S %:z")));
    if !task.description.is_empty() {
        out.push_str(&format!("\n{}\n", task.description));
    }
    out
}

/// Summary cards followed by the per-task breakdown
pub fn render_stats(stats: &DailyStats, heading: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} - {}\n\n", heading, stats.date.format("%A, %B %-d")));
    out.push_str(&format!("  Total Focus Time  {}\n", format_time(stats.total_focus_time)));
    out.push_str(&format!("  Tasks Completed   {}\n", stats.completed_tasks));
    out.push_str(&format!("  Tasks Worked On   {}\n", stats.tasks_worked_on()));

    if stats.task_breakdown.is_empty() {
        out.push_str("\nNo activity yet. Start a task to see your stats!\n");
        return out;
    }

    out.push_str("\nTask Breakdown\n");
    for entry in &stats.task_breakdown {
        let mark = if entry.completed { " ✓" } else { "" };
        out.push_str(&format!("  {}  {}{}\n", format_time(entry.time), entry.title, mark));
    }
    out
}

/// Archived days, in the order given (the store returns newest first)
pub fn render_history(history: &[DailyStats]) -> String {
    if history.is_empty() {
        return "History is empty.\n".to_string();
    }

    let mut out = String::new();
    for day in history {
        let count = day.task_breakdown.len();
        out.push_str(&format!(
            "{:<13} focus {}  completed {}  {} task{}\n",
            format_date(day.date),
            format_time(day.total_focus_time),
            day.completed_tasks,
            count,
            if count == 1 { "" } else { "s" }
        ));
    }
    out
}
