use crate::clock::Clock;
use crate::domain::{DailyStats, Task, TaskTime};
use crate::error::Result;
use crate::persistence::TaskStore;
use chrono::{DateTime, NaiveDate, Utc};

/// Statistics for the tasks created on `date`, as of `now`.
///
/// Running sessions count with their live elapsed time, but are not closed;
/// the tasks are only read. Breakdown entries keep the order of `tasks`.
pub fn snapshot<C: Clock>(tasks: &[Task], date: NaiveDate, now: DateTime<Utc>, clock: &C) -> DailyStats {
    let mut stats = DailyStats::empty(date);

    for task in tasks.iter().filter(|task| clock.date_of(task.created_at) == date) {
        let time = task.effective_time(now);
        stats.total_focus_time += time;

        if task.completed {
            stats.completed_tasks += 1;
        }

        if time > 0 {
            stats.task_breakdown.push(TaskTime {
                title: task.title.clone(),
                time,
                completed: task.completed,
            });
        }
    }

    stats
}

/// Fresh snapshot for an explicit calendar date
pub fn compute_for<C: Clock>(tasks: &TaskStore, clock: &C, date: NaiveDate) -> Result<DailyStats> {
    let all = tasks.get_all()?;
    Ok(snapshot(&all, date, clock.now(), clock))
}

/// Fresh snapshot for the clock's current day
pub fn compute_today<C: Clock>(tasks: &TaskStore, clock: &C) -> Result<DailyStats> {
    compute_for(tasks, clock, clock.today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{date, instant, ManualClock};
    use crate::domain::NewTask;
    use crate::engine::timer;
    use chrono::{Duration, FixedOffset};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compute_today_scenario() {
        let clock = ManualClock::new(instant("2024-01-01T09:00:00Z"));
        let mut tasks = TaskStore::in_memory();

        let mut a = tasks.create(NewTask::titled("A"), clock.now()).unwrap();
        a.total_time = 600;
        a.completed = true;
        tasks.put(a).unwrap();
        tasks.create(NewTask::titled("B"), clock.now()).unwrap();

        clock.set(instant("2024-01-01T18:00:00Z"));
        let stats = compute_today(&tasks, &clock).unwrap();

        assert_eq!(
            stats,
            DailyStats {
                date: date("2024-01-01"),
                total_focus_time: 600,
                completed_tasks: 1,
                task_breakdown: vec![TaskTime {
                    title: "A".to_string(),
                    time: 600,
                    completed: true,
                }],
            }
        );
    }

    #[test]
    fn test_live_session_counts_without_mutation() {
        let clock = ManualClock::new(instant("2024-01-01T10:00:00Z"));
        let mut tasks = TaskStore::in_memory();
        let task = tasks.create(NewTask::titled("Live"), clock.now()).unwrap();
        timer::start(&mut tasks, &clock, task.id).unwrap();

        clock.advance(Duration::seconds(42));
        let first = compute_today(&tasks, &clock).unwrap();
        assert_eq!(first.total_focus_time, 42);

        clock.advance(Duration::seconds(8));
        let second = compute_today(&tasks, &clock).unwrap();
        assert_eq!(second.total_focus_time, 50);

        let stored = tasks.get_by_id(task.id).unwrap().unwrap();
        assert_eq!(stored.total_time, 0);
        assert!(stored.is_timer_running());
    }

    #[test]
    fn test_other_days_excluded() {
        let clock = ManualClock::new(instant("2024-01-01T23:00:00Z"));
        let mut tasks = TaskStore::in_memory();
        let mut yesterday = tasks.create(NewTask::titled("Yesterday"), clock.now()).unwrap();
        yesterday.total_time = 100;
        tasks.put(yesterday).unwrap();

        clock.set(instant("2024-01-02T01:00:00Z"));
        let stats = compute_today(&tasks, &clock).unwrap();
        assert_eq!(stats, DailyStats::empty(date("2024-01-02")));

        let archived = compute_for(&tasks, &clock, date("2024-01-01")).unwrap();
        assert_eq!(archived.total_focus_time, 100);
    }

    #[test]
    fn test_breakdown_keeps_encounter_order() {
        let now = instant("2024-01-01T12:00:00Z");
        let clock = ManualClock::new(now);
        let titles = ["Zeta", "Alpha", "Mid"];
        let list: Vec<Task> = titles
            .iter()
            .map(|title| {
                let mut task = Task::new(NewTask::titled(*title), now).unwrap();
                task.total_time = 10;
                task
            })
            .collect();

        let stats = snapshot(&list, date("2024-01-01"), now, &clock);
        let order: Vec<&str> = stats.task_breakdown.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, titles.to_vec());
    }

    #[test]
    fn test_day_follows_clock_offset() {
        // 23:30 UTC is already Jan 2nd at UTC+1
        let offset = FixedOffset::east_opt(3600).unwrap();
        let created = instant("2024-01-01T23:30:00Z");
        let clock = ManualClock::new(created).with_offset(offset);
        let mut task = Task::new(NewTask::titled("Late"), created).unwrap();
        task.total_time = 5;

        let list = vec![task];
        assert_eq!(snapshot(&list, date("2024-01-02"), created, &clock).total_focus_time, 5);
        assert_eq!(snapshot(&list, date("2024-01-01"), created, &clock).total_focus_time, 0);
    }
}
