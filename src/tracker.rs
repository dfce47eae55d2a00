use crate::clock::Clock;
use crate::domain::{DailyStats, NewTask, Task, TaskId, TaskPatch};
use crate::engine::{aggregate, rollover, timer};
use crate::error::Result;
use crate::persistence::{StatsStore, TaskStore, DAILY_STATS_FILE, TASKS_FILE};
use chrono::NaiveDate;
use std::path::Path;

/// Task list, timers and daily history behind one handle.
///
/// Every method reads fresh state from the stores; the tracker caches
/// nothing, so a caller can redraw straight from the returned values.
pub struct Tracker<C: Clock> {
    tasks: TaskStore,
    stats: StatsStore,
    clock: C,
}

impl<C: Clock> Tracker<C> {
    pub fn new(tasks: TaskStore, stats: StatsStore, clock: C) -> Self {
        Self { tasks, stats, clock }
    }

    /// Open the JSON-backed stores in `dir`
    pub fn open<P: AsRef<Path>>(dir: P, clock: C) -> Result<Self> {
        let dir = dir.as_ref();
        let tasks = TaskStore::open(dir.join(TASKS_FILE))?;
        let stats = StatsStore::open(dir.join(DAILY_STATS_FILE))?;
        Ok(Self::new(tasks, stats, clock))
    }

    pub fn in_memory(clock: C) -> Self {
        Self::new(TaskStore::in_memory(), StatsStore::in_memory(), clock)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // Tasks

    pub fn add_task(&mut self, fields: NewTask) -> Result<Task> {
        let now = self.clock.now();
        self.tasks.create(fields, now)
    }

    pub fn tasks(&self) -> Result<Vec<Task>> {
        self.tasks.get_all()
    }

    pub fn task(&self, id: TaskId) -> Result<Option<Task>> {
        self.tasks.get_by_id(id)
    }

    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        self.tasks.update(id, patch)
    }

    pub fn toggle_pin(&mut self, id: TaskId) -> Result<Option<Task>> {
        let Some(task) = self.tasks.get_by_id(id)? else {
            return Ok(None);
        };
        let patch = TaskPatch {
            pinned: Some(!task.pinned),
            ..TaskPatch::default()
        };
        self.tasks.update(id, patch)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks.delete(id)
    }

    /// True while any task has an open session; the display needs a
    /// per-second refresh only then
    pub fn has_running_timer(&self) -> Result<bool> {
        Ok(self.tasks.get_all()?.iter().any(Task::is_timer_running))
    }

    // Timer

    pub fn start(&mut self, id: TaskId) -> Result<Option<Task>> {
        timer::start(&mut self.tasks, &self.clock, id)
    }

    pub fn pause(&mut self, id: TaskId) -> Result<Option<Task>> {
        timer::pause(&mut self.tasks, &self.clock, id)
    }

    pub fn stop(&mut self, id: TaskId) -> Result<Option<Task>> {
        timer::stop(&mut self.tasks, &self.clock, id)
    }

    pub fn toggle_timer(&mut self, id: TaskId) -> Result<Option<Task>> {
        timer::toggle_timer(&mut self.tasks, &self.clock, id)
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Option<Task>> {
        timer::toggle_complete(&mut self.tasks, &self.clock, id)
    }

    // Statistics

    pub fn today_stats(&self) -> Result<DailyStats> {
        aggregate::compute_today(&self.tasks, &self.clock)
    }

    /// Archived record for `date`
    pub fn stats_for(&self, date: NaiveDate) -> Result<Option<DailyStats>> {
        self.stats.get_by_date(date)
    }

    /// Archived days, newest first
    pub fn history(&self) -> Result<Vec<DailyStats>> {
        self.stats.get_all()
    }

    pub fn check_and_roll(&mut self, last_checked: NaiveDate) -> Result<Option<NaiveDate>> {
        rollover::check_and_roll(&mut self.tasks, &mut self.stats, &self.clock, last_checked)
    }

    pub fn clear_history(&mut self) -> Result<()> {
        rollover::clear_history(&mut self.stats)
    }
}
