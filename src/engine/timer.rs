use crate::clock::Clock;
use crate::domain::{Task, TaskId};
use crate::error::Result;
use crate::persistence::TaskStore;
use tracing::debug;

/// Read the task, apply `change`, and write it back only if it reports a
/// modification. `None` if the task doesn't exist.
fn transition<F>(tasks: &mut TaskStore, id: TaskId, action: &str, change: F) -> Result<Option<Task>>
where
    F: FnOnce(&mut Task) -> bool,
{
    let Some(mut task) = tasks.get_by_id(id)? else {
        debug!(id = %id, action, "task not found");
        return Ok(None);
    };

    if change(&mut task) {
        tasks.put(task.clone())?;
        debug!(id = %id, action, total_time = task.total_time, "timer transition");
    }
    Ok(Some(task))
}

/// Open a session. Starting a running timer keeps the original start.
pub fn start<C: Clock>(tasks: &mut TaskStore, clock: &C, id: TaskId) -> Result<Option<Task>> {
    let now = clock.now();
    transition(tasks, id, "start", |task| task.start_session(now))
}

/// Close the open session, folding its elapsed seconds into `total_time`
pub fn pause<C: Clock>(tasks: &mut TaskStore, clock: &C, id: TaskId) -> Result<Option<Task>> {
    let now = clock.now();
    transition(tasks, id, "pause", |task| task.close_session(now))
}

/// Terminal action of a focus session. Leaves the task in the same state as
/// `pause`.
pub fn stop<C: Clock>(tasks: &mut TaskStore, clock: &C, id: TaskId) -> Result<Option<Task>> {
    let now = clock.now();
    transition(tasks, id, "stop", |task| task.close_session(now))
}

/// Start when stopped, pause when running. A completed task stays stopped.
pub fn toggle_timer<C: Clock>(tasks: &mut TaskStore, clock: &C, id: TaskId) -> Result<Option<Task>> {
    let now = clock.now();
    transition(tasks, id, "toggle", |task| {
        if task.is_timer_running() {
            task.close_session(now)
        } else {
            task.start_session(now)
        }
    })
}

/// Close any open session, then flip completion
pub fn toggle_complete<C: Clock>(tasks: &mut TaskStore, clock: &C, id: TaskId) -> Result<Option<Task>> {
    let now = clock.now();
    transition(tasks, id, "toggle_complete", |task| {
        task.toggle_complete(now);
        true
    })
}
