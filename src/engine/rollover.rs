use super::aggregate;
use crate::clock::Clock;
use crate::domain::TaskId;
use crate::error::Result;
use crate::persistence::{StatsStore, TaskStore};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Archive `last_checked` if the calendar day has changed since.
///
/// The snapshot is computed for `last_checked` itself, not for the clock's
/// current day. It is written before that day's tasks are purged in a single
/// batch, so a failure in between leaves the tasks in place and a retry
/// archives the same figures. Once the tasks are gone, an existing archive
/// is left alone rather than overwritten with an empty snapshot.
///
/// Returns the new current day, or `None` when nothing changed.
pub fn check_and_roll<C: Clock>(
    tasks: &mut TaskStore,
    stats: &mut StatsStore,
    clock: &C,
    last_checked: NaiveDate,
) -> Result<Option<NaiveDate>> {
    let today = clock.today();
    if today == last_checked {
        return Ok(None);
    }
    if today < last_checked {
        warn!(%today, %last_checked, "clock is behind the last rollover check");
    }

    let outgoing: Vec<TaskId> = tasks
        .get_all()?
        .into_iter()
        .filter(|task| clock.date_of(task.created_at) == last_checked)
        .map(|task| task.id)
        .collect();

    let already_archived = stats.get_by_date(last_checked)?.is_some();
    if outgoing.is_empty() && already_archived {
        debug!(date = %last_checked, "day already archived");
        return Ok(Some(today));
    }

    let snapshot = aggregate::compute_for(tasks, clock, last_checked)?;
    info!(
        date = %last_checked,
        focus_secs = snapshot.total_focus_time,
        completed = snapshot.completed_tasks,
        purged = outgoing.len(),
        "archiving day"
    );
    stats.put(snapshot)?;
    tasks.delete_many(&outgoing)?;

    Ok(Some(today))
}

/// Delete every archived day
pub fn clear_history(stats: &mut StatsStore) -> Result<()> {
    stats.clear()?;
    info!("cleared history");
    Ok(())
}
