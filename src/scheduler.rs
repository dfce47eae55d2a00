use crate::clock::Clock;
use crate::config::Config;
use std::time::Duration;

/// Default display refresh interval while a timer is running
pub const DEFAULT_REFRESH_SECS: u64 = 1;

/// Default interval between rollover checks
pub const DEFAULT_ROLLOVER_CHECK_SECS: u64 = 60;

/// Cadence of the external driver loop.
///
/// Rollover is checked on startup, on a fixed interval, and once exactly at
/// the next midnight. The display refresh only matters while a timer runs and
/// never changes stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub refresh: Duration,
    pub rollover_check: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(DEFAULT_REFRESH_SECS),
            rollover_check: Duration::from_secs(DEFAULT_ROLLOVER_CHECK_SECS),
        }
    }
}

impl Schedule {
    pub fn from_config(config: &Config) -> Self {
        Self {
            refresh: Duration::from_secs(config.refresh_secs.max(1)),
            rollover_check: Duration::from_secs(config.rollover_check_secs.max(1)),
        }
    }

    /// Time until the next rollover check: the regular interval, or sooner
    /// if midnight comes first
    pub fn until_rollover_check<C: Clock>(&self, clock: &C) -> Duration {
        self.rollover_check.min(clock.until_next_midnight())
    }

    /// How long the driver loop may sleep before it has work to do
    pub fn next_wake<C: Clock>(&self, clock: &C, timer_running: bool) -> Duration {
        let check = self.until_rollover_check(clock);
        if timer_running {
            check.min(self.refresh)
        } else {
            check
        }
    }
}
