use chrono::{DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current instant and of the calendar-day policy.
///
/// Every "which day does this belong to" decision goes through
/// [`Clock::date_of`], so task creation, aggregation and rollover agree on
/// where midnight falls.
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Offset used to turn instants into calendar dates
    fn offset(&self) -> FixedOffset;

    /// Calendar date of `instant` under this clock's offset
    fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset()).date_naive()
    }

    /// Today's calendar date
    fn today(&self) -> NaiveDate {
        self.date_of(self.now())
    }

    /// First instant of the calendar day after `today()`
    fn next_midnight(&self) -> DateTime<Utc> {
        let tomorrow = self
            .today()
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);
        let local_midnight = tomorrow.and_time(NaiveTime::MIN);
        let utc_midnight = local_midnight - Duration::seconds(i64::from(self.offset().local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc_midnight, Utc)
    }

    /// Time left until `next_midnight()`
    fn until_next_midnight(&self) -> std::time::Duration {
        (self.next_midnight() - self.now()).to_std().unwrap_or_default()
    }
}

/// Whole seconds between `start` and `end`, truncating the sub-second rest.
///
/// A negative span (the wall clock moved backwards) counts as zero.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let millis = end.signed_duration_since(start).num_milliseconds();
    u64::try_from(millis / 1000).unwrap_or(0)
}

/// Wall clock with a fixed day offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Uses the local zone's offset as of now. A DST change is picked up on
    /// the next start of the process.
    pub fn local() -> Self {
        Self {
            offset: Local::now().offset().fix(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Hand-driven clock. Clones share the same instant, so a test can keep a
/// handle and advance time under an engine that owns another clone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
pub(crate) fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

#[cfg(test)]
pub(crate) fn date(ymd: &str) -> NaiveDate {
    NaiveDate::parse_from_str(ymd, "%Y-%m-%d").expect("valid date")
}
