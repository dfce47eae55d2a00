use super::collection::{Collection, JsonCollection, MemoryCollection, Record};
use crate::domain::DailyStats;
use crate::error::Result;
use chrono::NaiveDate;
use std::path::Path;

impl Record for DailyStats {
    type Key = NaiveDate;

    fn key(&self) -> NaiveDate {
        self.date
    }
}

/// Archived daily statistics keyed by calendar date
pub struct StatsStore {
    records: Box<dyn Collection<DailyStats>>,
}

impl StatsStore {
    pub fn new(records: Box<dyn Collection<DailyStats>>) -> Self {
        Self { records }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryCollection::new()))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Box::new(JsonCollection::open(path)?)))
    }

    /// Insert or overwrite the record for `stats.date`
    pub fn put(&mut self, stats: DailyStats) -> Result<()> {
        Ok(self.records.put(stats)?)
    }

    pub fn get_by_date(&self, date: NaiveDate) -> Result<Option<DailyStats>> {
        Ok(self.records.get(&date)?)
    }

    /// All archived days, newest first
    pub fn get_all(&self) -> Result<Vec<DailyStats>> {
        let mut all = self.records.get_all()?;
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    pub fn clear(&mut self) -> Result<()> {
        Ok(self.records.clear()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::date;
    use pretty_assertions::assert_eq;

    fn stats(day: &str, focus: u64) -> DailyStats {
        DailyStats {
            total_focus_time: focus,
            ..DailyStats::empty(date(day))
        }
    }

    #[test]
    fn test_get_all_newest_first() {
        let mut store = StatsStore::in_memory();
        store.put(stats("2024-01-02", 20)).unwrap();
        store.put(stats("2023-12-31", 10)).unwrap();
        store.put(stats("2024-01-10", 30)).unwrap();

        let dates: Vec<NaiveDate> = store.get_all().unwrap().iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date("2024-01-10"), date("2024-01-02"), date("2023-12-31")]);
    }

    #[test]
    fn test_put_upserts_by_date() {
        let mut store = StatsStore::in_memory();
        store.put(stats("2024-01-01", 10)).unwrap();
        store.put(stats("2024-01-01", 99)).unwrap();

        assert_eq!(store.get_all().unwrap().len(), 1);
        assert_eq!(store.get_by_date(date("2024-01-01")).unwrap(), Some(stats("2024-01-01", 99)));
    }

    #[test]
    fn test_get_missing_date() {
        let store = StatsStore::in_memory();
        assert_eq!(store.get_by_date(date("2024-01-01")).unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let mut store = StatsStore::in_memory();
        store.put(stats("2024-01-01", 10)).unwrap();
        store.put(stats("2024-01-02", 10)).unwrap();
        store.clear().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("daily_stats.json");

        StatsStore::open(&path).unwrap().put(stats("2024-01-01", 600)).unwrap();

        let store = StatsStore::open(&path).unwrap();
        assert_eq!(store.get_all().unwrap(), vec![stats("2024-01-01", 600)]);
    }
}
