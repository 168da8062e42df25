use crate::config::GameConfig;
use crate::daykey::{Clock, DayBoundary, DayKey};
use crate::error::Result;
use crate::storage::ProgressStore;
use crate::types::{ProgressRecord, ProgressSnapshot};
use std::sync::Arc;

/// Persisted record of how far into today's round set the player has
/// advanced, with day-rollover correction and daily-limit gating.
///
/// Storage and clock are injected; the ledger itself is the only writer to
/// its key. Stale records (a previous day's key) and unreadable records are
/// treated as `{today, 0}` on every read, before any gating decision; the
/// corrected record is persisted lazily on the next write.
pub struct ProgressLedger {
    store: Arc<dyn ProgressStore>,
    clock: Arc<dyn Clock>,
    boundary: DayBoundary,
    storage_key: String,
    daily_limit: u32,
}

impl ProgressLedger {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        config: &GameConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            boundary: config.boundary,
            storage_key: config.storage_key.clone(),
            daily_limit: config.daily_limit as u32,
        })
    }

    pub fn today(&self) -> DayKey {
        DayKey::today(self.clock.as_ref(), self.boundary)
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Today's progress, corrected for rollover and corruption.
    pub fn load(&self) -> ProgressSnapshot {
        let today = self.today();
        self.snapshot(self.read_record(&today))
    }

    /// Records `round_number` as completed. Monotonic: an already-counted
    /// round never decreases the stored progress, so repeated calls for the
    /// same round are harmless.
    pub fn mark_complete(&self, round_number: u32) -> Result<ProgressSnapshot> {
        let today = self.today();
        let mut record = self.read_record(&today);
        record.rounds_completed = record.rounds_completed.max(round_number);

        self.store
            .set(&self.storage_key, &serde_json::to_string(&record)?)?;
        tracing::info!(
            key = %self.storage_key,
            day = %record.date_key,
            completed = record.rounds_completed,
            "progress saved"
        );
        Ok(self.snapshot(record))
    }

    fn snapshot(&self, record: ProgressRecord) -> ProgressSnapshot {
        ProgressSnapshot {
            rounds_left: self.daily_limit.saturating_sub(record.rounds_completed),
            date_key: record.date_key,
            rounds_completed: record.rounds_completed,
        }
    }

    fn read_record(&self, today: &DayKey) -> ProgressRecord {
        let raw = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressRecord::fresh(today.key()),
            Err(err) => {
                tracing::warn!(key = %self.storage_key, %err, "progress read failed, starting fresh");
                return ProgressRecord::fresh(today.key());
            }
        };

        match serde_json::from_str::<ProgressRecord>(&raw) {
            Ok(record) if record.date_key == today.key() => record,
            Ok(record) => {
                tracing::debug!(
                    key = %self.storage_key,
                    stale = %record.date_key,
                    today = %today,
                    "day rolled over, progress reset"
                );
                ProgressRecord::fresh(today.key())
            }
            Err(err) => {
                tracing::warn!(key = %self.storage_key, %err, "discarding unreadable progress record");
                ProgressRecord::fresh(today.key())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daykey::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn ledger_on(date: &str) -> (ProgressLedger, Arc<MemoryStore>, Arc<FixedClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        ));
        let ledger = ProgressLedger::new(
            store.clone(),
            clock.clone(),
            &GameConfig::headline_game(),
        )
        .unwrap();
        (ledger, store, clock)
    }

    #[test]
    fn empty_store_reads_as_fresh_day() {
        let (ledger, _, _) = ledger_on("2025-03-10");
        let snapshot = ledger.load();
        assert_eq!(snapshot.date_key, "2025-03-10");
        assert_eq!(snapshot.rounds_completed, 0);
        assert_eq!(snapshot.rounds_left, 5);
    }

    #[test]
    fn marking_rounds_counts_down_the_allowance() {
        let (ledger, _, _) = ledger_on("2025-03-10");
        let snapshot = ledger.mark_complete(1).unwrap();
        assert_eq!(snapshot.rounds_completed, 1);
        assert_eq!(snapshot.rounds_left, 4);

        for round in 2..=5 {
            ledger.mark_complete(round).unwrap();
        }
        assert_eq!(ledger.load().rounds_left, 0);
    }

    #[test]
    fn completion_is_idempotent_per_round() {
        let (ledger, _, _) = ledger_on("2025-03-10");
        ledger.mark_complete(3).unwrap();
        let snapshot = ledger.mark_complete(3).unwrap();
        assert_eq!(snapshot.rounds_completed, 3);
        // An earlier round re-reported never regresses the count.
        let snapshot = ledger.mark_complete(1).unwrap();
        assert_eq!(snapshot.rounds_completed, 3);
    }

    #[test]
    fn day_rollover_resets_progress_on_read() {
        let (ledger, _, clock) = ledger_on("2025-01-01");
        for round in 1..=5 {
            ledger.mark_complete(round).unwrap();
        }
        assert_eq!(ledger.load().rounds_left, 0);

        clock.set_today(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        let snapshot = ledger.load();
        assert_eq!(snapshot.date_key, "2025-01-02");
        assert_eq!(snapshot.rounds_completed, 0);
        assert_eq!(snapshot.rounds_left, 5);
    }

    #[test]
    fn rollover_write_supersedes_the_stale_record() {
        let (ledger, store, clock) = ledger_on("2025-01-01");
        ledger.mark_complete(4).unwrap();

        clock.set_today(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        let snapshot = ledger.mark_complete(1).unwrap();
        assert_eq!(snapshot.rounds_completed, 1);

        let raw = store.get("headline_daily_progress").unwrap().unwrap();
        let record: ProgressRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.date_key, "2025-01-02");
        assert_eq!(record.rounds_completed, 1);
    }

    #[test]
    fn corrupted_record_falls_back_to_fresh() {
        let (ledger, store, _) = ledger_on("2025-03-10");
        store.set("headline_daily_progress", "not json{{").unwrap();

        let snapshot = ledger.load();
        assert_eq!(snapshot.rounds_completed, 0);
        assert_eq!(snapshot.rounds_left, 5);

        // And the next write repairs the stored value.
        ledger.mark_complete(1).unwrap();
        let raw = store.get("headline_daily_progress").unwrap().unwrap();
        assert!(serde_json::from_str::<ProgressRecord>(&raw).is_ok());
    }
}
