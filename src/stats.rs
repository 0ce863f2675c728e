/// Window statistics
///
/// Aggregates are recomputed from a fresh snapshot on every call; with a
/// ten-record window there is nothing worth caching.

use crate::record::NormalizedRecord;
use crate::store::{RecordStore, SnapshotOrder};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_records: u64,
    pub current_storage: usize,
    pub unique_record_ids: usize,
    pub unique_users: usize,
    pub last_record_id: Option<i64>,
}

pub struct StatsComputer;

impl StatsComputer {
    /// Aggregate `records`; `total_records` is the store counter taken with
    /// the same snapshot
    pub fn compute(records: &[Arc<NormalizedRecord>], total_records: u64) -> Stats {
        let record_ids: HashSet<i64> = records.iter().filter_map(|r| r.record_id()).collect();
        let users: HashSet<i64> = records.iter().filter_map(|r| r.creat_usrnbr()).collect();

        Stats {
            total_records,
            current_storage: records.len(),
            unique_record_ids: record_ids.len(),
            unique_users: users.len(),
            last_record_id: record_ids.iter().copied().max(),
        }
    }

    /// Snapshot `store` under one lock and aggregate it
    pub fn from_store(store: &RecordStore) -> Stats {
        let (records, total) = store.snapshot_with_total(SnapshotOrder::Arrival);
        Self::compute(&records, total)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Record Statistics ===")?;
        writeln!(f, "Total Records: {}", self.total_records)?;
        writeln!(f, "In Memory: {}", self.current_storage)?;
        writeln!(f, "Unique Record IDs: {}", self.unique_record_ids)?;
        writeln!(f, "Unique Users: {}", self.unique_users)?;
        match self.last_record_id {
            Some(id) => write!(f, "Last Record ID: {}", id),
            None => write!(f, "Last Record ID: n/a"),
        }
    }
}
