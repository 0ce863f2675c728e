/// Bounded record store
///
/// Keeps the most recent records in arrival order plus a counter of every
/// record ever appended. All operations take one coarse lock; the window is
/// tiny so nothing holds it for long.

use crate::record::NormalizedRecord;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrder {
    /// Oldest first
    Arrival,
    NewestFirst,
}

#[derive(Debug)]
struct Inner {
    records: VecDeque<Arc<NormalizedRecord>>,
    total_received: u64,
}

impl Inner {
    fn ordered(&self, order: SnapshotOrder) -> Vec<Arc<NormalizedRecord>> {
        match order {
            SnapshotOrder::Arrival => self.records.iter().cloned().collect(),
            SnapshotOrder::NewestFirst => self.records.iter().rev().cloned().collect(),
        }
    }
}

#[derive(Debug)]
pub struct RecordStore {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one. Storage grows on demand, so a
    /// large capacity costs nothing until records arrive.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RecordStore {
            capacity,
            inner: Mutex::new(Inner {
                records: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
                total_received: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append at the tail, evicting the oldest records past capacity.
    /// Returns the total after this append.
    pub fn append(&self, record: NormalizedRecord) -> u64 {
        let mut inner = self.inner.lock();
        inner.records.push_back(Arc::new(record));
        inner.total_received += 1;
        while inner.records.len() > self.capacity {
            inner.records.pop_front();
        }
        let total = inner.total_received;
        debug!(total, size = inner.records.len(), "record stored");
        total
    }

    /// Point-in-time copy of the window
    pub fn snapshot(&self, order: SnapshotOrder) -> Vec<Arc<NormalizedRecord>> {
        self.inner.lock().ordered(order)
    }

    /// Snapshot together with the total it was taken at
    pub fn snapshot_with_total(&self, order: SnapshotOrder) -> (Vec<Arc<NormalizedRecord>>, u64) {
        let inner = self.inner.lock();
        (inner.ordered(order), inner.total_received)
    }

    /// Clear the window and the counter; returns the total before clearing
    pub fn reset(&self) -> u64 {
        let mut inner = self.inner.lock();
        let previous = inner.total_received;
        inner.records.clear();
        inner.total_received = 0;
        info!(previous_total = previous, "record store reset");
        previous
    }

    pub fn current_total(&self) -> u64 {
        self.inner.lock().total_received
    }

    pub fn current_size(&self) -> usize {
        self.inner.lock().records.len()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
