//! Per-run driver capacity accounting.
//!
//! One planner run keeps every capacity decision in memory: the ledger is
//! seeded from the day's persisted assignment counts and charged as matches
//! are made, so a driver's load is never re-read from the store mid-run.
//! This closes the read-count-then-write-assign race the job would otherwise
//! have between its count queries and its writes.

use rustc_hash::FxHashMap;

use crate::ids::DriverId;

/// Running count of orders assigned to each driver today.
#[derive(Debug, Clone, Default)]
pub struct CapacityLedger {
    assigned: FxHashMap<DriverId, u32>,
}

impl CapacityLedger {
    /// An empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger from the day's persisted per-driver counts.
    #[must_use]
    pub fn from_counts(counts: impl IntoIterator<Item = (DriverId, u32)>) -> Self {
        Self {
            assigned: counts.into_iter().collect(),
        }
    }

    /// Orders currently counted against a driver.
    #[must_use]
    pub fn assigned_count(&self, driver: DriverId) -> u32 {
        self.assigned.get(&driver).copied().unwrap_or(0)
    }

    /// Charge one assignment against a driver.
    pub fn record(&mut self, driver: DriverId) {
        *self.assigned.entry(driver).or_insert(0) += 1;
    }

    /// Roll back one charge, e.g. when persisting the assignment failed.
    pub fn release(&mut self, driver: DriverId) {
        if let Some(count) = self.assigned.get_mut(&driver) {
            *count = count.saturating_sub(1);
        }
    }
}
