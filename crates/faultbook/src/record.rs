//! Per-fault counters and the fixed-capacity store holding them.

use crate::{Counter, FaultId, FaultStatus, Millis, RefValue};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mutable bookkeeping for a single fault.
///
/// Counters only move through [`FaultRecord::observe`] and the resets
/// triggered by policies or callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaultRecord {
    errors: Counter,
    total: Counter,
    clear: Counter,
    first_fault_ms: Millis,
    last_fault_ms: Millis,
    status: FaultStatus,
    ref_value: RefValue,
}

impl FaultRecord {
    /// A zeroed record in [`FaultStatus::Normal`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: 0,
            total: 0,
            clear: 0,
            first_fault_ms: 0,
            last_fault_ms: 0,
            status: FaultStatus::Normal,
            ref_value: 0,
        }
    }

    /// Fault observations since the last reset.
    #[must_use]
    pub fn errors(&self) -> Counter {
        self.errors
    }

    /// All observations since the last reset.
    #[must_use]
    pub fn total(&self) -> Counter {
        self.total
    }

    /// Consecutive non-fault observations since the last fault.
    #[must_use]
    pub fn clear_streak(&self) -> Counter {
        self.clear
    }

    /// Time of the first fault of the current error run.
    #[must_use]
    pub fn first_fault_ms(&self) -> Millis {
        self.first_fault_ms
    }

    /// Time of the most recent fault.
    #[must_use]
    pub fn last_fault_ms(&self) -> Millis {
        self.last_fault_ms
    }

    /// How long the current error run has lasted.
    #[must_use]
    pub fn fault_duration_ms(&self) -> Millis {
        self.last_fault_ms.saturating_sub(self.first_fault_ms)
    }

    /// Status computed by the last policy evaluation.
    #[must_use]
    pub fn status(&self) -> FaultStatus {
        self.status
    }

    /// Reference value of the most recent fault observation.
    #[must_use]
    pub fn ref_value(&self) -> RefValue {
        self.ref_value
    }

    /// Zero every counter and timestamp and return to `Normal`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Commit one observation to the counters.
    ///
    /// Returns `true` when the `total` counter overflowed, in which case the
    /// record was reset and reseeded with `total = 1` before the observation
    /// was applied.
    pub(crate) fn observe(&mut self, now: Millis, ref_value: RefValue, is_fault: bool) -> bool {
        let overflowed = match self.total.checked_add(1) {
            Some(total) => {
                self.total = total;
                false
            }
            None => {
                self.reset();
                self.total = 1;
                true
            }
        };

        if is_fault {
            if self.errors == 0 {
                self.first_fault_ms = now;
            }
            self.errors = self.errors.saturating_add(1);
            self.last_fault_ms = now;
            self.ref_value = ref_value;
            self.clear = 0;
        } else {
            self.clear = self.clear.saturating_add(1);
        }

        overflowed
    }

    pub(crate) fn set_status(&mut self, status: FaultStatus) {
        self.status = status;
    }

    #[cfg(test)]
    pub(crate) fn with_total(total: Counter) -> Self {
        Self {
            total,
            ..Self::new()
        }
    }
}

/// Fixed-capacity table of fault records, indexed by [`FaultId`].
///
/// Grows in lockstep with the configuration table; slot `i` always belongs
/// to fault id `i`.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordStore<const FAULTS: usize> {
    records: heapless::Vec<FaultRecord, FAULTS>,
}

impl<const FAULTS: usize> RecordStore<FAULTS> {
    pub(crate) const fn new() -> Self {
        Self {
            records: heapless::Vec::new(),
        }
    }

    /// Append `count` fresh records.
    ///
    /// The caller has already checked the capacity; returns `false` if it
    /// was wrong, leaving the store untouched.
    pub(crate) fn extend_fresh(&mut self, count: usize) -> bool {
        if self.records.len().saturating_add(count) > FAULTS {
            return false;
        }
        for _ in 0..count {
            if self.records.push(FaultRecord::new()).is_err() {
                return false;
            }
        }
        true
    }

    pub(crate) fn get(&self, id: FaultId) -> Option<&FaultRecord> {
        self.records.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: FaultId) -> Option<&mut FaultRecord> {
        self.records.get_mut(id.index())
    }

    /// Reset one record; `false` when `id` is out of range.
    pub(crate) fn reset(&mut self, id: FaultId) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.reset();
                true
            }
            None => false,
        }
    }

    /// Records for the contiguous id range `start..start + len`.
    pub(crate) fn range(&self, start: usize, len: usize) -> &[FaultRecord] {
        let end = start.saturating_add(len).min(self.records.len());
        self.records.get(start.min(end)..end).unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
