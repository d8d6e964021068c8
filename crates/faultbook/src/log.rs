//! Bounded history of recent fault events.
//!
//! # Overflow Behavior
//!
//! Recording never fails: once the log holds `LOG` entries the oldest one is
//! evicted to make room. Lookups count backwards from the most recent entry.

use crate::{FaultCode, FaultStatus, Millis, ModuleId, RefValue};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One recorded fault observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogEntry {
    /// Time of the observation.
    pub timestamp: Millis,
    /// Module of the observed fault.
    pub module: ModuleId,
    /// Code of the observed fault within its module.
    pub code: FaultCode,
    /// Status after the observation was evaluated.
    pub status: FaultStatus,
    /// Reference value held by the fault record.
    pub ref_value: RefValue,
}

/// Fixed-capacity ring buffer of [`LogEntry`] values.
///
/// ```rust
/// use faultbook::{EventLog, FaultStatus, LogEntry, ModuleId};
///
/// let mut log = EventLog::<2>::new();
/// for timestamp in 0..3 {
///     log.record(LogEntry {
///         timestamp,
///         module: ModuleId::new(1),
///         code: 0,
///         status: FaultStatus::Warning,
///         ref_value: 0,
///     });
/// }
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.entry(0).map(|e| e.timestamp), Some(2));
/// assert_eq!(log.entry(1).map(|e| e.timestamp), Some(1));
/// assert!(log.entry(2).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct EventLog<const LOG: usize> {
    entries: heapless::Deque<LogEntry, LOG>,
    recorded: u64,
}

impl<const LOG: usize> Default for EventLog<LOG> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LOG: usize> EventLog<LOG> {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: heapless::Deque::new(),
            recorded: 0,
        }
    }

    /// Append an entry, evicting the oldest one when full.
    pub fn record(&mut self, entry: LogEntry) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Only fails for a zero-capacity log, which keeps nothing anyway.
        if self.entries.push_back(entry).is_ok() {
            self.recorded = self.recorded.saturating_add(1);
        }
    }

    /// Entry at `index`, counting from the most recent (0) to the oldest
    /// retained (`len() - 1`).
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<LogEntry> {
        self.entries.iter().rev().nth(index).copied()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<LogEntry> {
        self.entries.back().copied()
    }

    /// Retained entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entry is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        LOG
    }

    /// Entries recorded since creation or the last [`EventLog::clear`],
    /// including evicted ones.
    #[must_use]
    pub fn total_recorded(&self) -> u64 {
        self.recorded
    }

    /// Entries lost to eviction.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.recorded.saturating_sub(self.entries.len() as u64)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recorded = 0;
    }
}
