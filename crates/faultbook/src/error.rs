//! Error types for faultbook operations.

use crate::{FaultId, PolicyKind};
use thiserror::Error;

/// Faultbook operation errors.
///
/// Errors carry only static data, so building and returning one never
/// allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaultbookError {
    /// The module table is full.
    #[error("module table full: capacity is {capacity} modules")]
    ModuleCapacityExceeded {
        /// Module table capacity.
        capacity: usize,
    },

    /// Not enough fault ids left for the requested module.
    #[error("fault id space exhausted: {requested} codes requested, {remaining} ids left")]
    FaultCapacityExceeded {
        /// Number of codes requested.
        requested: u32,
        /// Unallocated fault ids.
        remaining: usize,
    },

    /// The fault id does not name a configured fault.
    #[error("invalid fault id {0}")]
    InvalidId(FaultId),

    /// Policy thresholds violate their ordering constraints.
    #[error("invalid {policy} thresholds: {reason}")]
    InvalidThresholds {
        /// Policy being configured.
        policy: PolicyKind,
        /// Violated constraint.
        reason: &'static str,
    },
}

/// Result type for faultbook operations.
pub type FaultbookResult<T> = Result<T, FaultbookError>;

impl FaultbookError {
    /// Create an invalid thresholds error.
    #[must_use]
    pub fn invalid_thresholds(policy: PolicyKind, reason: &'static str) -> Self {
        Self::InvalidThresholds { policy, reason }
    }

    /// Check if this error reports a full table.
    #[must_use]
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(
            self,
            FaultbookError::ModuleCapacityExceeded { .. }
                | FaultbookError::FaultCapacityExceeded { .. }
        )
    }

    /// Check if this error reports an out-of-range id.
    #[must_use]
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, FaultbookError::InvalidId(_))
    }

    /// Check if this error reports a rejected policy configuration.
    #[must_use]
    pub fn is_invalid_thresholds(&self) -> bool {
        matches!(self, FaultbookError::InvalidThresholds { .. })
    }
}
