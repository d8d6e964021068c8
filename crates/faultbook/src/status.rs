//! Fault and module health states.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Health of a single fault, as computed by its policy.
///
/// Variants are ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultStatus {
    /// No fault.
    #[default]
    Normal,
    /// First threshold reached.
    Warning,
    /// Second threshold reached.
    Error,
}

impl FaultStatus {
    /// Returns true for [`FaultStatus::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, FaultStatus::Error)
    }

    /// Returns true for anything other than [`FaultStatus::Normal`].
    #[must_use]
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, FaultStatus::Normal)
    }
}

impl fmt::Display for FaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultStatus::Normal => write!(f, "Normal"),
            FaultStatus::Warning => write!(f, "Warning"),
            FaultStatus::Error => write!(f, "Error"),
        }
    }
}

/// Health of a module, derived from the statuses of its faults.
///
/// ```text
/// Normal  <= every fault Normal
/// Warning <= some fault Warning, no fault Error
/// Faulted <= 0 < #errors <= tolerance
/// Failed  <= #errors > tolerance, or unknown module
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModuleStatus {
    /// No fault in the module.
    #[default]
    Normal,
    /// Some faults in warning.
    Warning,
    /// Some faults in error, within the tolerance.
    Faulted,
    /// Errors over the tolerance.
    Failed,
}

impl ModuleStatus {
    /// Returns true if the module can still be relied upon.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        !matches!(self, ModuleStatus::Failed)
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleStatus::Normal => write!(f, "Normal"),
            ModuleStatus::Warning => write!(f, "Warning"),
            ModuleStatus::Faulted => write!(f, "Faulted"),
            ModuleStatus::Failed => write!(f, "Failed"),
        }
    }
}
