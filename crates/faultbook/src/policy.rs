//! Triggering policies and their evaluation.
//!
//! A policy maps the counters of a [`FaultRecord`] to a [`FaultStatus`].
//! Evaluation runs once per observation, after the counters have been
//! committed, and may reset the record first; the returned status always
//! reflects that reset.
//!
//! All three threshold policies share the same classification:
//!
//! ```text
//! value <  warn                 -> Normal
//! value >= warn                 -> Warning
//! value >= err  (and err >= warn) -> Error
//! ```
//!
//! where `value` is the error count for the count policies and the duration
//! of the current error run for [`FaultPolicy::TimeReset`].

use core::fmt;

use crate::{Counter, FaultRecord, FaultStatus, FaultbookError, FaultbookResult, Millis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rule mapping accumulated observations to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultPolicy {
    /// Never triggers. Used to neutralize a fault id.
    #[default]
    None,
    /// Trigger on the absolute number of faults. Never resets by itself.
    CountAbsolute {
        /// Fault count for [`FaultStatus::Warning`].
        warn: Counter,
        /// Fault count for [`FaultStatus::Error`].
        err: Counter,
    },
    /// As [`FaultPolicy::CountAbsolute`], but the record is reset after
    /// `reset` consecutive non-fault observations.
    CountReset {
        /// Fault count for [`FaultStatus::Warning`].
        warn: Counter,
        /// Fault count for [`FaultStatus::Error`].
        err: Counter,
        /// Length of the clear streak that resets the record.
        reset: Counter,
    },
    /// Trigger on how long a fault condition has persisted. The record is
    /// reset once only clean observations were seen for `reset_ms` since
    /// the last fault.
    TimeReset {
        /// Error run duration for [`FaultStatus::Warning`].
        warn_ms: Millis,
        /// Error run duration for [`FaultStatus::Error`].
        err_ms: Millis,
        /// Clean period that resets the record.
        reset_ms: Millis,
    },
}

/// Policy discriminant, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyKind {
    /// [`FaultPolicy::None`]
    None,
    /// [`FaultPolicy::CountAbsolute`]
    CountAbsolute,
    /// [`FaultPolicy::CountReset`]
    CountReset,
    /// [`FaultPolicy::TimeReset`]
    TimeReset,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::None => write!(f, "none"),
            PolicyKind::CountAbsolute => write!(f, "count-absolute"),
            PolicyKind::CountReset => write!(f, "count-reset"),
            PolicyKind::TimeReset => write!(f, "time-reset"),
        }
    }
}

impl FaultPolicy {
    /// Validated [`FaultPolicy::CountAbsolute`].
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::InvalidThresholds`] unless
    /// `warn >= 1` and `err >= warn`.
    pub fn count_absolute(warn: Counter, err: Counter) -> FaultbookResult<Self> {
        let policy = FaultPolicy::CountAbsolute { warn, err };
        policy.validate()?;
        Ok(policy)
    }

    /// Validated [`FaultPolicy::CountReset`].
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::InvalidThresholds`] unless `warn >= 1`,
    /// `err >= warn` and `reset >= 1`.
    pub fn count_reset(warn: Counter, err: Counter, reset: Counter) -> FaultbookResult<Self> {
        let policy = FaultPolicy::CountReset { warn, err, reset };
        policy.validate()?;
        Ok(policy)
    }

    /// Validated [`FaultPolicy::TimeReset`].
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::InvalidThresholds`] unless `warn_ms >= 1`,
    /// `err_ms >= warn_ms` and `reset_ms >= 1`.
    pub fn time_reset(warn_ms: Millis, err_ms: Millis, reset_ms: Millis) -> FaultbookResult<Self> {
        let policy = FaultPolicy::TimeReset {
            warn_ms,
            err_ms,
            reset_ms,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// The policy discriminant.
    #[must_use]
    pub fn kind(&self) -> PolicyKind {
        match self {
            FaultPolicy::None => PolicyKind::None,
            FaultPolicy::CountAbsolute { .. } => PolicyKind::CountAbsolute,
            FaultPolicy::CountReset { .. } => PolicyKind::CountReset,
            FaultPolicy::TimeReset { .. } => PolicyKind::TimeReset,
        }
    }

    /// Check the threshold ordering constraints.
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::InvalidThresholds`] naming the first
    /// violated constraint.
    pub fn validate(&self) -> FaultbookResult<()> {
        let kind = self.kind();
        match *self {
            FaultPolicy::None => Ok(()),
            FaultPolicy::CountAbsolute { warn, err } => check_ordering(kind, warn, err),
            FaultPolicy::CountReset { warn, err, reset } => {
                check_ordering(kind, warn, err)?;
                if reset < 1 {
                    return Err(FaultbookError::invalid_thresholds(kind, "reset must be >= 1"));
                }
                Ok(())
            }
            FaultPolicy::TimeReset {
                warn_ms,
                err_ms,
                reset_ms,
            } => {
                check_ordering(kind, warn_ms, err_ms)?;
                if reset_ms < 1 {
                    return Err(FaultbookError::invalid_thresholds(kind, "reset must be >= 1"));
                }
                Ok(())
            }
        }
    }

    /// Compute the status of `record`, applying this policy's reset rule
    /// first.
    ///
    /// `now` is only consulted by [`FaultPolicy::TimeReset`]. Returns the
    /// status and whether the record was reset.
    pub fn evaluate(&self, record: &mut FaultRecord, now: Millis) -> Evaluation {
        match *self {
            FaultPolicy::None => Evaluation::kept(FaultStatus::Normal),
            FaultPolicy::CountAbsolute { warn, err } => {
                Evaluation::kept(classify(record.errors(), warn, err))
            }
            FaultPolicy::CountReset { warn, err, reset } => {
                let was_reset = record.clear_streak() >= reset;
                if was_reset {
                    record.reset();
                }
                Evaluation {
                    status: classify(record.errors(), warn, err),
                    was_reset,
                }
            }
            FaultPolicy::TimeReset {
                warn_ms,
                err_ms,
                reset_ms,
            } => {
                let quiet_for = now.saturating_sub(record.last_fault_ms());
                let was_reset = record.clear_streak() > 0 && quiet_for >= reset_ms;
                if was_reset {
                    record.reset();
                }
                Evaluation {
                    status: classify(record.fault_duration_ms(), warn_ms, err_ms),
                    was_reset,
                }
            }
        }
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Status to store on the record.
    pub status: FaultStatus,
    /// Whether the policy reset the record before computing the status.
    pub was_reset: bool,
}

impl Evaluation {
    fn kept(status: FaultStatus) -> Self {
        Self {
            status,
            was_reset: false,
        }
    }
}

fn check_ordering(kind: PolicyKind, warn: u64, err: u64) -> FaultbookResult<()> {
    if warn < 1 {
        return Err(FaultbookError::invalid_thresholds(kind, "warning threshold must be >= 1"));
    }
    if err < warn {
        return Err(FaultbookError::invalid_thresholds(
            kind,
            "error threshold must be >= warning threshold",
        ));
    }
    Ok(())
}

/// Shared threshold classification.
///
/// The `err >= warn` guard keeps an error threshold below the warning one
/// from ever reporting [`FaultStatus::Error`].
fn classify(value: u64, warn: u64, err: u64) -> FaultStatus {
    if value < warn {
        FaultStatus::Normal
    } else if err >= warn && value >= err {
        FaultStatus::Error
    } else {
        FaultStatus::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faults(record: &mut FaultRecord, now: Millis, n: u32) {
        for _ in 0..n {
            record.observe(now, 0, true);
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(0, 1, 2), FaultStatus::Normal);
        assert_eq!(classify(1, 1, 2), FaultStatus::Warning);
        assert_eq!(classify(2, 1, 2), FaultStatus::Error);
        assert_eq!(classify(9, 1, 2), FaultStatus::Error);
        // err == warn: every warning is an error
        assert_eq!(classify(3, 3, 3), FaultStatus::Error);
        // err below warn never reaches Error
        assert_eq!(classify(100, 3, 0), FaultStatus::Warning);
    }

    #[test]
    fn test_validated_constructors() {
        assert!(FaultPolicy::count_absolute(1, 2).is_ok());
        assert!(FaultPolicy::count_absolute(2, 2).is_ok());
        assert!(FaultPolicy::count_absolute(0, 2).is_err());
        assert!(FaultPolicy::count_absolute(2, 1).is_err());
        assert!(FaultPolicy::count_absolute(1, 0).is_err());

        assert!(FaultPolicy::count_reset(1, 2, 2).is_ok());
        assert!(FaultPolicy::count_reset(2, 1, 2).is_err());
        assert!(FaultPolicy::count_reset(1, 2, 0).is_err());

        assert!(FaultPolicy::time_reset(4, 5, 3).is_ok());
        assert!(FaultPolicy::time_reset(0, 5, 3).is_err());
        assert!(FaultPolicy::time_reset(2, 1, 2).is_err());
        assert!(FaultPolicy::time_reset(1, 2, 0).is_err());
    }

    #[test]
    fn test_validation_error_names_policy() {
        let err = FaultPolicy::count_reset(1, 2, 0).err();
        assert_eq!(
            err,
            Some(FaultbookError::invalid_thresholds(
                PolicyKind::CountReset,
                "reset must be >= 1"
            ))
        );
    }

    #[test]
    fn test_none_is_always_normal() {
        let mut r = FaultRecord::new();
        faults(&mut r, 0, 50);
        let eval = FaultPolicy::None.evaluate(&mut r, 0);
        assert_eq!(eval.status, FaultStatus::Normal);
        assert!(!eval.was_reset);
        assert_eq!(r.errors(), 50);
    }

    #[test]
    fn test_count_absolute_never_resets() {
        let policy = FaultPolicy::CountAbsolute { warn: 1, err: 2 };
        let mut r = FaultRecord::new();
        faults(&mut r, 0, 2);
        for _ in 0..100 {
            r.observe(0, 0, false);
        }
        let eval = policy.evaluate(&mut r, 0);
        assert_eq!(eval.status, FaultStatus::Error);
        assert!(!eval.was_reset);
    }

    #[test]
    fn test_count_reset_on_clear_streak() {
        let policy = FaultPolicy::CountReset {
            warn: 1,
            err: 2,
            reset: 2,
        };
        let mut r = FaultRecord::new();
        faults(&mut r, 0, 2);
        assert_eq!(policy.evaluate(&mut r, 0).status, FaultStatus::Error);

        r.observe(0, 0, false);
        assert_eq!(policy.evaluate(&mut r, 0).status, FaultStatus::Error);

        r.observe(0, 0, false);
        let eval = policy.evaluate(&mut r, 0);
        assert_eq!(eval.status, FaultStatus::Normal);
        assert!(eval.was_reset);
        assert_eq!(r.errors(), 0);
        assert_eq!(r.total(), 0);
    }

    #[test]
    fn test_time_reset_waits_for_clean_observation() {
        let policy = FaultPolicy::TimeReset {
            warn_ms: 4,
            err_ms: 5,
            reset_ms: 3,
        };
        let mut r = FaultRecord::new();
        r.observe(1, 0, true);
        r.observe(7, 0, true);
        assert_eq!(policy.evaluate(&mut r, 7).status, FaultStatus::Error);

        // Long after the last fault, but no clean observation yet
        let eval = policy.evaluate(&mut r, 100);
        assert_eq!(eval.status, FaultStatus::Error);
        assert!(!eval.was_reset);

        r.observe(100, 0, false);
        let eval = policy.evaluate(&mut r, 100);
        assert_eq!(eval.status, FaultStatus::Normal);
        assert!(eval.was_reset);
    }

    #[test]
    fn test_time_reset_measures_duration_not_count() {
        let policy = FaultPolicy::TimeReset {
            warn_ms: 10,
            err_ms: 20,
            reset_ms: 5,
        };
        let mut r = FaultRecord::new();
        faults(&mut r, 3, 1000);
        assert_eq!(policy.evaluate(&mut r, 3).status, FaultStatus::Normal);
    }

    #[test]
    fn test_kind() {
        assert_eq!(FaultPolicy::None.kind(), PolicyKind::None);
        assert_eq!(
            FaultPolicy::TimeReset {
                warn_ms: 1,
                err_ms: 1,
                reset_ms: 1
            }
            .kind(),
            PolicyKind::TimeReset
        );
        assert_eq!(PolicyKind::CountAbsolute.to_string(), "count-absolute");
    }
}
