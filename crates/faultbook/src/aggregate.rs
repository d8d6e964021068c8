//! Module-level health aggregation.

use crate::{FaultStatus, ModuleStatus, Tolerance};

/// Summarize the statuses of a module's faults.
///
/// Warnings only matter while no error is present: `0 < errors <= tolerance`
/// yields [`ModuleStatus::Faulted`], `errors > tolerance` yields
/// [`ModuleStatus::Failed`]. With [`Tolerance::NO_FAILURE`] a single error
/// fails the module.
pub fn aggregate<I>(statuses: I, tolerance: Tolerance) -> ModuleStatus
where
    I: IntoIterator<Item = FaultStatus>,
{
    let mut errors: u64 = 0;
    let mut warned = false;

    for status in statuses {
        match status {
            FaultStatus::Normal => {}
            FaultStatus::Warning => warned = true,
            FaultStatus::Error => errors = errors.saturating_add(1),
        }
    }

    if errors > u64::from(tolerance.get()) {
        ModuleStatus::Failed
    } else if errors > 0 {
        ModuleStatus::Faulted
    } else if warned {
        ModuleStatus::Warning
    } else {
        ModuleStatus::Normal
    }
}
