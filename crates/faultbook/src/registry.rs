//! Module and fault configuration tables.
//!
//! Fault ids form a bump-allocated space: each registered module claims the
//! next contiguous block, so module ranges partition `0..fault_count()` in
//! registration order without gaps.

use crate::{
    FaultCode, FaultId, FaultPolicy, FaultbookError, FaultbookResult, GenericCode, ModuleId,
    Tolerance,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A registered module and the fault-id range it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleDescriptor {
    id: ModuleId,
    num_codes: u32,
    conf_offset: u32,
    tolerance: Tolerance,
}

impl ModuleDescriptor {
    /// The module id.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Number of fault codes reserved to this module.
    #[must_use]
    pub fn num_codes(&self) -> u32 {
        self.num_codes
    }

    /// First fault id owned by this module.
    #[must_use]
    pub fn conf_offset(&self) -> FaultId {
        FaultId::new(self.conf_offset)
    }

    /// Simultaneous ERROR faults tolerated before the module fails.
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Fault id of `code`, if the code belongs to this module.
    #[must_use]
    pub fn fault_id(&self, code: FaultCode) -> Option<FaultId> {
        if code >= self.num_codes {
            return None;
        }
        self.conf_offset.checked_add(code).map(FaultId::new)
    }

    /// Whether `id` lies in this module's range.
    #[must_use]
    pub fn contains(&self, id: FaultId) -> bool {
        id.get()
            .checked_sub(self.conf_offset)
            .is_some_and(|code| code < self.num_codes)
    }

    /// Every fault id owned by this module, in code order.
    pub fn fault_ids(&self) -> impl Iterator<Item = FaultId> + use<> {
        let start = self.conf_offset;
        let end = start.saturating_add(self.num_codes);
        (start..end).map(FaultId::new)
    }

    pub(crate) fn range(&self) -> (usize, usize) {
        (self.conf_offset as usize, self.num_codes as usize)
    }
}

/// Configuration of one fault id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaultConfig {
    id: FaultId,
    module: ModuleId,
    code: FaultCode,
    policy: FaultPolicy,
}

impl FaultConfig {
    /// The fault id.
    #[must_use]
    pub fn id(&self) -> FaultId {
        self.id
    }

    /// Module owning this fault.
    #[must_use]
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Code of this fault within its module.
    #[must_use]
    pub fn code(&self) -> FaultCode {
        self.code
    }

    /// Assigned policy.
    #[must_use]
    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }
}

/// Fixed-capacity module and fault configuration tables.
#[derive(Debug, Clone, Default)]
pub(crate) struct FaultRegistry<const MODULES: usize, const FAULTS: usize> {
    modules: heapless::Vec<ModuleDescriptor, MODULES>,
    faults: heapless::Vec<FaultConfig, FAULTS>,
}

impl<const MODULES: usize, const FAULTS: usize> FaultRegistry<MODULES, FAULTS> {
    pub(crate) const fn new() -> Self {
        Self {
            modules: heapless::Vec::new(),
            faults: heapless::Vec::new(),
        }
    }

    /// Empty both tables and register the generic module.
    ///
    /// Returns the number of fault ids the generic module claimed.
    pub(crate) fn boot(&mut self) -> FaultbookResult<usize> {
        self.modules.clear();
        self.faults.clear();
        let id = self.register(GenericCode::COUNT, Tolerance::NO_FAILURE)?;
        debug_assert_eq!(id, ModuleId::GENERIC);
        Ok(self.faults.len())
    }

    /// Append a module owning the next `code_count` fault ids, each with
    /// policy [`FaultPolicy::None`].
    ///
    /// Leaves both tables untouched on error.
    pub(crate) fn register(
        &mut self,
        code_count: u32,
        tolerance: Tolerance,
    ) -> FaultbookResult<ModuleId> {
        if self.modules.is_full() {
            return Err(FaultbookError::ModuleCapacityExceeded { capacity: MODULES });
        }

        let start = self.faults.len();
        let remaining = self.remaining();
        let capacity_exceeded = FaultbookError::FaultCapacityExceeded {
            requested: code_count,
            remaining,
        };
        let count = usize::try_from(code_count).map_err(|_| capacity_exceeded)?;
        if count > remaining {
            return Err(capacity_exceeded);
        }
        let conf_offset = u32::try_from(start).map_err(|_| capacity_exceeded)?;
        let module = ModuleId::new(u32::try_from(self.modules.len()).map_err(|_| {
            FaultbookError::ModuleCapacityExceeded { capacity: MODULES }
        })?);

        for code in 0..code_count {
            let config = FaultConfig {
                id: FaultId::new(conf_offset.saturating_add(code)),
                module,
                code,
                policy: FaultPolicy::None,
            };
            if self.faults.push(config).is_err() {
                self.faults.truncate(start);
                return Err(capacity_exceeded);
            }
        }

        let descriptor = ModuleDescriptor {
            id: module,
            num_codes: code_count,
            conf_offset,
            tolerance,
        };
        if self.modules.push(descriptor).is_err() {
            self.faults.truncate(start);
            return Err(FaultbookError::ModuleCapacityExceeded { capacity: MODULES });
        }

        Ok(module)
    }

    /// Map (module, code) to a fault id, falling back to
    /// [`FaultId::UNKNOWN`].
    pub(crate) fn resolve(&self, module: ModuleId, code: FaultCode) -> FaultId {
        self.module(module)
            .and_then(|descriptor| descriptor.fault_id(code))
            .unwrap_or(FaultId::UNKNOWN)
    }

    /// Replace the policy of `id` after validating it.
    ///
    /// Returns the previous policy.
    pub(crate) fn set_policy(
        &mut self,
        id: FaultId,
        policy: FaultPolicy,
    ) -> FaultbookResult<FaultPolicy> {
        let config = self
            .faults
            .get_mut(id.index())
            .ok_or(FaultbookError::InvalidId(id))?;
        policy.validate()?;
        Ok(core::mem::replace(&mut config.policy, policy))
    }

    pub(crate) fn module(&self, module: ModuleId) -> Option<&ModuleDescriptor> {
        self.modules.get(module.index())
    }

    pub(crate) fn fault(&self, id: FaultId) -> Option<&FaultConfig> {
        self.faults.get(id.index())
    }

    pub(crate) fn contains(&self, id: FaultId) -> bool {
        id.index() < self.faults.len()
    }

    pub(crate) fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    pub(crate) fn fault_count(&self) -> usize {
        self.faults.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        FAULTS.saturating_sub(self.faults.len())
    }
}
