//! The fault book: registry, records and event log behind one handle.

use crate::aggregate::aggregate;
use crate::record::RecordStore;
use crate::registry::FaultRegistry;
use crate::{
    Clock, Counter, EventLog, FaultCode, FaultConfig, FaultId, FaultPolicy, FaultRecord,
    FaultStatus, FaultbookError, FaultbookResult, GenericCode, LogEntry, Millis,
    ModuleDescriptor, ModuleId, ModuleStatus, RefValue, Tolerance,
};

/// Default maximum number of modules, the generic module included.
pub const DEFAULT_MODULE_CAPACITY: usize = 16;

/// Default maximum number of fault ids, the generic codes included.
pub const DEFAULT_FAULT_CAPACITY: usize = 128;

/// Default number of retained log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 2;

/// Fault bookkeeping engine.
///
/// Owns the module table, the fault configuration table, the per-fault
/// records and the event log. Capacities are fixed at compile time and no
/// operation allocates.
///
/// # Concurrency
///
/// Every mutation takes `&mut self`; a multi-threaded host serializes
/// access by wrapping the book in a single lock.
///
/// # Example
///
/// ```rust
/// use faultbook::{FaultBook, FaultPolicy, FaultStatus, ManualClock, ModuleStatus, Tolerance};
///
/// let clock = ManualClock::new();
/// let mut book = FaultBook::new(clock.clone());
///
/// let sensors = book.register_module(3, Tolerance::new(1))?;
/// let overheat = book.resolve(sensors, 0);
/// book.set_policy(overheat, FaultPolicy::count_absolute(1, 2)?)?;
///
/// assert_eq!(book.update(overheat, 0, false), FaultStatus::Normal);
/// assert_eq!(book.update(overheat, 71, true), FaultStatus::Warning);
/// assert_eq!(book.update(overheat, 83, true), FaultStatus::Error);
/// assert_eq!(book.module_status(sensors), ModuleStatus::Faulted);
/// assert_eq!(book.ref_value(overheat), 83);
/// # Ok::<(), faultbook::FaultbookError>(())
/// ```
#[derive(Debug)]
pub struct FaultBook<
    C,
    const MODULES: usize = { DEFAULT_MODULE_CAPACITY },
    const FAULTS: usize = { DEFAULT_FAULT_CAPACITY },
    const LOG: usize = { DEFAULT_LOG_CAPACITY },
> {
    clock: C,
    last_now: Millis,
    registry: FaultRegistry<MODULES, FAULTS>,
    records: RecordStore<FAULTS>,
    log: EventLog<LOG>,
}

impl<C: Clock> FaultBook<C> {
    /// Create a book with the default capacities, in its boot state.
    pub fn new(clock: C) -> Self {
        Self::with_capacity(clock)
    }
}

impl<C: Clock, const MODULES: usize, const FAULTS: usize, const LOG: usize>
    FaultBook<C, MODULES, FAULTS, LOG>
{
    const CAPACITY_CHECK: () = {
        assert!(MODULES >= 1, "the generic module needs one module slot");
        assert!(
            FAULTS >= GenericCode::COUNT as usize,
            "the generic codes need two fault slots"
        );
        assert!(FAULTS <= u32::MAX as usize, "fault ids are 32-bit");
        assert!(MODULES <= u32::MAX as usize, "module ids are 32-bit");
        assert!(LOG >= 1, "the event log needs at least one slot");
    };

    /// Maximum number of modules.
    pub const MODULE_CAPACITY: usize = MODULES;
    /// Maximum number of fault ids.
    pub const FAULT_CAPACITY: usize = FAULTS;
    /// Number of retained log entries.
    pub const LOG_CAPACITY: usize = LOG;

    /// Create a book with the capacities given by the type parameters, in
    /// its boot state.
    ///
    /// ```rust
    /// use faultbook::{FaultBook, ManualClock};
    ///
    /// let book: FaultBook<_, 4, 32, 8> = FaultBook::with_capacity(ManualClock::new());
    /// assert_eq!(book.module_count(), 1);
    /// assert_eq!(book.log().capacity(), 8);
    /// ```
    pub fn with_capacity(clock: C) -> Self {
        let () = Self::CAPACITY_CHECK;
        let mut book = Self {
            clock,
            last_now: 0,
            registry: FaultRegistry::new(),
            records: RecordStore::new(),
            log: EventLog::new(),
        };
        book.init();
        book
    }

    /// Restore the boot state.
    ///
    /// Only the generic module remains, holding [`GenericCode::Unknown`] and
    /// [`GenericCode::All`] with policy [`FaultPolicy::None`] and
    /// [`Tolerance::NO_FAILURE`]. The event log is emptied.
    pub fn init(&mut self) {
        self.records.clear();
        match self.registry.boot() {
            Ok(generic_codes) => {
                self.sync_records();
                tracing::debug!(generic_codes, "Fault book initialized");
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to register the generic module");
            }
        }
        self.log.clear();
        self.last_now = 0;
    }

    /// Register a module owning `code_count` fault codes.
    ///
    /// The module claims the next contiguous block of fault ids, each set to
    /// [`FaultPolicy::None`] with a fresh record.
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::ModuleCapacityExceeded`] when the module
    /// table is full and [`FaultbookError::FaultCapacityExceeded`] when the
    /// codes do not fit in the remaining fault ids. Nothing changes on error.
    pub fn register_module(
        &mut self,
        code_count: u32,
        tolerance: Tolerance,
    ) -> FaultbookResult<ModuleId> {
        let module = self
            .registry
            .register(code_count, tolerance)
            .inspect_err(|err| {
                tracing::warn!(code_count, error = %err, "Module registration rejected");
            })?;
        self.sync_records();

        tracing::debug!(
            module_id = module.get(),
            code_count,
            tolerance = tolerance.get(),
            "Module registered"
        );
        Ok(module)
    }

    /// Fault id of `code` in `module`.
    ///
    /// Unknown modules and codes outside the module's range resolve to
    /// [`FaultId::UNKNOWN`].
    #[must_use]
    pub fn resolve(&self, module: ModuleId, code: FaultCode) -> FaultId {
        self.registry.resolve(module, code)
    }

    /// Assign a policy to `id` and reset its record.
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::InvalidId`] for an unconfigured id and
    /// [`FaultbookError::InvalidThresholds`] when the policy violates its
    /// ordering constraints. Nothing changes on error.
    pub fn set_policy(&mut self, id: FaultId, policy: FaultPolicy) -> FaultbookResult<()> {
        let previous = self.registry.set_policy(id, policy).inspect_err(|err| {
            tracing::warn!(fault_id = id.get(), error = %err, "Policy rejected");
        })?;
        self.records.reset(id);

        tracing::debug!(
            fault_id = id.get(),
            previous = %previous.kind(),
            policy = %policy.kind(),
            "Policy assigned"
        );
        Ok(())
    }

    /// Report one observation against `id` and return the resulting status.
    ///
    /// `is_fault` is true for a failed check. `ref_value` is kept on the
    /// record for fault observations only. Ids that do not name a configured
    /// fault are counted against [`FaultId::UNKNOWN`].
    ///
    /// The policy is evaluated after the counters are updated and may reset
    /// the record; one [`LogEntry`] is recorded per call.
    pub fn update(&mut self, id: FaultId, ref_value: RefValue, is_fault: bool) -> FaultStatus {
        let id = if self.registry.contains(id) {
            id
        } else {
            tracing::warn!(fault_id = id.get(), "Unknown fault id, counting as generic unknown");
            FaultId::UNKNOWN
        };
        let now = self.tick();

        let Some(config) = self.registry.fault(id).copied() else {
            tracing::error!(fault_id = id.get(), "Generic unknown fault is not configured");
            return FaultStatus::Normal;
        };
        let Some(record) = self.records.get_mut(id) else {
            tracing::error!(fault_id = id.get(), "Fault record missing");
            return FaultStatus::Normal;
        };

        let previous = record.status();
        if record.observe(now, ref_value, is_fault) {
            tracing::trace!(fault_id = id.get(), "Observation counter overflowed, record reseeded");
        }
        let evaluation = config.policy().evaluate(record, now);
        record.set_status(evaluation.status);
        let status = evaluation.status;
        let ref_value = record.ref_value();

        if evaluation.was_reset {
            tracing::debug!(fault_id = id.get(), policy = %config.policy().kind(), "Policy reset fault record");
        }
        if status != previous {
            if status.is_error() {
                tracing::warn!(
                    module_id = config.module().get(),
                    code = config.code(),
                    previous = %previous,
                    status = %status,
                    ref_value,
                    "Fault entered error state"
                );
            } else {
                tracing::debug!(
                    module_id = config.module().get(),
                    code = config.code(),
                    previous = %previous,
                    status = %status,
                    "Fault status changed"
                );
            }
        }

        self.log.record(LogEntry {
            timestamp: now,
            module: config.module(),
            code: config.code(),
            status,
            ref_value,
        });
        status
    }

    /// Resolve `(module, code)` and report one observation against it.
    pub fn report(
        &mut self,
        module: ModuleId,
        code: FaultCode,
        ref_value: RefValue,
        is_fault: bool,
    ) -> FaultStatus {
        let id = self.resolve(module, code);
        self.update(id, ref_value, is_fault)
    }

    /// Zero the record of `id` and return it to [`FaultStatus::Normal`].
    /// The policy is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FaultbookError::InvalidId`] for an unconfigured id.
    pub fn reset(&mut self, id: FaultId) -> FaultbookResult<()> {
        if !self.registry.contains(id) || !self.records.reset(id) {
            return Err(FaultbookError::InvalidId(id));
        }
        tracing::debug!(fault_id = id.get(), "Fault record reset");
        Ok(())
    }

    /// Fault observations counted on `id` since its last reset; 0 for an
    /// unconfigured id.
    #[must_use]
    pub fn count_errors(&self, id: FaultId) -> Counter {
        self.record(id).map_or(0, FaultRecord::errors)
    }

    /// Reference value of the last fault observation on `id`; 0 for an
    /// unconfigured id.
    #[must_use]
    pub fn ref_value(&self, id: FaultId) -> RefValue {
        self.record(id).map_or(0, FaultRecord::ref_value)
    }

    /// Current status of `id`; [`FaultStatus::Normal`] for an unconfigured
    /// id.
    #[must_use]
    pub fn status(&self, id: FaultId) -> FaultStatus {
        self.record(id).map_or(FaultStatus::Normal, FaultRecord::status)
    }

    /// Counters of `id`.
    #[must_use]
    pub fn record(&self, id: FaultId) -> Option<&FaultRecord> {
        if !self.registry.contains(id) {
            return None;
        }
        self.records.get(id)
    }

    /// Configuration of `id`.
    #[must_use]
    pub fn fault_config(&self, id: FaultId) -> Option<&FaultConfig> {
        self.registry.fault(id)
    }

    /// Policy assigned to `id`.
    #[must_use]
    pub fn policy(&self, id: FaultId) -> Option<FaultPolicy> {
        self.registry.fault(id).map(FaultConfig::policy)
    }

    /// Health of `module`, recomputed from its faults.
    ///
    /// An unknown module is reported as [`ModuleStatus::Failed`].
    #[must_use]
    pub fn module_status(&self, module: ModuleId) -> ModuleStatus {
        let Some(descriptor) = self.registry.module(module) else {
            return ModuleStatus::Failed;
        };
        let (start, len) = descriptor.range();
        aggregate(
            self.records
                .range(start, len)
                .iter()
                .map(FaultRecord::status),
            descriptor.tolerance(),
        )
    }

    /// Descriptor of `module`.
    #[must_use]
    pub fn module(&self, module: ModuleId) -> Option<&ModuleDescriptor> {
        self.registry.module(module)
    }

    /// Fault ids owned by `module`; empty for an unknown module.
    pub fn module_faults(&self, module: ModuleId) -> impl Iterator<Item = FaultId> + use<C, MODULES, FAULTS, LOG> {
        self.registry
            .module(module)
            .copied()
            .into_iter()
            .flat_map(|descriptor| descriptor.fault_ids())
    }

    /// Registered modules, the generic module first.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDescriptor] {
        self.registry.modules()
    }

    /// Number of registered modules, the generic module included.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.registry.modules().len()
    }

    /// Number of allocated fault ids, the generic codes included.
    #[must_use]
    pub fn fault_count(&self) -> usize {
        self.registry.fault_count()
    }

    /// The event log.
    #[must_use]
    pub fn log(&self) -> &EventLog<LOG> {
        &self.log
    }

    /// Number of retained log entries.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Log entry at `index`, 0 being the most recent.
    #[must_use]
    pub fn log_entry(&self, index: usize) -> Option<LogEntry> {
        self.log.entry(index)
    }

    /// Empty the event log.
    pub fn clear_log(&mut self) {
        tracing::debug!(dropped = self.log.len(), "Event log cleared");
        self.log.clear();
    }

    /// The injected clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Read the clock, never going back in time.
    fn tick(&mut self) -> Millis {
        let now = self.clock.now_ms();
        if now < self.last_now {
            tracing::warn!(now, last = self.last_now, "Clock went backwards, clamping");
            return self.last_now;
        }
        self.last_now = now;
        now
    }

    fn sync_records(&mut self) {
        let missing = self.registry.fault_count().saturating_sub(self.records.len());
        if !self.records.extend_fresh(missing) {
            tracing::error!(missing, "Record store out of step with the fault table");
        }
    }
}
