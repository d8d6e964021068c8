//! Prelude for convenient imports.
//!
//! ```rust
//! use faultbook::prelude::*;
//! ```

pub use crate::{
    Clock, DEFAULT_FAULT_CAPACITY, DEFAULT_LOG_CAPACITY, DEFAULT_MODULE_CAPACITY, EventLog,
    FaultBook, FaultCode, FaultId, FaultPolicy, FaultRecord, FaultStatus, FaultbookError,
    FaultbookResult, GenericCode, LogEntry, Millis, ModuleId, ModuleStatus, PolicyKind, RefValue,
    Tolerance,
};

#[cfg(any(feature = "std", test))]
pub use crate::ManualClock;
