//! Fixed-capacity fault bookkeeping.
//!
//! `faultbook` lets a program register named failure conditions ("faults"),
//! report pass/fail observations against them, and derive a health status
//! per fault and per group of faults ("module").
//!
//! # Architecture
//!
//! - **Clock**: injected time source ([`Clock`], [`ManualClock`])
//! - **FaultPolicy**: count- and time-based triggering rules with their own
//!   reset semantics
//! - **Registry**: module table and fault configuration table; every module
//!   owns a contiguous range of [`FaultId`]s
//! - **FaultRecord**: per-fault counters
//! - **Aggregation**: module health from the statuses of its faults
//! - **EventLog**: bounded history of recent observations
//! - **FaultBook**: the handle owning all of the above
//!
//! # RT-Safety
//!
//! - No heap allocations: every table is a fixed-capacity `heapless`
//!   container sized by const generics
//! - No blocking operations
//! - Bounded execution time, at worst linear in the module's fault count
//!
//! The engine is single-threaded; all mutations take `&mut self`.
//!
//! # State Machine
//!
//! ```text
//!            warn reached            err reached
//! ┌────────┐ ─────────────► ┌─────────┐ ─────────────► ┌───────┐
//! │ Normal │                │ Warning │                │ Error │
//! └────────┘ ◄───────────── └─────────┘                └───┬───┘
//!      ▲      policy reset                                 │
//!      └───────────────────────────────────────────────────┘
//!                policy reset or manual reset
//! ```
//!
//! # Example
//!
//! ```rust
//! use faultbook::prelude::*;
//!
//! let clock = ManualClock::new();
//! let mut book = FaultBook::new(clock.clone());
//!
//! let link = book.register_module(2, Tolerance::NO_FAILURE)?;
//! let timeout = book.resolve(link, 0);
//! book.set_policy(timeout, FaultPolicy::time_reset(100, 500, 50)?)?;
//!
//! clock.set(1_000);
//! book.update(timeout, 1, true);
//! clock.set(1_200);
//! assert_eq!(book.update(timeout, 2, true), FaultStatus::Warning);
//! assert_eq!(book.module_status(link), ModuleStatus::Warning);
//! # Ok::<(), FaultbookError>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod book;
mod clock;
mod error;
mod ids;
mod log;
mod policy;
mod record;
mod registry;
mod status;

pub mod prelude;

pub use aggregate::aggregate;
pub use book::{
    DEFAULT_FAULT_CAPACITY, DEFAULT_LOG_CAPACITY, DEFAULT_MODULE_CAPACITY, FaultBook,
};
pub use clock::Clock;
#[cfg(any(feature = "std", test))]
pub use clock::ManualClock;
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use error::{FaultbookError, FaultbookResult};
pub use ids::{Counter, FaultCode, FaultId, GenericCode, Millis, ModuleId, RefValue, Tolerance};
pub use log::{EventLog, LogEntry};
pub use policy::{Evaluation, FaultPolicy, PolicyKind};
pub use record::FaultRecord;
pub use registry::{FaultConfig, ModuleDescriptor};
pub use status::{FaultStatus, ModuleStatus};

#[cfg(test)]
mod tests;
