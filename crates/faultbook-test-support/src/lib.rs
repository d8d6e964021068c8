//! Shared test utilities for faultbook.
//!
//! - [`mod@must`]: `#[track_caller]` unwrap helpers for tests
//! - [`alloc`]: counting global allocator for no-allocation checks
//! - [`capture`]: in-memory `tracing` subscriber for asserting on logs
//!
//! ```toml
//! [dev-dependencies]
//! faultbook-test-support = { path = "crates/faultbook-test-support" }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod must;

#[cfg(feature = "alloc-tracking")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc-tracking")))]
pub mod alloc;

#[cfg(feature = "log-capture")]
#[cfg_attr(docsrs, doc(cfg(feature = "log-capture")))]
pub mod capture;

#[cfg(all(test, feature = "alloc-tracking"))]
#[global_allocator]
static GLOBAL_TEST: alloc::CountingAllocator = alloc::CountingAllocator;

pub use must::{must, must_some, must_with};

#[cfg(feature = "alloc-tracking")]
pub use alloc::{AllocScope, count_allocations};

#[cfg(feature = "log-capture")]
pub use capture::{CapturedEvent, capture_logs};
