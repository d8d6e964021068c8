//! Identifiers and scalar types shared by every table.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Abstract milliseconds as reported by a [`Clock`](crate::Clock).
pub type Millis = u64;

/// Observation counter.
pub type Counter = u64;

/// Opaque caller-supplied value attached to fault observations.
pub type RefValue = i64;

/// Fault code, local to its module (`0..num_codes`).
pub type FaultCode = u32;

/// Position of a module in the module table.
///
/// Module ids are handed out by
/// [`FaultBook::register_module`](crate::FaultBook::register_module) in
/// strictly increasing order starting at 1; id 0 is the generic module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleId(u32);

impl ModuleId {
    /// The reserved module holding the generic fault codes.
    pub const GENERIC: ModuleId = ModuleId(0);

    /// Wrap a raw module index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw module index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

/// Position of a fault in the configuration and record tables.
///
/// A fault id is `conf_offset(module) + code`; obtain one through
/// [`FaultBook::resolve`](crate::FaultBook::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaultId(u32);

impl FaultId {
    /// Catch-all id for unresolved (module, code) pairs and unknown ids.
    pub const UNKNOWN: FaultId = FaultId(GenericCode::Unknown as u32);

    /// Wrap a raw fault index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw fault index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault#{}", self.0)
    }
}

/// Codes of the generic module, registered at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum GenericCode {
    /// Observations that could not be attributed to a registered fault.
    Unknown = 0,
    /// Observations concerning the whole system.
    All = 1,
}

impl GenericCode {
    /// Number of codes owned by the generic module.
    pub const COUNT: u32 = 2;

    /// The code as a plain [`FaultCode`].
    #[must_use]
    pub const fn code(self) -> FaultCode {
        self as FaultCode
    }
}

/// Maximum number of simultaneous ERROR faults a module accepts before it
/// is considered failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tolerance(u32);

impl Tolerance {
    /// No failure tolerated: a single ERROR fault fails the module.
    pub const NO_FAILURE: Tolerance = Tolerance(0);

    /// Tolerate up to `errors` simultaneous ERROR faults.
    #[must_use]
    pub const fn new(errors: u32) -> Self {
        Self(errors)
    }

    /// The tolerated number of ERROR faults.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Tolerance {
    fn from(errors: u32) -> Self {
        Self(errors)
    }
}
