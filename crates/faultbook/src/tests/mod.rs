//! In-crate test suites.
