//! End-to-end fault lifecycle tests through the public API.

use faultbook::prelude::*;
use faultbook_test_support::{must, must_some};

#[test]
fn test_link_timeout_lifecycle() -> Result<(), FaultbookError> {
    let clock = ManualClock::starting_at(10_000);
    let mut book = FaultBook::new(clock.clone());

    // 1. Configure a link module with a debounced timeout fault
    let link = book.register_module(2, Tolerance::NO_FAILURE)?;
    let timeout = book.resolve(link, 0);
    let crc = book.resolve(link, 1);
    book.set_policy(timeout, FaultPolicy::time_reset(100, 300, 200)?)?;
    book.set_policy(crc, FaultPolicy::count_reset(3, 5, 10)?)?;
    assert_eq!(book.module_status(link), ModuleStatus::Normal);

    // 2. Healthy traffic
    for _ in 0..5 {
        clock.advance(20);
        assert_eq!(book.update(timeout, 0, false), FaultStatus::Normal);
        assert_eq!(book.update(crc, 0, false), FaultStatus::Normal);
    }

    // 3. Link drops out; the timeout persists
    let outage_start = clock.now_ms();
    book.update(timeout, 1, true);
    clock.advance(150);
    assert_eq!(book.update(timeout, 2, true), FaultStatus::Warning);
    assert_eq!(book.module_status(link), ModuleStatus::Warning);

    clock.advance(150);
    assert_eq!(book.update(timeout, 3, true), FaultStatus::Error);
    assert_eq!(book.module_status(link), ModuleStatus::Failed);

    let record = *must_some(book.record(timeout), "timeout record");
    assert_eq!(record.first_fault_ms(), outage_start);
    assert_eq!(record.fault_duration_ms(), 300);
    assert_eq!(record.errors(), 3);
    assert_eq!(book.ref_value(timeout), 3);

    // 4. Link recovers; the error holds until the quiet period elapses
    clock.advance(100);
    assert_eq!(book.update(timeout, 0, false), FaultStatus::Error);
    clock.advance(100);
    assert_eq!(book.update(timeout, 0, false), FaultStatus::Normal);
    assert_eq!(book.module_status(link), ModuleStatus::Normal);
    assert_eq!(book.count_errors(timeout), 0);

    Ok(())
}

#[test]
fn test_sensor_bank_with_tolerance() -> Result<(), FaultbookError> {
    let mut book = FaultBook::new(ManualClock::new());
    let bank = book.register_module(4, Tolerance::new(2))?;

    let channels: Vec<FaultId> = book.module_faults(bank).collect();
    for &id in &channels {
        book.set_policy(id, FaultPolicy::count_absolute(1, 2)?)?;
    }

    let expected = [
        ModuleStatus::Faulted,
        ModuleStatus::Faulted,
        ModuleStatus::Failed,
        ModuleStatus::Failed,
    ];
    for (&id, status) in channels.iter().zip(expected) {
        book.update(id, 0, true);
        book.update(id, 0, true);
        assert_eq!(book.module_status(bank), status);
    }

    for &id in &channels {
        book.reset(id)?;
    }
    assert_eq!(book.module_status(bank), ModuleStatus::Normal);
    Ok(())
}

#[test]
fn test_modules_are_isolated() -> Result<(), FaultbookError> {
    let mut book = FaultBook::new(ManualClock::new());
    let a = book.register_module(2, Tolerance::NO_FAILURE)?;
    let b = book.register_module(2, Tolerance::NO_FAILURE)?;
    let a0 = book.resolve(a, 0);
    book.set_policy(a0, FaultPolicy::count_absolute(1, 1)?)?;

    assert_eq!(book.update(a0, 0, true), FaultStatus::Error);
    assert_eq!(book.module_status(a), ModuleStatus::Failed);
    assert_eq!(book.module_status(b), ModuleStatus::Normal);
    for id in book.module_faults(b) {
        assert_eq!(book.count_errors(id), 0);
    }
    Ok(())
}

#[test]
fn test_init_between_sessions() {
    let mut book = FaultBook::new(ManualClock::new());
    let first = must(book.register_module(3, Tolerance::new(1)));
    book.report(first, 1, 42, true);

    book.init();
    assert_eq!(book.module_count(), 1);
    assert_eq!(book.module_status(first), ModuleStatus::Failed);
    assert_eq!(book.log_len(), 0);

    let again = must(book.register_module(3, Tolerance::new(1)));
    assert_eq!(again, first);
    assert_eq!(book.count_errors(book.resolve(again, 1)), 0);
}

#[test]
fn test_closure_clock() {
    let mut book = FaultBook::new(|| -> Millis { 777 });
    book.update(FaultId::UNKNOWN, 0, true);
    let record = must_some(book.record(FaultId::UNKNOWN), "generic record");
    assert_eq!(record.last_fault_ms(), 777);
}

#[cfg(feature = "std")]
#[test]
fn test_system_clock_is_monotonic() {
    let mut book = FaultBook::new(faultbook::SystemClock::new());
    for _ in 0..10 {
        book.update(FaultId::UNKNOWN, 0, false);
    }
    let timestamps: Vec<Millis> = book.log().iter().map(|e| e.timestamp).collect();
    assert!(timestamps.is_sorted_by(|newer, older| newer >= older));
}
