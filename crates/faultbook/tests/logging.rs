//! Diagnostics emitted through `tracing`.

use faultbook::prelude::*;
use faultbook_test_support::{capture_logs, must};
use tracing::Level;

#[test]
fn test_unknown_id_warns() {
    let (status, events) = capture_logs(|| {
        let mut book = FaultBook::new(ManualClock::new());
        book.update(FaultId::new(99_999), 0, true)
    });
    assert_eq!(status, FaultStatus::Normal);

    let warning = events
        .iter()
        .find(|e| e.level == Level::WARN && e.message.contains("Unknown fault id"));
    assert_eq!(warning.and_then(|e| e.field("fault_id")), Some("99999"));
}

#[test]
fn test_rejected_policy_warns() {
    let (result, events) = capture_logs(|| {
        let mut book = FaultBook::new(ManualClock::new());
        book.set_policy(FaultId::new(1), FaultPolicy::CountAbsolute { warn: 3, err: 1 })
    });
    assert!(result.is_err_and(|e| e.is_invalid_thresholds()));
    assert!(events
        .iter()
        .any(|e| e.level == Level::WARN && e.message == "Policy rejected"));
}

#[test]
fn test_error_transition_is_reported_once() {
    let (_, events) = capture_logs(|| {
        let mut book = FaultBook::new(ManualClock::new());
        let module = must(book.register_module(1, Tolerance::NO_FAILURE));
        let id = book.resolve(module, 0);
        must(book.set_policy(id, must(FaultPolicy::count_absolute(1, 2))));
        for _ in 0..5 {
            book.update(id, 64, true);
        }
    });

    let errors: Vec<_> = events
        .iter()
        .filter(|e| e.message == "Fault entered error state")
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().and_then(|e| e.field("previous")), Some("Warning"));
    assert_eq!(errors.first().and_then(|e| e.field("ref_value")), Some("64"));
}

#[test]
fn test_clock_regression_warns() {
    let (_, events) = capture_logs(|| {
        let clock = ManualClock::starting_at(500);
        let mut book = FaultBook::new(clock.clone());
        book.update(FaultId::UNKNOWN, 0, false);
        clock.set(100);
        book.update(FaultId::UNKNOWN, 0, false);
    });
    assert!(events
        .iter()
        .any(|e| e.level == Level::WARN && e.message.contains("Clock went backwards")));
}

#[test]
fn test_registration_failure_warns() {
    let (result, events) = capture_logs(|| {
        let mut book = FaultBook::new(ManualClock::new());
        book.register_module(u32::MAX, Tolerance::NO_FAILURE)
    });
    assert!(result.is_err_and(|e| e.is_capacity_exceeded()));
    assert!(events.iter().any(|e| e.message == "Module registration rejected"));
}
