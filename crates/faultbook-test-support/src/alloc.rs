//! Allocation counting for the no-allocation guarantees of the hot path.
//!
//! Install [`CountingAllocator`] as the `#[global_allocator]` of a test
//! binary, then measure a closure with [`count_allocations`] or a scope
//! with [`AllocScope`]. Counters are per thread, so concurrently running
//! tests do not disturb each other.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    static BYTES: Cell<usize> = const { Cell::new(0) };
    static ACTIVE: Cell<u32> = const { Cell::new(0) };
}

/// `System` allocator that counts allocations made while an
/// [`AllocScope`] is alive on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingAllocator;

fn note(bytes: usize) {
    // try_with: thread-local storage may already be torn down
    let active = ACTIVE.try_with(Cell::get).unwrap_or(0) > 0;
    if active {
        let _ = ALLOCATIONS.try_with(|c| c.set(c.get().saturating_add(1)));
        let _ = BYTES.try_with(|b| b.set(b.get().saturating_add(bytes)));
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            note(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            note(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            note(new_size.saturating_sub(layout.size()));
        }
        new_ptr
    }
}

/// Counts allocations on the current thread until dropped.
#[derive(Debug)]
pub struct AllocScope {
    start_allocations: usize,
    start_bytes: usize,
}

impl AllocScope {
    /// Start counting.
    pub fn enter() -> Self {
        ACTIVE.with(|a| a.set(a.get().saturating_add(1)));
        Self {
            start_allocations: ALLOCATIONS.with(Cell::get),
            start_bytes: BYTES.with(Cell::get),
        }
    }

    /// Allocations since the scope was entered.
    pub fn allocations(&self) -> usize {
        ALLOCATIONS.with(Cell::get).saturating_sub(self.start_allocations)
    }

    /// Bytes requested since the scope was entered.
    pub fn bytes(&self) -> usize {
        BYTES.with(Cell::get).saturating_sub(self.start_bytes)
    }
}

impl Drop for AllocScope {
    fn drop(&mut self) {
        ACTIVE.with(|a| a.set(a.get().saturating_sub(1)));
    }
}

/// Run `f` and return its result with the number of allocations it made.
pub fn count_allocations<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let scope = AllocScope::enter();
    let result = f();
    let allocations = scope.allocations();
    (result, allocations)
}

/// Panic if `$body` allocates.
#[macro_export]
macro_rules! assert_no_alloc {
    ($context:expr, $body:expr) => {{
        let scope = $crate::alloc::AllocScope::enter();
        let result = $body;
        let allocations = scope.allocations();
        let bytes = scope.bytes();
        drop(scope);
        assert!(
            allocations == 0,
            "{} allocated {} times ({} bytes)",
            $context,
            allocations,
            bytes
        );
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_boxed_value() {
        let (boxed, allocations) = count_allocations(|| Box::new(42u64));
        assert_eq!(*boxed, 42);
        assert!(allocations >= 1);
    }

    #[test]
    fn test_stack_only_code_is_clean() {
        let sum = assert_no_alloc!("array sum", [1u32, 2, 3].iter().sum::<u32>());
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_nothing_counted_outside_scope() {
        let scope = AllocScope::enter();
        drop(scope);
        let _v = vec![0u8; 64];
        let scope = AllocScope::enter();
        assert_eq!(scope.allocations(), 0);
    }
}
