//! Unwrap helpers that report the caller's location on failure.

use std::fmt::Debug;

/// Unwrap a `Result`, panicking with the error value.
///
/// ```rust
/// use faultbook_test_support::must;
///
/// let value = must(Ok::<u32, &str>(7));
/// assert_eq!(value, 7);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap an `Option`, panicking with `msg` if `None`.
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

/// Unwrap a `Result`, panicking with `context` and the error value.
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must_with<T, E: Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must_with: {context}: {e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_ok() {
        assert_eq!(must(Ok::<_, ()>(3)), 3);
        assert_eq!(must_with(Ok::<_, ()>("x"), "ctx"), "x");
        assert_eq!(must_some(Some(1u8), "present"), 1);
    }

    #[test]
    #[should_panic(expected = "must_some: missing module")]
    fn test_must_some_none_panics() {
        let _ = must_some(None::<u32>, "missing module");
    }

    #[test]
    #[should_panic(expected = "must_with: registering: \"full\"")]
    fn test_must_with_err_panics() {
        let _ = must_with(Err::<(), _>("full"), "registering");
    }
}
