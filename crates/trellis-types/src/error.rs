//! Unified error interface for Trellis.
//!
//! Every error type in the workspace implements [`ErrorCode`] so callers
//! can branch on stable machine-readable codes and retry logic can ask
//! whether a failure is worth retrying.
//!
//! # Code Convention
//!
//! Codes are `UPPER_SNAKE_CASE`, prefixed by layer:
//!
//! | Prefix | Layer |
//! |--------|-------|
//! | `STORE_` | content stores |
//! | `PART_` | part loaders/handlers |
//! | `LOAD_` | content manager loads |
//! | `RENDER_` | render stream |
//! | `EVENT_` | event bus |
//! | `SELECTOR_` | shape selectors |
//!
//! # Recoverability
//!
//! An error is recoverable when retrying may succeed (transient backend
//! trouble, timeouts). It is not recoverable when the input or
//! configuration is wrong: an unresolvable id stays unresolvable, an
//! invalid payload stays invalid.

/// Unified error code interface.
///
/// # Example
///
/// ```
/// use trellis_types::ErrorCode;
///
/// #[derive(Debug)]
/// enum StoreError {
///     Transport(String),
///     BadRecord,
/// }
///
/// impl ErrorCode for StoreError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Transport(_) => "STORE_TRANSPORT",
///             Self::BadRecord => "STORE_BAD_RECORD",
///         }
///     }
///
///     fn is_recoverable(&self) -> bool {
///         matches!(self, Self::Transport(_))
///     }
/// }
///
/// let err = StoreError::Transport("connection reset".into());
/// assert_eq!(err.code(), "STORE_TRANSPORT");
/// assert!(err.is_recoverable());
/// ```
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// Codes are stable across versions; changing one is a breaking
    /// change. Format: `UPPER_SNAKE_CASE` with a layer prefix.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the Trellis convention.
///
/// Checks that the code is non-empty, starts with the expected prefix,
/// and is `UPPER_SNAKE_CASE`. Panics with a descriptive message if not.
///
/// # Example
///
/// ```
/// use trellis_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "STORE_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "STORE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use trellis_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum PartError { Load, Handle }
///
/// impl ErrorCode for PartError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Load => "PART_LOAD_FAILED",
///             Self::Handle => "PART_HANDLE_FAILED",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[PartError::Load, PartError::Handle], "PART_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
