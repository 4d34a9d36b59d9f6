//! Error types for the clockpro crate.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by cache operations. `NotFound` when a miss could
//!   not be filled by the read callback, `InvalidState` when the ring and
//!   store fell out of sync (a bug, not a recoverable condition).
//! - [`InvariantError`]: Returned by [`ClockProCache::check_invariants`]
//!   when internal invariants are violated.
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (e.g. zero capacity).
//!
//! [`ClockProCache::check_invariants`]: crate::policy::clock_pro::ClockProCache::check_invariants
//!
//! ## Example Usage
//!
//! ```
//! use clockpro::error::{CacheError, ConfigError};
//! use clockpro::policy::clock_pro::ClockProCache;
//!
//! let bad: Result<ClockProCache<u64, u64>, ConfigError> = ClockProCache::try_new(0);
//! assert!(bad.is_err());
//!
//! let mut cache: ClockProCache<u64, u64> = ClockProCache::new(4);
//! // No read callback installed: a miss cannot be filled.
//! assert!(matches!(cache.get(&1), Err(CacheError::NotFound { .. })));
//! ```

use std::error::Error;
use std::fmt;

/// Boxed error a read callback may fail with.
pub type LoadError = Box<dyn Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by fallible cache operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The key missed and the read callback could not produce a value.
    NotFound { message: String },
    /// The ring and store disagree, or a sweep failed to terminate.
    InvalidState(InvariantError),
}

impl CacheError {
    /// Builds a `NotFound` from a read-callback failure.
    pub fn not_found(message: impl Into<String>) -> Self {
        CacheError::NotFound {
            message: message.into(),
        }
    }

    /// Builds an `InvalidState` with the given description.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        CacheError::InvalidState(InvariantError::new(message))
    }

    /// Returns `true` for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::NotFound { message } => write!(f, "key not found: {}", message),
            CacheError::InvalidState(err) => write!(f, "invalid cache state: {}", err),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CacheError::NotFound { .. } => None,
            CacheError::InvalidState(err) => Some(err),
        }
    }
}

impl From<InvariantError> for CacheError {
    fn from(err: InvariantError) -> Self {
        CacheError::InvalidState(err)
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`ClockProCache::try_new`](crate::policy::clock_pro::ClockProCache::try_new)
/// and [`ClockProBuilder::try_build`](crate::builder::ClockProBuilder::try_build).
///
/// # Example
///
/// ```
/// use clockpro::policy::clock_pro::ClockProCache;
///
/// let err = ClockProCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- CacheError -------------------------------------------------------

    #[test]
    fn cache_error_not_found_display() {
        let err = CacheError::not_found("backing store offline");
        assert_eq!(err.to_string(), "key not found: backing store offline");
        assert!(err.is_not_found());
        assert!(err.source().is_none());
    }

    #[test]
    fn cache_error_invalid_state_wraps_invariant() {
        let err = CacheError::invalid_state("ring/store desync");
        assert_eq!(err.to_string(), "invalid cache state: ring/store desync");
        assert!(!err.is_not_found());
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("ring/store desync"));
    }

    #[test]
    fn cache_error_from_invariant() {
        let err: CacheError = InvariantError::new("x").into();
        assert_eq!(err, CacheError::InvalidState(InvariantError::new("x")));
    }

    #[test]
    fn cache_error_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<CacheError>();
    }

    // -- InvariantError / ConfigError -------------------------------------

    #[test]
    fn invariant_error_from_check_invariants_names_the_counter() {
        let err = InvariantError::new("hot count 3 != ring hot pages 2");
        assert_eq!(err.message(), "hot count 3 != ring hot pages 2");
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn invariant_error_survives_round_trip_through_cache_error() {
        let original = InvariantError::new("ghost without ring record");
        let wrapped = CacheError::from(original.clone());
        match wrapped {
            CacheError::InvalidState(inner) => assert_eq!(inner, original),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn config_error_from_zero_capacity() {
        let err = match crate::policy::clock_pro::ClockProCache::<u8, u8>::try_new(0) {
            Err(err) => err,
            Ok(_) => panic!("zero capacity accepted"),
        };
        assert!(err.message().contains("capacity"));
        assert!(format!("{:?}", err).contains("ConfigError"));
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }
}
