//! Injected dependencies for the workflows.
//!
//! Everything the workflows need from the outside world that is not storage
//! (the current time and fresh identifiers) sits behind a trait so that tests
//! can pin it down. Production code uses [`Environment::system`].

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use myramen_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let earlier = clock.now();
/// assert!(clock.now() >= earlier);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of fresh identifiers.
///
/// Implementations return the suffix only; callers prepend the resource
/// prefix (`o` for orders, `c` for coupons).
pub trait IdGenerator: Send + Sync {
    /// Produce a suffix that has not been handed out before.
    fn next_suffix(&self) -> String;
}

/// Random UUID v4 suffixes (32 lowercase hex characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_suffix(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Bundle of injected dependencies shared by the coupon and order workflows.
#[derive(Clone)]
pub struct Environment {
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Identifier source
    pub ids: Arc<dyn IdGenerator>,
}

impl Environment {
    /// Create an environment from explicit dependencies.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Wall clock plus random UUID identifiers.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidIdGenerator))
    }

    /// Current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_suffixes_are_distinct() {
        let ids = UuidIdGenerator;
        let a = ids.next_suffix();
        let b = ids.next_suffix();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
