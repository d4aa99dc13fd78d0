//! # Deskflow Testing
//!
//! Testing utilities for Deskflow reducers.
//!
//! This crate provides:
//! - Deterministic environment implementations (`FixedClock`, `SequentialIdGenerator`)
//! - A Given-When-Then harness for reducers (`ReducerTest`)
//! - Effect assertion helpers
//!
//! ## Example
//!
//! ```ignore
//! use deskflow_testing::{test_clock, ReducerTest, SequentialIdGenerator};
//!
//! ReducerTest::new(LifecycleReducer::new())
//!     .with_env(LifecycleEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new())))
//!     .given_state(LifecycleState::new(EntityStore::default()))
//!     .when_action(LifecycleAction::CreateTicket { .. })
//!     .then_state(|state| assert_eq!(state.entities.tickets().len(), 1))
//!     .run();
//! ```


use chrono::{DateTime, Utc};
use deskflow_core::environment::{Clock, IdGenerator};

pub use reducer_test::{ReducerTest, assertions};

/// Deterministic implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use deskflow_testing::mocks::FixedClock;
    /// use deskflow_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifiers
    ///
    /// The n-th call returns a UUID whose first eight hex digits spell `n`, so
    /// short tokens come out as `00000001`, `00000002`, ...
    ///
    /// ```
    /// use deskflow_testing::mocks::SequentialIdGenerator;
    /// use deskflow_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.short_token(), "00000001");
    /// assert_eq!(ids.short_token(), "00000002");
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Starts counting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }

        /// Number of ids handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.next.load(Ordering::Relaxed)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn generate(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
            Uuid::from_u128(u128::from(n) << 96)
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.short_token(), "00000001");
        assert_eq!(ids.short_token(), "00000002");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn sequential_ids_are_distinct_uuids() {
        let ids = SequentialIdGenerator::new();
        assert_ne!(ids.generate(), ids.generate());
    }
}
