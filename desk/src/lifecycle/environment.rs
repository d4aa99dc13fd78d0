//! Environment for the lifecycle reducer.

use super::types::TransitionPolicy;
use deskflow_core::environment::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use std::sync::Arc;

/// Dependencies injected into the lifecycle reducer
///
/// Production uses the wall clock and random UUIDs; tests pass a
/// `FixedClock` and a `SequentialIdGenerator`.
#[derive(Clone)]
pub struct LifecycleEnvironment {
    /// Timestamps for created_at, updated_at and reviewed_at
    pub clock: Arc<dyn Clock>,
    /// Identifier source
    pub ids: Arc<dyn IdGenerator>,
    /// Allowed status changes
    pub policy: TransitionPolicy,
}

impl LifecycleEnvironment {
    /// Environment with the default (unrestricted) policy
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            clock,
            ids,
            policy: TransitionPolicy::default(),
        }
    }

    /// Wall clock and random identifiers
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidIdGenerator))
    }

    /// Replaces the transition policy
    #[must_use]
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl std::fmt::Debug for LifecycleEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEnvironment")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
