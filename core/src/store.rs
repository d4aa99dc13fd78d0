//! Synchronous store: owns state, runs the reducer and interprets effects.

use crate::effect::Effect;
use crate::reducer::Reducer;
use std::collections::VecDeque;

/// Upper bound on actions processed for a single [`Store::send`] call.
///
/// Feedback effects (`Effect::Send`) may trigger further reductions; a reducer
/// that keeps feeding itself is cut off here.
pub const MAX_ACTIONS_PER_SEND: usize = 64;

/// Errors returned by [`Store::send`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The reducer kept producing feedback actions
    #[error("feedback limit reached after {processed} actions")]
    FeedbackLimit {
        /// Actions processed before giving up
        processed: usize,
    },
}

/// The store that drives a reducer
///
/// `send` reduces the action, then executes its effects in order:
/// emitted outputs go to the caller's sink and feedback actions are reduced
/// in turn. The call returns once the queue is empty.
pub struct Store<R>
where
    R: Reducer,
{
    state: R::State,
    reducer: R,
    environment: R::Environment,
}

impl<R> Store<R>
where
    R: Reducer,
{
    /// Create a store with initial state, reducer and environment
    #[must_use]
    pub const fn new(initial_state: R::State, reducer: R, environment: R::Environment) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &R::State {
        &self.state
    }

    /// Injected environment
    #[must_use]
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// Dispatch an action and run every effect it produces.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimit`] if more than
    /// [`MAX_ACTIONS_PER_SEND`] actions were queued by one call. State changes
    /// made before the limit was hit are kept.
    pub fn send<F>(&mut self, action: R::Action, mut sink: F) -> Result<(), StoreError>
    where
        F: FnMut(R::Output),
    {
        let mut queue = VecDeque::from([action]);
        let mut processed = 0;

        while let Some(action) = queue.pop_front() {
            if processed == MAX_ACTIONS_PER_SEND {
                tracing::warn!(processed, "Dropping feedback actions, limit reached");
                metrics::counter!("store.feedback_limit").increment(1);
                return Err(StoreError::FeedbackLimit { processed });
            }
            processed += 1;
            metrics::counter!("store.actions.total").increment(1);

            let effects = self
                .reducer
                .reduce(&mut self.state, action, &self.environment);
            for effect in effects {
                Self::execute(effect, &mut queue, &mut sink);
            }
        }

        tracing::trace!(processed, "Store drained");
        Ok(())
    }

    fn execute<F>(effect: Effect<R::Action, R::Output>, queue: &mut VecDeque<R::Action>, sink: &mut F)
    where
        F: FnMut(R::Output),
    {
        match effect {
            Effect::None => {},
            Effect::Sequential(effects) => {
                for effect in effects {
                    Self::execute(effect, queue, sink);
                }
            },
            Effect::Send(action) => queue.push_back(*action),
            Effect::Emit(output) => sink(output),
        }
    }
}
