//! # Deskflow Core
//!
//! Reducer, effect and store primitives shared by the Deskflow crates.
//!
//! The desk follows a small functional-core / imperative-shell split:
//!
//! - **State**: the data a feature owns
//! - **Action**: every input to a reducer (commands and the events they produce)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of work for the shell (feedback actions, outputs)
//! - **Environment**: injected dependencies such as the clock and id generator
//!
//! Everything here is synchronous. A [`store::Store`] reduces an action and then
//! drains the effects it produced before returning, so callers never observe a
//! half-applied update.
//!
//! ## Example
//!
//! ```
//! use deskflow_core::{effect::Effect, reducer::Reducer, smallvec, store::Store, SmallVec};
//!
//! struct Counter;
//!
//! impl Reducer for Counter {
//!     type State = i64;
//!     type Action = i64;
//!     type Environment = ();
//!     type Output = String;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut i64,
//!         action: i64,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<i64, String>; 4]> {
//!         *state += action;
//!         smallvec![Effect::Emit(format!("now {state}"))]
//!     }
//! }
//!
//! let mut store = Store::new(0, Counter, ());
//! let mut seen = Vec::new();
//! store.send(2, |out| seen.push(out)).unwrap();
//! assert_eq!(*store.state(), 2);
//! assert_eq!(seen, vec!["now 2".to_string()]);
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

pub mod store;

/// Reducer module - the trait that holds all business logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// A reducer validates an action, updates state in place and returns
    /// descriptions of the effects the shell should run next. It never performs
    /// I/O itself; time and identifiers come from the environment.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Values handed to the shell through [`Effect::Emit`]
        type Output;

        /// Reduce an action into state changes and effects
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action, Self::Output>; 4]>;
    }
}

/// Effect module - side effect descriptions
pub mod effect {
    /// Effect type - describes work to be done after a reduction
    ///
    /// Effects are values. The [`Store`](crate::store::Store) interprets them once
    /// the reducer has returned.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action, Output> {
        /// No-op effect
        None,

        /// Run effects one after the other, in order
        Sequential(Vec<Effect<Action, Output>>),

        /// Feed an action back into the reducer
        Send(Box<Action>),

        /// Hand a value to the shell (toast, navigation, ...)
        Emit(Output),
    }

    impl<Action, Output> Effect<Action, Output> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Self>) -> Self {
            Self::Sequential(effects)
        }

        /// Feed `action` back into the reducer
        #[must_use]
        pub fn send(action: Action) -> Self {
            Self::Send(Box::new(action))
        }

        /// Returns true if this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Self::None => true,
                Self::Sequential(effects) => effects.iter().all(Self::is_none),
                Self::Send(_) | Self::Emit(_) => false,
            }
        }

        /// Collects every emitted output, depth first
        #[must_use]
        pub fn outputs(&self) -> Vec<&Output> {
            let mut found = Vec::new();
            self.collect_outputs(&mut found);
            found
        }

        fn collect_outputs<'a>(&'a self, found: &mut Vec<&'a Output>) {
            match self {
                Self::None | Self::Send(_) => {},
                Self::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_outputs(found);
                    }
                },
                Self::Emit(output) => found.push(output),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// Production code uses [`SystemClock`](environment::SystemClock) and
/// [`UuidIdGenerator`](environment::UuidIdGenerator); tests swap in fixed or
/// sequential implementations.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh identifiers
    pub trait IdGenerator: Send + Sync {
        /// Returns a new identifier
        fn generate(&self) -> Uuid;

        /// First eight hex digits of a fresh identifier, uppercased.
        ///
        /// This is the short token used in human-readable ids such as `T-1A2B3C4D`.
        fn short_token(&self) -> String {
            let mut token = self.generate().simple().to_string();
            token.truncate(8);
            token.make_ascii_uppercase();
            token
        }
    }

    /// Random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidIdGenerator;

    impl IdGenerator for UuidIdGenerator {
        fn generate(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}
