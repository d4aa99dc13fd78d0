//! State and policy types for the lifecycle reducer.

use crate::error::DeskError;
use crate::store::EntityStore;
use crate::types::Status;
use serde::{Deserialize, Serialize};

/// Which status changes an administrator may make
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
    /// Any status may follow any other
    #[default]
    Unrestricted,
    /// Only forward moves: open → in-progress → solved (or open → solved),
    /// waiting → approved | rejected
    ForwardOnly,
}

impl TransitionPolicy {
    /// Whether `from → to` is allowed. Keeping the same status always is.
    #[must_use]
    pub fn allows<S: Status>(self, from: S, to: S) -> bool {
        if from == to {
            return true;
        }
        match self {
            Self::Unrestricted => true,
            Self::ForwardOnly => from.forward_targets().contains(&to),
        }
    }
}

/// State owned by the lifecycle reducer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleState {
    /// Every entity of the desk
    pub entities: EntityStore,
    /// Outcome of the last command: `None` after success
    pub last_error: Option<DeskError>,
}

impl LifecycleState {
    /// Wraps an initialized store
    #[must_use]
    pub const fn new(entities: EntityStore) -> Self {
        Self {
            entities,
            last_error: None,
        }
    }
}
