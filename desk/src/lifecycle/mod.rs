//! Request lifecycle: creation, review and comments.
//!
//! The [`LifecycleReducer`] owns every write to the [`EntityStore`]. New
//! tickets, leave requests and room bookings are validated, stamped with a
//! generated id, their initial status and the current time, then prepended
//! to their collection. Status changes overwrite the status in place and,
//! for leave requests and bookings, record the reviewer.
//!
//! ```text
//! Desk::send(command)
//!     ↓
//! LifecycleReducer validates against LifecycleState
//!     ↓
//! ok  → apply event → Emit(Toast::success) [+ Emit(Navigate(list))]
//! err → ValidationFailed → last_error      → Emit(Toast::error)
//! ```
//!
//! The reducer does not check roles. The [`Desk`](crate::app::Desk) facade
//! refuses status changes from users without review rights before they get
//! here.
//!
//! [`EntityStore`]: crate::store::EntityStore

pub mod actions;
pub mod environment;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod types;

pub use actions::LifecycleAction;
pub use environment::LifecycleEnvironment;
pub use reducer::LifecycleReducer;
pub use types::{LifecycleState, TransitionPolicy};
