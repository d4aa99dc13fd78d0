//! Deskflow - an internal request desk
//!
//! Employees file three kinds of requests and administrators review them:
//!
//! - **IT tickets**: `open → in-progress → solved`
//! - **Leave requests**: `waiting → approved | rejected`
//! - **Room bookings**: `waiting → approved | rejected`, checked against room
//!   capacity and facilities
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────────────────────┐
//!  user ───▶ │ Desk (session, review check) │ ──▶ Toaster / Navigator
//!            └──────────────────────────────┘
//!                         │ LifecycleAction
//!                         ▼
//!            ┌──────────────────────────────┐
//!            │ Store<LifecycleReducer>      │
//!            │   validate → apply → effects │
//!            └──────────────────────────────┘
//!                         │
//!                         ▼
//!            ┌──────────────────────────────┐
//!            │ EntityStore                  │ ◀── filter / stats / rooms
//!            └──────────────────────────────┘
//! ```
//!
//! All writes go through the [`lifecycle`] reducer. Listing, counting and
//! room matching are pure functions over the [`store::EntityStore`].
//! Users without the review capability only ever see their own requests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod rooms;
pub mod seed;
pub mod shell;
pub mod stats;
pub mod store;
pub mod telemetry;
pub mod types;

pub use app::Desk;
pub use config::DeskConfig;
pub use error::{AuthError, DeskError, ValidationError};
pub use lifecycle::{LifecycleAction, LifecycleEnvironment, LifecycleReducer, LifecycleState};
pub use seed::Seed;
pub use store::EntityStore;
pub use types::*;
