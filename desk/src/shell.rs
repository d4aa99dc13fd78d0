//! Shell collaborators: toast display and navigation.
//!
//! The lifecycle reducer never shows anything itself. It emits
//! [`DeskEffect`] values and the [`Desk`](crate::app::Desk) hands them to a
//! [`Toaster`] and a [`Navigator`].

use crate::types::{RequestKind, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A short message for the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Text
    pub message: String,
    /// Severity
    pub severity: Severity,
}

impl Toast {
    /// Success toast
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// Error toast
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Screens of the desk
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Login form
    Login,
    /// Dashboard with counters and recent activity
    Dashboard,
    /// List of one request kind
    List(RequestKind),
    /// Creation form for one request kind
    New(RequestKind),
    /// Detail page of one request
    Detail(RequestKind, String),
}

impl Route {
    /// URL path segment of a request kind
    #[must_use]
    pub const fn base(kind: RequestKind) -> &'static str {
        match kind {
            RequestKind::Ticket => "/tickets",
            RequestKind::LeaveRequest => "/leave-requests",
            RequestKind::RoomBooking => "/room-bookings",
        }
    }

    /// URL path of the route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::List(kind) => Self::base(*kind).to_string(),
            Self::New(kind) => format!("{}/new", Self::base(*kind)),
            Self::Detail(kind, id) => format!("{}/{id}", Self::base(*kind)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outputs of the lifecycle reducer, executed by the shell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskEffect {
    /// Show a toast
    Toast(Toast),
    /// Move to another screen
    Navigate(Route),
}

/// Displays toasts
pub trait Toaster {
    /// Shows `message` with `severity`
    fn show(&mut self, message: &str, severity: Severity);
}

/// Changes the current screen
pub trait Navigator {
    /// Moves to `route`
    fn navigate(&mut self, route: Route);

    /// Moves to the list of `kind`
    fn to_list(&mut self, kind: RequestKind) {
        self.navigate(Route::List(kind));
    }

    /// Moves to the detail page of one request
    fn to_detail(&mut self, kind: RequestKind, id: &str) {
        self.navigate(Route::Detail(kind, id.to_string()));
    }
}

/// Toaster that writes to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingToaster;

impl Toaster for TracingToaster {
    fn show(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => tracing::info!(?severity, "{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Toaster that keeps every toast, for tests and scripted runs
#[derive(Clone, Debug, Default)]
pub struct RecordingToaster {
    toasts: Vec<Toast>,
}

impl RecordingToaster {
    /// Empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self { toasts: Vec::new() }
    }

    /// Toasts shown so far, oldest first
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// The most recent toast
    #[must_use]
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }
}

impl Toaster for RecordingToaster {
    fn show(&mut self, message: &str, severity: Severity) {
        self.toasts.push(Toast {
            message: message.to_string(),
            severity,
        });
    }
}

/// Navigator that keeps a history stack
#[derive(Clone, Debug)]
pub struct HistoryNavigator {
    history: Vec<Route>,
}

impl HistoryNavigator {
    /// Starts at `route`
    #[must_use]
    pub fn starting_at(route: Route) -> Self {
        Self {
            history: vec![route],
        }
    }

    /// Current screen
    #[must_use]
    pub fn current(&self) -> &Route {
        // The stack is never empty: it starts with one route and `back` keeps it.
        &self.history[self.history.len() - 1]
    }

    /// Every visited route, oldest first
    #[must_use]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Returns to the previous screen; stays put at the first one
    pub fn back(&mut self) -> &Route {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.current()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::starting_at(Route::Login)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route, "Navigating");
        self.history.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::List(RequestKind::Ticket).path(), "/tickets");
        assert_eq!(
            Route::New(RequestKind::LeaveRequest).path(),
            "/leave-requests/new"
        );
        assert_eq!(
            Route::Detail(RequestKind::RoomBooking, "B-1".to_string()).path(),
            "/room-bookings/B-1"
        );
    }

    #[test]
    fn navigator_helpers_push_routes() {
        let mut nav = HistoryNavigator::default();
        nav.to_list(RequestKind::Ticket);
        nav.to_detail(RequestKind::Ticket, "T-1");
        assert_eq!(nav.current(), &Route::Detail(RequestKind::Ticket, "T-1".into()));
        assert_eq!(nav.back(), &Route::List(RequestKind::Ticket));
        nav.back();
        assert_eq!(nav.back(), &Route::Login);
    }

    #[test]
    fn recording_toaster_keeps_order() {
        let mut toaster = RecordingToaster::new();
        toaster.show("first", Severity::Info);
        toaster.show("second", Severity::Error);
        assert_eq!(toaster.toasts().len(), 2);
        assert_eq!(toaster.last(), Some(&Toast::error("second")));
    }
}
