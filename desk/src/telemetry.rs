//! Metric names and descriptions for the desk.
//!
//! Counters are recorded through the `metrics` facade where things happen
//! (lifecycle reducer, login, store). No exporter is installed here; without
//! a recorder the calls are no-ops.

use metrics::describe_counter;
use std::sync::Once;

/// Requests created, labelled by `kind`
pub const REQUESTS_CREATED: &str = "desk.requests.created";

/// Status changes applied, labelled by `kind` and `to`
pub const REQUESTS_TRANSITIONED: &str = "desk.requests.transitioned";

/// Commands rejected, labelled by `reason`
pub const VALIDATION_FAILED: &str = "desk.validation.failed";

/// Failed logins
pub const LOGIN_FAILED: &str = "desk.login.failed";

static REGISTER: Once = Once::new();

/// Describe every desk metric. Safe to call more than once.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        describe_counter!(REQUESTS_CREATED, "Tickets, leave requests and bookings created");
        describe_counter!(REQUESTS_TRANSITIONED, "Status changes applied by reviewers");
        describe_counter!(VALIDATION_FAILED, "Commands rejected by the lifecycle reducer");
        describe_counter!(LOGIN_FAILED, "Login attempts with unknown credentials");
        describe_counter!("store.actions.total", "Actions reduced by the store");
        describe_counter!(
            "store.feedback_limit",
            "Sends cut off after too many feedback actions"
        );
    });
}
