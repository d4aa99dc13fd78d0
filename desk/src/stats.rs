//! Dashboard counters and the recent activity feed.
//!
//! Everything here is recomputed from the store on each call.

use crate::filter::visible_to;
use crate::store::EntityStore;
use crate::types::{Capability, Request, RequestKind, Status, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many items of each kind feed the activity list
pub const ACTIVITY_PER_KIND: usize = 3;

/// Length of the activity list
pub const ACTIVITY_LIMIT: usize = 5;

/// Whose requests a counter covers
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Everybody's
    All,
    /// One owner's
    Owner(UserId),
}

impl Scope {
    /// `All` for users who may see everything, their own requests otherwise
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        if user.can(Capability::ViewAll) {
            Self::All
        } else {
            Self::Owner(user.id.clone())
        }
    }

    fn includes<R: Request>(&self, request: &R) -> bool {
        match self {
            Self::All => true,
            Self::Owner(owner) => request.owner() == owner,
        }
    }
}

fn count_pending<R: Request>(requests: &[R], scope: &Scope) -> usize {
    requests
        .iter()
        .filter(|request| request.status().is_pending() && scope.includes(*request))
        .count()
}

/// Requests of `kind` still needing attention
///
/// Tickets count while not solved; leave requests and bookings while waiting.
#[must_use]
pub fn count(store: &EntityStore, kind: RequestKind, scope: &Scope) -> usize {
    match kind {
        RequestKind::Ticket => count_pending(store.tickets(), scope),
        RequestKind::LeaveRequest => count_pending(store.leave_requests(), scope),
        RequestKind::RoomBooking => count_pending(store.room_bookings(), scope),
    }
}

/// Unread notifications addressed to `user_id`
#[must_use]
pub fn unread_notifications(store: &EntityStore, user_id: &UserId) -> usize {
    store
        .notifications_for(user_id)
        .filter(|notification| !notification.read)
        .count()
}

/// Dashboard counters for one user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Tickets not yet solved
    pub open_tickets: usize,
    /// Leave requests waiting for review
    pub pending_leave_requests: usize,
    /// Room bookings waiting for review
    pub pending_room_bookings: usize,
    /// Requests of any kind and status the user can see
    pub total_requests: usize,
    /// Unread notifications of the user
    pub unread_notifications: usize,
}

/// Counters shown on the dashboard of `requester`
#[must_use]
pub fn overview(store: &EntityStore, requester: &User) -> Overview {
    let scope = Scope::for_user(requester);
    let total = |scope: &Scope| {
        store
            .tickets()
            .iter()
            .filter(|t| scope.includes(*t))
            .count()
            + store
                .leave_requests()
                .iter()
                .filter(|r| scope.includes(*r))
                .count()
            + store
                .room_bookings()
                .iter()
                .filter(|b| scope.includes(*b))
                .count()
    };

    Overview {
        open_tickets: count(store, RequestKind::Ticket, &scope),
        pending_leave_requests: count(store, RequestKind::LeaveRequest, &scope),
        pending_room_bookings: count(store, RequestKind::RoomBooking, &scope),
        total_requests: total(&scope),
        unread_notifications: unread_notifications(store, &requester.id),
    }
}

/// One line of the recent activity feed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Kind of request
    pub kind: RequestKind,
    /// Request id
    pub id: String,
    /// Headline, e.g. `Ticket T-1A2B3C4D`
    pub title: String,
    /// Ticket title, leave type or booking purpose
    pub description: String,
    /// Current status
    pub status: String,
    /// When the request was filed
    pub created_at: DateTime<Utc>,
}

fn latest<'a, R: Request + 'a>(
    requests: &'a [R],
    requester: &'a User,
    describe: impl Fn(&R) -> String + 'a,
) -> impl Iterator<Item = Activity> + 'a {
    requests
        .iter()
        .filter(move |request| visible_to(*request, requester))
        .take(ACTIVITY_PER_KIND)
        .map(move |request| Activity {
            kind: R::KIND,
            id: request.id_str().to_string(),
            title: format!("{} {}", headline(R::KIND), request.id_str()),
            description: describe(request),
            status: request.status().to_string(),
            created_at: request.created_at(),
        })
}

const fn headline(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Ticket => "Ticket",
        RequestKind::LeaveRequest => "Leave request",
        RequestKind::RoomBooking => "Room booking",
    }
}

/// Newest requests visible to `requester`
///
/// Takes the first three of each kind in store order, merges them and keeps
/// the five most recent by creation time.
#[must_use]
pub fn recent_activity(store: &EntityStore, requester: &User) -> Vec<Activity> {
    let mut activity: Vec<Activity> = latest(store.tickets(), requester, |t| t.title.clone())
        .chain(latest(store.leave_requests(), requester, |r| {
            format!("{} leave request", r.leave_type)
        }))
        .chain(latest(store.room_bookings(), requester, |b| b.purpose.clone()))
        .collect();

    activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    activity.truncate(ACTIVITY_LIMIT);
    activity
}
