//! List filtering for tickets, leave requests and room bookings.
//!
//! Every filter is a pure predicate over one entity. Category predicates
//! (status, type, department, dates) come first, then the free-text search,
//! then requester visibility: users without [`Capability::ViewAll`] only see
//! what they own.
//!
//! How the search combines with the category predicates is decided by
//! [`SearchMode`]. In the default [`SearchMode::Exclusive`] mode a non-empty
//! search alone decides which entities are kept.

use crate::store::EntityStore;
use crate::types::{
    BookingStatus, Capability, Department, LeaveRequest, LeaveStatus, LeaveType, Request,
    RoomBooking, Ticket, TicketStatus, User,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

// ============================================================================
// Building blocks
// ============================================================================

/// How the free-text search combines with the other predicates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// A non-empty search replaces the category predicates
    #[default]
    Exclusive,
    /// The search is ANDed with the category predicates
    Conjunctive,
}

/// A select box value: everything, or one specific value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Choice<T> {
    /// Wildcard
    #[default]
    All,
    /// Exact match
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    /// Whether `value` passes this choice
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

/// Inclusive range of calendar days
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day
    pub from: NaiveDate,
    /// Last day
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range; the bounds are swapped if given in reverse
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// Whether `day` lies in the range
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// Whether `[start, end]` shares at least one day with the range
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.to && self.from <= end
    }
}

/// Case-insensitive substring match of `needle` in any of `fields`
fn any_field_contains(fields: &[&str], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

// ============================================================================
// Criteria
// ============================================================================

/// Filter criteria for one kind of request
pub trait Criteria {
    /// The entity being filtered
    type Item: Request;

    /// The collection this criteria applies to
    fn collection(store: &EntityStore) -> &[Self::Item];

    /// Free-text search, empty for none
    fn search(&self) -> &str;

    /// Status/type/department/date predicates
    fn matches_categories(&self, item: &Self::Item) -> bool;

    /// Fields the free-text search looks at
    fn searchable_fields<'a>(item: &'a Self::Item, store: &'a EntityStore)
    -> SmallVec<[&'a str; 3]>;
}

/// Criteria for the ticket list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketFilter {
    /// Status select
    pub status: Choice<TicketStatus>,
    /// Department select
    pub department: Choice<Department>,
    /// Creation day range
    pub created: Option<DateRange>,
    /// Matches title, description or id
    pub search: String,
}

impl Criteria for TicketFilter {
    type Item = Ticket;

    fn collection(store: &EntityStore) -> &[Ticket] {
        store.tickets()
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn matches_categories(&self, ticket: &Ticket) -> bool {
        self.status.admits(&ticket.status)
            && self.department.admits(&ticket.department)
            && self
                .created
                .is_none_or(|range| range.contains(ticket.created_at.date_naive()))
    }

    fn searchable_fields<'a>(ticket: &'a Ticket, _store: &'a EntityStore) -> SmallVec<[&'a str; 3]> {
        smallvec![
            ticket.title.as_str(),
            ticket.description.as_str(),
            ticket.id.as_str()
        ]
    }
}

/// Criteria for the leave request list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveFilter {
    /// Leave type select
    pub leave_type: Choice<LeaveType>,
    /// Status select
    pub status: Choice<LeaveStatus>,
    /// Keeps requests whose leave period overlaps this range
    pub period: Option<DateRange>,
    /// Matches reason or id
    pub search: String,
}

impl Criteria for LeaveFilter {
    type Item = LeaveRequest;

    fn collection(store: &EntityStore) -> &[LeaveRequest] {
        store.leave_requests()
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn matches_categories(&self, request: &LeaveRequest) -> bool {
        self.leave_type.admits(&request.leave_type)
            && self.status.admits(&request.status)
            && self
                .period
                .is_none_or(|range| range.overlaps(request.start_date, request.end_date))
    }

    fn searchable_fields<'a>(
        request: &'a LeaveRequest,
        _store: &'a EntityStore,
    ) -> SmallVec<[&'a str; 3]> {
        smallvec![request.reason.as_str(), request.id.as_str()]
    }
}

/// Criteria for the room booking list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingFilter {
    /// Status select
    pub status: Choice<BookingStatus>,
    /// Exact meeting day
    pub date: Option<NaiveDate>,
    /// Matches purpose, id or room name
    pub search: String,
}

impl Criteria for BookingFilter {
    type Item = RoomBooking;

    fn collection(store: &EntityStore) -> &[RoomBooking] {
        store.room_bookings()
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn matches_categories(&self, booking: &RoomBooking) -> bool {
        self.status.admits(&booking.status) && self.date.is_none_or(|date| booking.date == date)
    }

    fn searchable_fields<'a>(
        booking: &'a RoomBooking,
        store: &'a EntityStore,
    ) -> SmallVec<[&'a str; 3]> {
        smallvec![
            booking.purpose.as_str(),
            booking.id.as_str(),
            store.room_name(&booking.room_id)
        ]
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Whether `requester` may see `item`
#[must_use]
pub fn visible_to<R: Request>(item: &R, requester: &User) -> bool {
    requester.can(Capability::ViewAll) || item.owner() == &requester.id
}

/// Category and search predicates for one item, ignoring visibility
#[must_use]
pub fn matches<C: Criteria>(
    item: &C::Item,
    criteria: &C,
    store: &EntityStore,
    mode: SearchMode,
) -> bool {
    let search = criteria.search().trim();
    if search.is_empty() {
        return criteria.matches_categories(item);
    }

    let found = any_field_contains(&C::searchable_fields(item, store), search);
    match mode {
        SearchMode::Exclusive => found,
        SearchMode::Conjunctive => found && criteria.matches_categories(item),
    }
}

/// Items of the criteria's collection that match and are visible to `requester`
///
/// Store order (newest first) is preserved.
#[must_use]
pub fn filter<'a, C: Criteria>(
    store: &'a EntityStore,
    criteria: &C,
    requester: &User,
    mode: SearchMode,
) -> Vec<&'a C::Item> {
    C::collection(store)
        .iter()
        .filter(|item| matches(*item, criteria, store, mode))
        .filter(|item| visible_to(*item, requester))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::seed::Seed;
    use crate::types::{ReviewStatus, UserId};
    use deskflow_core::environment::Clock;
    use deskflow_testing::{SequentialIdGenerator, test_clock};

    fn store() -> EntityStore {
        EntityStore::init(Seed::demo(test_clock().now(), &SequentialIdGenerator::new()))
    }

    fn user(store: &EntityStore, id: &str) -> User {
        store.user(&UserId::new(id)).unwrap().clone()
    }

    fn titles<'a>(tickets: &[&'a Ticket]) -> Vec<&'a str> {
        tickets.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn regular_user_sees_only_own_tickets() {
        let store = store();
        let john = user(&store, "1");
        let tickets = filter(&store, &TicketFilter::default(), &john, SearchMode::Exclusive);
        assert_eq!(tickets.len(), 2);
        assert!(tickets.iter().all(|t| t.created_by == john.id));
    }

    #[test]
    fn admin_sees_everything() {
        let store = store();
        let jane = user(&store, "2");
        let tickets = filter(&store, &TicketFilter::default(), &jane, SearchMode::Exclusive);
        assert_eq!(tickets.len(), 4);
    }

    #[test]
    fn status_choice_is_exact() {
        let store = store();
        let jane = user(&store, "2");
        let criteria = TicketFilter {
            status: Choice::Only(TicketStatus::Open),
            ..TicketFilter::default()
        };
        assert_eq!(
            titles(&filter(&store, &criteria, &jane, SearchMode::Exclusive)),
            vec!["Cannot access email", "Laptop running slowly"]
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_description_and_id() {
        let store = store();
        let jane = user(&store, "2");
        let by_title = TicketFilter {
            search: "PRINTER".to_string(),
            ..TicketFilter::default()
        };
        assert_eq!(
            titles(&filter(&store, &by_title, &jane, SearchMode::Exclusive)),
            vec!["Printer not working"]
        );

        let by_id = TicketFilter {
            search: "t-00000003".to_string(),
            ..TicketFilter::default()
        };
        assert_eq!(
            titles(&filter(&store, &by_id, &jane, SearchMode::Exclusive)),
            vec!["Software installation needed"]
        );
    }

    #[test]
    fn exclusive_search_ignores_status() {
        let store = store();
        let jane = user(&store, "2");
        let criteria = TicketFilter {
            status: Choice::Only(TicketStatus::Solved),
            search: "laptop".to_string(),
            ..TicketFilter::default()
        };
        assert_eq!(
            titles(&filter(&store, &criteria, &jane, SearchMode::Exclusive)),
            vec!["Laptop running slowly"]
        );
        assert!(filter(&store, &criteria, &jane, SearchMode::Conjunctive).is_empty());
    }

    #[test]
    fn visibility_applies_after_search() {
        let store = store();
        let john = user(&store, "1");
        let criteria = TicketFilter {
            search: "laptop".to_string(),
            ..TicketFilter::default()
        };
        assert!(filter(&store, &criteria, &john, SearchMode::Exclusive).is_empty());
    }

    #[test]
    fn leave_period_overlap() {
        let store = store();
        let jane = user(&store, "2");
        let today = test_clock().now().date_naive();
        let criteria = LeaveFilter {
            period: Some(DateRange::new(today, today + chrono::Duration::days(5))),
            ..LeaveFilter::default()
        };
        let found = filter(&store, &criteria, &jane, SearchMode::Exclusive);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, "Family holiday");
    }

    #[test]
    fn leave_type_and_status_combine() {
        let store = store();
        let jane = user(&store, "2");
        let criteria = LeaveFilter {
            leave_type: Choice::Only(LeaveType::Sick),
            status: Choice::Only(ReviewStatus::Waiting),
            ..LeaveFilter::default()
        };
        assert!(filter(&store, &criteria, &jane, SearchMode::Exclusive).is_empty());
    }

    #[test]
    fn booking_search_matches_room_name() {
        let store = store();
        let jane = user(&store, "2");
        let criteria = BookingFilter {
            search: "small meeting".to_string(),
            ..BookingFilter::default()
        };
        let found = filter(&store, &criteria, &jane, SearchMode::Exclusive);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].purpose, "Client call");
    }

    #[test]
    fn booking_date_is_exact() {
        let store = store();
        let mike = user(&store, "3");
        let tomorrow = test_clock().now().date_naive() + chrono::Duration::days(1);
        let criteria = BookingFilter {
            date: Some(tomorrow),
            ..BookingFilter::default()
        };
        let found = filter(&store, &criteria, &mike, SearchMode::Exclusive);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].purpose, "Team discussion");
    }

    #[test]
    fn reversed_range_is_normalized() {
        let a = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let range = DateRange::new(a, b);
        assert_eq!(range.from, b);
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()));
    }

    #[test]
    fn choice_from_option() {
        assert_eq!(Choice::<Department>::from(None), Choice::All);
        assert!(Choice::from(Some(Department::Hr)).admits(&Department::Hr));
        assert!(!Choice::from(Some(Department::Hr)).admits(&Department::It));
    }
}
