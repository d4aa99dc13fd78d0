//! Unit tests for the lifecycle reducer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use super::*;
use super::reducer::MAX_TITLE_LEN;
use crate::error::{AuthError, DeskError};
use crate::seed::Seed;
use crate::shell::{DeskEffect, Route};
use crate::store::EntityStore;
use crate::types::{
    BookingForm, Department, Facility, LeaveForm, LeaveType, Priority, RequestKind, ReviewStatus,
    RoomId, Severity, Status, TicketForm, TicketId, TicketStatus, UserId,
};
use chrono::{Duration, NaiveDate};
use deskflow_core::environment::Clock;
use deskflow_core::reducer::Reducer;
use deskflow_testing::{ReducerTest, SequentialIdGenerator, assertions, test_clock};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn test_env() -> LifecycleEnvironment {
    LifecycleEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()))
}

/// Demo data seeded with its own id sequence, so generated ids in a test
/// start again at `00000001`.
fn seeded_state() -> LifecycleState {
    let seed = Seed::demo(test_clock().now(), &SequentialIdGenerator::new());
    LifecycleState::new(EntityStore::init(seed))
}

fn ticket_form() -> TicketForm {
    TicketForm {
        title: "VPN drops every hour".to_string(),
        description: "The VPN client disconnects roughly once an hour.".to_string(),
        priority: Some(Priority::Medium),
        department: Some(Department::It),
    }
}

fn leave_form() -> LeaveForm {
    LeaveForm {
        leave_type: Some(LeaveType::Annual),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 5),
        reason: "Skiing trip".to_string(),
    }
}

fn booking_form() -> BookingForm {
    BookingForm {
        room_id: Some(RoomId::new("3")),
        purpose: "Budget planning".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, 3),
        start_time: "09:00".to_string(),
        end_time: "10:30".to_string(),
        participants: 12,
        required_facilities: BTreeSet::from([Facility::Projector]),
    }
}

fn validation_fields(state: &LifecycleState) -> Vec<&'static str> {
    match &state.last_error {
        Some(DeskError::Validation(error)) => error.errors.iter().map(|e| e.field).collect(),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn create_ticket_prepends_open_ticket() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::CreateTicket {
            form: ticket_form(),
            requester: UserId::new("1"),
        })
        .then_state(|state| {
            let ticket = &state.entities.tickets()[0];
            assert_eq!(state.entities.tickets().len(), 5);
            assert_eq!(ticket.id.as_str(), "T-00000001");
            assert_eq!(ticket.status, TicketStatus::Open);
            assert_eq!(ticket.created_by, UserId::new("1"));
            assert_eq!(ticket.created_at, test_clock().now());
            assert_eq!(ticket.updated_at, test_clock().now());
            assert!(state.last_error.is_none());
        })
        .then_effects(|effects| {
            assert_eq!(
                assertions::emitted(effects),
                vec![
                    &DeskEffect::Toast(crate::shell::Toast::success("Ticket created successfully")),
                    &DeskEffect::Navigate(Route::List(RequestKind::Ticket)),
                ]
            );
        })
        .run();
}

#[test]
fn empty_title_is_rejected_with_field_message() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::CreateTicket {
            form: TicketForm {
                title: "   ".to_string(),
                ..ticket_form()
            },
            requester: UserId::new("1"),
        })
        .then_state(|state| {
            assert_eq!(state.entities.tickets().len(), 4);
            assert_eq!(validation_fields(state), vec!["title"]);
        })
        .then_effects(|effects| {
            assertions::assert_emits(effects, |effect| {
                matches!(effect, DeskEffect::Toast(toast) if toast.severity == Severity::Error)
            });
        })
        .run();
}

#[test]
fn every_bad_ticket_field_is_reported() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateTicket {
            form: TicketForm {
                title: "x".repeat(101),
                description: "short".to_string(),
                priority: None,
                department: None,
            },
            requester: UserId::new("1"),
        },
        &test_env(),
    );
    assert_eq!(
        validation_fields(&state),
        vec!["title", "description", "priority", "department"]
    );
}

#[test]
fn title_limit_counts_characters_not_bytes() {
    let reducer = LifecycleReducer::new();
    let env = test_env();
    let mut state = seeded_state();

    let at_limit = TicketForm {
        title: "é".repeat(MAX_TITLE_LEN),
        ..ticket_form()
    };
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateTicket { form: at_limit, requester: UserId::new("1") },
        &env,
    );
    assert!(state.last_error.is_none());
    assert_eq!(state.entities.tickets().len(), 5);
    assert_eq!(state.entities.tickets()[0].title.chars().count(), MAX_TITLE_LEN);

    let over_limit = TicketForm {
        title: "é".repeat(MAX_TITLE_LEN + 1),
        ..ticket_form()
    };
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateTicket { form: over_limit, requester: UserId::new("1") },
        &env,
    );
    assert_eq!(validation_fields(&state), vec!["title"]);
    assert_eq!(state.entities.tickets().len(), 5);
}

#[test]
fn unknown_requester_is_not_logged_in() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateTicket {
            form: ticket_form(),
            requester: UserId::new("404"),
        },
        &test_env(),
    );
    assert_eq!(state.last_error, Some(DeskError::Auth(AuthError::NotLoggedIn)));
    assert_eq!(state.entities.tickets().len(), 4);
}

#[test]
fn create_leave_request_waits_for_review() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::CreateLeaveRequest {
            form: leave_form(),
            requester: UserId::new("3"),
        })
        .then_state(|state| {
            let request = &state.entities.leave_requests()[0];
            assert_eq!(request.id.as_str(), "L-00000001");
            assert_eq!(request.status, ReviewStatus::Waiting);
            assert_eq!(request.reviewed_by, None);
            assert_eq!(request.created_at, test_clock().now());
        })
        .then_effects(|effects| {
            assertions::assert_emits(effects, |effect| {
                *effect == DeskEffect::Navigate(Route::List(RequestKind::LeaveRequest))
            });
        })
        .run();
}

#[test]
fn leave_ending_before_it_starts_is_rejected() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::CreateLeaveRequest {
            form: LeaveForm {
                start_date: NaiveDate::from_ymd_opt(2025, 3, 10),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 9),
                ..leave_form()
            },
            requester: UserId::new("3"),
        })
        .then_state(|state| {
            assert_eq!(validation_fields(state), vec!["end_date"]);
            assert_eq!(state.entities.leave_requests().len(), 3);
        })
        .run();
}

#[test]
fn single_day_leave_is_fine() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    let day = NaiveDate::from_ymd_opt(2025, 3, 10);
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateLeaveRequest {
            form: LeaveForm {
                start_date: day,
                end_date: day,
                ..leave_form()
            },
            requester: UserId::new("3"),
        },
        &test_env(),
    );
    assert!(state.last_error.is_none());
}

#[test]
fn short_reason_is_rejected() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateLeaveRequest {
            form: LeaveForm {
                reason: "Rest".to_string(),
                ..leave_form()
            },
            requester: UserId::new("3"),
        },
        &test_env(),
    );
    assert_eq!(validation_fields(&state), vec!["reason"]);
}

#[test]
fn create_booking_keeps_the_form_values() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::CreateRoomBooking {
            form: booking_form(),
            requester: UserId::new("1"),
        })
        .then_state(|state| {
            let booking = &state.entities.room_bookings()[0];
            assert_eq!(booking.id.as_str(), "B-00000001");
            assert_eq!(booking.room_id, RoomId::new("3"));
            assert_eq!(booking.status, ReviewStatus::Waiting);
            assert_eq!(booking.start_time, "09:00");
            assert_eq!(booking.participants, 12);
            assert!(booking.required_facilities.contains(&Facility::Projector));
        })
        .run();
}

#[test]
fn booking_end_must_follow_start() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateRoomBooking {
            form: BookingForm {
                start_time: "10:00".to_string(),
                end_time: "10:00".to_string(),
                ..booking_form()
            },
            requester: UserId::new("1"),
        },
        &test_env(),
    );
    assert_eq!(validation_fields(&state), vec!["end_time"]);
}

#[test]
fn booking_time_must_be_zero_padded() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateRoomBooking {
            form: BookingForm {
                start_time: "9:00".to_string(),
                ..booking_form()
            },
            requester: UserId::new("1"),
        },
        &test_env(),
    );
    assert_eq!(validation_fields(&state), vec!["start_time"]);
}

#[test]
fn booking_room_must_fit_the_meeting() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    // Room 4 holds 6 people and has no projector.
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateRoomBooking {
            form: BookingForm {
                room_id: Some(RoomId::new("4")),
                ..booking_form()
            },
            requester: UserId::new("1"),
        },
        &test_env(),
    );
    assert_eq!(validation_fields(&state), vec!["room_id"]);
    assert_eq!(state.entities.room_bookings().len(), 3);
}

#[test]
fn booking_without_participants_reports_only_the_count() {
    let reducer = LifecycleReducer::new();
    let mut state = seeded_state();
    reducer.reduce(
        &mut state,
        LifecycleAction::CreateRoomBooking {
            form: BookingForm {
                participants: 0,
                ..booking_form()
            },
            requester: UserId::new("1"),
        },
        &test_env(),
    );
    assert_eq!(validation_fields(&state), vec!["participants"]);
}

#[test]
fn success_clears_previous_error() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::CreateTicket {
            form: TicketForm::default(),
            requester: UserId::new("1"),
        })
        .when_action(LifecycleAction::CreateTicket {
            form: ticket_form(),
            requester: UserId::new("1"),
        })
        .then_state(|state| assert!(state.last_error.is_none()))
        .run();
}

// ============================================================================
// Status changes
// ============================================================================

#[test]
fn approving_leave_records_the_reviewer() {
    let state = seeded_state();
    let leave_id = state.entities.leave_requests()[0].id.clone();

    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(LifecycleAction::ReviewLeaveRequest {
            leave_request_id: leave_id.clone(),
            status: ReviewStatus::Approved,
            reviewer: UserId::new("2"),
        })
        .then_state(move |state| {
            let request = state.entities.leave_request(&leave_id).unwrap();
            assert_eq!(request.status, ReviewStatus::Approved);
            assert_eq!(request.reviewed_by, Some(UserId::new("2")));
            assert_eq!(request.reviewed_at, Some(test_clock().now()));
        })
        .then_effects(|effects| {
            assertions::assert_emits(effects, |effect| {
                matches!(effect, DeskEffect::Toast(t) if t.message == "Leave request approved")
            });
        })
        .run();
}

#[test]
fn rejecting_a_booking_shows_an_error_toast() {
    let state = seeded_state();
    let booking_id = state.entities.room_bookings()[0].id.clone();

    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(LifecycleAction::ReviewRoomBooking {
            booking_id: booking_id.clone(),
            status: ReviewStatus::Rejected,
            reviewer: UserId::new("2"),
        })
        .then_state(move |state| {
            let booking = state.entities.room_booking(&booking_id).unwrap();
            assert_eq!(booking.status, ReviewStatus::Rejected);
            assert_eq!(booking.reviewed_by, Some(UserId::new("2")));
        })
        .then_effects(|effects| {
            assertions::assert_emits(effects, |effect| {
                matches!(effect, DeskEffect::Toast(t) if t.severity == Severity::Error)
            });
        })
        .run();
}

#[test]
fn ticket_status_change_touches_updated_at() {
    let state = seeded_state();
    let ticket = state.entities.tickets()[2].clone();
    assert_eq!(ticket.status, TicketStatus::Solved);

    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(LifecycleAction::ChangeTicketStatus {
            ticket_id: ticket.id.clone(),
            status: TicketStatus::Open,
            reviewer: UserId::new("2"),
        })
        .then_state(move |state| {
            let changed = state.entities.ticket(&ticket.id).unwrap();
            assert_eq!(changed.status, TicketStatus::Open);
            assert_eq!(changed.updated_at, test_clock().now());
            assert_eq!(changed.created_at, ticket.created_at);
        })
        .run();
}

#[test]
fn forward_only_refuses_reopening() {
    let state = seeded_state();
    let ticket_id = state.entities.tickets()[2].id.clone();

    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env().with_policy(TransitionPolicy::ForwardOnly))
        .given_state(state)
        .when_action(LifecycleAction::ChangeTicketStatus {
            ticket_id: ticket_id.clone(),
            status: TicketStatus::Open,
            reviewer: UserId::new("2"),
        })
        .then_state(move |state| {
            assert_eq!(
                state.last_error,
                Some(DeskError::InvalidTransition {
                    from: "solved".to_string(),
                    to: "open".to_string(),
                })
            );
            assert_eq!(
                state.entities.ticket(&ticket_id).unwrap().status,
                TicketStatus::Solved
            );
        })
        .run();
}

#[test]
fn unknown_ticket_is_not_found() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::ChangeTicketStatus {
            ticket_id: TicketId::new("T-MISSING0"),
            status: TicketStatus::Solved,
            reviewer: UserId::new("2"),
        })
        .then_state(|state| {
            assert_eq!(
                state.last_error,
                Some(DeskError::not_found(RequestKind::Ticket, "T-MISSING0"))
            );
        })
        .run();
}

// ============================================================================
// Comments and notifications
// ============================================================================

#[test]
fn comment_is_attached_to_ticket() {
    let state = seeded_state();
    let ticket_id = state.entities.tickets()[0].id.clone();

    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(LifecycleAction::AddComment {
            ticket_id: ticket_id.clone(),
            author: UserId::new("2"),
            content: "  Restarted the mail server.  ".to_string(),
        })
        .then_state(move |state| {
            let comments: Vec<_> = state.entities.comments_for(&ticket_id).collect();
            assert_eq!(comments.len(), 1);
            assert_eq!(comments[0].content, "Restarted the mail server.");
            assert_eq!(comments[0].user_id, UserId::new("2"));
        })
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn blank_comment_is_rejected() {
    let state = seeded_state();
    let ticket_id = state.entities.tickets()[0].id.clone();

    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(LifecycleAction::AddComment {
            ticket_id,
            author: UserId::new("2"),
            content: "\n\t".to_string(),
        })
        .then_state(|state| {
            assert_eq!(validation_fields(state), vec!["content"]);
            assert!(state.entities.comments().is_empty());
        })
        .run();
}

#[test]
fn marking_notifications_read_has_no_effects() {
    ReducerTest::new(LifecycleReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(LifecycleAction::MarkNotificationsRead {
            user_id: UserId::new("1"),
        })
        .then_state(|state| {
            assert!(state.entities.notifications().iter().all(|n| n.read));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn replayed_event_is_applied_without_effects() {
    let mut state = seeded_state();
    let mut ticket = state.entities.tickets()[0].clone();
    ticket.id = TicketId::new("T-REPLAYED");
    ticket.created_at = test_clock().now() + Duration::days(1);

    let effects = LifecycleReducer::new().reduce(
        &mut state,
        LifecycleAction::TicketCreated { ticket },
        &test_env(),
    );
    assert!(effects.is_empty());
    assert_eq!(state.entities.tickets()[0].id.as_str(), "T-REPLAYED");
}

// ============================================================================
// Properties
// ============================================================================

fn ticket_status() -> impl Strategy<Value = TicketStatus> {
    prop::sample::select(TicketStatus::ALL.to_vec())
}

fn review_status() -> impl Strategy<Value = ReviewStatus> {
    prop::sample::select(ReviewStatus::ALL.to_vec())
}

proptest! {
    #[test]
    fn statuses_stay_in_their_enum(
        ticket_moves in prop::collection::vec((0usize..4, ticket_status()), 1..12),
        leave_moves in prop::collection::vec((0usize..3, review_status()), 1..12),
        forward_only in any::<bool>(),
    ) {
        let reducer = LifecycleReducer::new();
        let policy = if forward_only { TransitionPolicy::ForwardOnly } else { TransitionPolicy::Unrestricted };
        let env = test_env().with_policy(policy);
        let mut state = seeded_state();

        for (index, status) in ticket_moves {
            let ticket_id = state.entities.tickets()[index].id.clone();
            reducer.reduce(
                &mut state,
                LifecycleAction::ChangeTicketStatus { ticket_id, status, reviewer: UserId::new("2") },
                &env,
            );
        }
        for (index, status) in leave_moves {
            let leave_request_id = state.entities.leave_requests()[index].id.clone();
            reducer.reduce(
                &mut state,
                LifecycleAction::ReviewLeaveRequest { leave_request_id, status, reviewer: UserId::new("2") },
                &env,
            );
        }

        prop_assert!(state.entities.tickets().iter().all(|t| TicketStatus::ALL.contains(&t.status)));
        prop_assert!(state.entities.leave_requests().iter().all(|r| ReviewStatus::ALL.contains(&r.status)));
        prop_assert_eq!(state.entities.tickets().len(), 4);
        prop_assert_eq!(state.entities.leave_requests().len(), 3);
    }

    #[test]
    fn unrestricted_transition_always_lands(
        index in 0usize..4,
        status in ticket_status(),
    ) {
        let reducer = LifecycleReducer::new();
        let mut state = seeded_state();
        let ticket_id = state.entities.tickets()[index].id.clone();
        reducer.reduce(
            &mut state,
            LifecycleAction::ChangeTicketStatus { ticket_id: ticket_id.clone(), status, reviewer: UserId::new("2") },
            &test_env(),
        );
        prop_assert_eq!(state.entities.ticket(&ticket_id).unwrap().status, status);
        prop_assert!(state.last_error.is_none());
    }
}
