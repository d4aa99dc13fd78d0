//! Reducer for request creation and status changes.

use super::actions::LifecycleAction;
use super::environment::LifecycleEnvironment;
use super::types::{LifecycleState, TransitionPolicy};
use crate::error::{AuthError, DeskError, FieldError, ValidationError};
use crate::rooms;
use crate::shell::{DeskEffect, Route, Toast};
use crate::store::EntityStore;
use crate::telemetry::{REQUESTS_CREATED, REQUESTS_TRANSITIONED, VALIDATION_FAILED};
use crate::types::{
    BookingForm, BookingId, Comment, CommentId, LeaveForm, LeaveRequest, LeaveRequestId,
    RequestKind, ReviewStatus, RoomBooking, Severity, Status, Ticket, TicketForm, TicketId,
    TicketStatus, UserId,
};
use chrono::NaiveTime;
use deskflow_core::{effect::Effect, reducer::Reducer};
use metrics::counter;
use smallvec::{SmallVec, smallvec};

/// Longest accepted ticket title or booking purpose, in characters
pub const MAX_TITLE_LEN: usize = 100;

/// Shortest accepted ticket description, in characters
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Shortest accepted leave reason, in characters
pub const MIN_REASON_LEN: usize = 5;

type Effects = SmallVec<[Effect<LifecycleAction, DeskEffect>; 4]>;

/// Creates requests and applies status changes
///
/// Commands are validated first. A rejected command records
/// `ValidationFailed` and emits an error toast; an accepted one applies its
/// event and emits a success toast, plus a navigation back to the list after
/// creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleReducer;

impl LifecycleReducer {
    /// Create a new lifecycle reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn validate_requester(entities: &EntityStore, requester: &UserId) -> Result<(), DeskError> {
        if entities.user(requester).is_some() {
            Ok(())
        } else {
            Err(AuthError::NotLoggedIn.into())
        }
    }

    fn validate_ticket(form: &TicketForm) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        let title = form.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at most {MAX_TITLE_LEN} characters"),
            ));
        }

        let description = form.description.trim();
        if description.is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        } else if description.chars().count() < MIN_DESCRIPTION_LEN {
            errors.push(FieldError::new(
                "description",
                format!("Description must be at least {MIN_DESCRIPTION_LEN} characters"),
            ));
        }

        if form.priority.is_none() {
            errors.push(FieldError::new("priority", "Priority is required"));
        }
        if form.department.is_none() {
            errors.push(FieldError::new("department", "Department is required"));
        }

        ValidationError::check(errors)
    }

    fn validate_leave(form: &LeaveForm) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if form.leave_type.is_none() {
            errors.push(FieldError::new("leave_type", "Leave type is required"));
        }
        if form.start_date.is_none() {
            errors.push(FieldError::new("start_date", "Start date is required"));
        }
        match (form.start_date, form.end_date) {
            (_, None) => errors.push(FieldError::new("end_date", "End date is required")),
            (Some(start), Some(end)) if end < start => errors.push(FieldError::new(
                "end_date",
                "End date must not be before the start date",
            )),
            _ => {},
        }

        let reason = form.reason.trim();
        if reason.is_empty() {
            errors.push(FieldError::new("reason", "Reason is required"));
        } else if reason.chars().count() < MIN_REASON_LEN {
            errors.push(FieldError::new(
                "reason",
                format!("Reason must be at least {MIN_REASON_LEN} characters"),
            ));
        }

        ValidationError::check(errors)
    }

    fn validate_booking(entities: &EntityStore, form: &BookingForm) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        let purpose = form.purpose.trim();
        if purpose.is_empty() {
            errors.push(FieldError::new("purpose", "Purpose is required"));
        } else if purpose.chars().count() > MAX_TITLE_LEN {
            errors.push(FieldError::new(
                "purpose",
                format!("Purpose must be at most {MAX_TITLE_LEN} characters"),
            ));
        }

        if form.date.is_none() {
            errors.push(FieldError::new("date", "Date is required"));
        }

        let start = Self::check_time(&mut errors, "start_time", "Start time", &form.start_time);
        let end = Self::check_time(&mut errors, "end_time", "End time", &form.end_time);
        if let (Some(start), Some(end)) = (start, end) {
            // Both are zero-padded HH:MM here, so string order is time order.
            if end <= start {
                errors.push(FieldError::new(
                    "end_time",
                    "End time must be after the start time",
                ));
            }
        }

        if form.participants == 0 {
            errors.push(FieldError::new(
                "participants",
                "At least one participant is required",
            ));
        }

        match &form.room_id {
            None => errors.push(FieldError::new("room_id", "Please select a room")),
            Some(room_id) => match entities.meeting_room(room_id) {
                None => errors.push(FieldError::new("room_id", format!("Unknown room {room_id}"))),
                Some(room)
                    if form.participants > 0
                        && !rooms::room_fits(
                            room,
                            form.participants,
                            &form.required_facilities,
                        ) =>
                {
                    errors.push(FieldError::new(
                        "room_id",
                        format!(
                            "{} does not fit {} participants with the requested facilities",
                            room.name, form.participants
                        ),
                    ));
                },
                Some(_) => {},
            },
        }

        ValidationError::check(errors)
    }

    /// Validates one `HH:MM` field, returning the trimmed value if it is usable
    fn check_time<'a>(
        errors: &mut Vec<FieldError>,
        field: &'static str,
        label: &str,
        value: &'a str,
    ) -> Option<&'a str> {
        let value = value.trim();
        if value.is_empty() {
            errors.push(FieldError::new(field, format!("{label} is required")));
            return None;
        }
        if value.len() != 5 || NaiveTime::parse_from_str(value, "%H:%M").is_err() {
            errors.push(FieldError::new(field, format!("{label} must be in HH:MM format")));
            return None;
        }
        Some(value)
    }

    fn validate_transition<S: Status>(
        policy: TransitionPolicy,
        from: S,
        to: S,
    ) -> Result<(), DeskError> {
        if policy.allows(from, to) {
            Ok(())
        } else {
            Err(DeskError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Applies an event to state
    fn apply_event(state: &mut LifecycleState, event: LifecycleAction) {
        match event {
            LifecycleAction::TicketCreated { ticket } => {
                state.entities.insert_ticket(ticket);
                state.last_error = None;
            },
            LifecycleAction::LeaveRequestCreated { leave_request } => {
                state.entities.insert_leave_request(leave_request);
                state.last_error = None;
            },
            LifecycleAction::RoomBookingCreated { booking } => {
                state.entities.insert_room_booking(booking);
                state.last_error = None;
            },
            LifecycleAction::TicketStatusChanged {
                ticket_id,
                to,
                changed_at,
                ..
            } => {
                if let Some(ticket) = state.entities.ticket_mut(&ticket_id) {
                    ticket.status = to;
                    ticket.updated_at = changed_at;
                }
                state.last_error = None;
            },
            LifecycleAction::LeaveRequestReviewed {
                leave_request_id,
                to,
                reviewed_by,
                reviewed_at,
                ..
            } => {
                if let Some(request) = state.entities.leave_request_mut(&leave_request_id) {
                    request.status = to;
                    request.reviewed_by = Some(reviewed_by);
                    request.reviewed_at = Some(reviewed_at);
                }
                state.last_error = None;
            },
            LifecycleAction::RoomBookingReviewed {
                booking_id,
                to,
                reviewed_by,
                reviewed_at,
                ..
            } => {
                if let Some(booking) = state.entities.room_booking_mut(&booking_id) {
                    booking.status = to;
                    booking.reviewed_by = Some(reviewed_by);
                    booking.reviewed_at = Some(reviewed_at);
                }
                state.last_error = None;
            },
            LifecycleAction::CommentAdded { comment } => {
                state.entities.push_comment(comment);
                state.last_error = None;
            },
            LifecycleAction::NotificationsRead { user_id } => {
                let changed = state.entities.mark_notifications_read(&user_id);
                tracing::debug!(user_id = %user_id, changed, "Notifications marked read");
                state.last_error = None;
            },
            LifecycleAction::ValidationFailed { error } => {
                state.last_error = Some(error);
            },
            // Commands are not events
            LifecycleAction::CreateTicket { .. }
            | LifecycleAction::CreateLeaveRequest { .. }
            | LifecycleAction::CreateRoomBooking { .. }
            | LifecycleAction::ChangeTicketStatus { .. }
            | LifecycleAction::ReviewLeaveRequest { .. }
            | LifecycleAction::ReviewRoomBooking { .. }
            | LifecycleAction::AddComment { .. }
            | LifecycleAction::MarkNotificationsRead { .. } => {},
        }
    }

    /// Records a rejected command and emits an error toast
    fn reject(state: &mut LifecycleState, error: DeskError, failure: &str) -> Effects {
        let reason = match &error {
            DeskError::Validation(_) => "validation",
            DeskError::NotFound { .. } => "not_found",
            DeskError::InvalidTransition { .. } => "invalid_transition",
            DeskError::Forbidden => "forbidden",
            DeskError::Auth(_) => "auth",
            DeskError::Store(_) => "store",
        };
        tracing::warn!(reason, error = %error, "{failure}");
        counter!(VALIDATION_FAILED, "reason" => reason).increment(1);

        let toast = Toast::error(format!("{failure}: {error}"));
        Self::apply_event(state, LifecycleAction::ValidationFailed { error });
        smallvec![Effect::Emit(DeskEffect::Toast(toast))]
    }

    /// Success toast and navigation back to the list
    fn created(kind: RequestKind, id: &str, message: &str) -> Effects {
        tracing::info!(kind = %kind, id, "Request created");
        counter!(REQUESTS_CREATED, "kind" => kind.to_string()).increment(1);
        smallvec![
            Effect::Emit(DeskEffect::Toast(Toast::success(message))),
            Effect::Emit(DeskEffect::Navigate(Route::List(kind))),
        ]
    }

    fn transitioned<S: Status>(kind: RequestKind, id: &str, from: S, to: S, toast: Toast) -> Effects {
        tracing::info!(kind = %kind, id, from = %from, to = %to, "Request status changed");
        counter!(REQUESTS_TRANSITIONED, "kind" => kind.to_string(), "to" => to.to_string())
            .increment(1);
        smallvec![Effect::Emit(DeskEffect::Toast(toast))]
    }

    /// Toast for a review decision
    fn review_toast(subject: &str, status: ReviewStatus) -> Toast {
        match status {
            ReviewStatus::Approved => Toast::success(format!("{subject} approved")),
            ReviewStatus::Rejected => Toast {
                message: format!("{subject} rejected"),
                severity: Severity::Error,
            },
            ReviewStatus::Waiting => Toast::success("Status updated successfully"),
        }
    }
}

impl Reducer for LifecycleReducer {
    type State = LifecycleState;
    type Action = LifecycleAction;
    type Environment = LifecycleEnvironment;
    type Output = DeskEffect;

    #[allow(clippy::too_many_lines)] // One arm per command
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            // ========== Creation ==========
            LifecycleAction::CreateTicket { form, requester } => {
                const FAILURE: &str = "Failed to create ticket";
                if let Err(error) = Self::validate_requester(&state.entities, &requester) {
                    return Self::reject(state, error, FAILURE);
                }
                if let Err(error) = Self::validate_ticket(&form) {
                    return Self::reject(state, error.into(), FAILURE);
                }
                let (Some(priority), Some(department)) = (form.priority, form.department) else {
                    return SmallVec::new();
                };

                let now = env.clock.now();
                let ticket = Ticket {
                    id: TicketId::generate(env.ids.as_ref()),
                    title: form.title.trim().to_string(),
                    description: form.description.trim().to_string(),
                    status: TicketStatus::INITIAL,
                    priority,
                    department,
                    assigned_to: None,
                    created_by: requester,
                    created_at: now,
                    updated_at: now,
                };
                let id = ticket.id.to_string();
                Self::apply_event(state, LifecycleAction::TicketCreated { ticket });
                Self::created(RequestKind::Ticket, &id, "Ticket created successfully")
            },

            LifecycleAction::CreateLeaveRequest { form, requester } => {
                const FAILURE: &str = "Failed to submit leave request";
                if let Err(error) = Self::validate_requester(&state.entities, &requester) {
                    return Self::reject(state, error, FAILURE);
                }
                if let Err(error) = Self::validate_leave(&form) {
                    return Self::reject(state, error.into(), FAILURE);
                }
                let (Some(leave_type), Some(start_date), Some(end_date)) =
                    (form.leave_type, form.start_date, form.end_date)
                else {
                    return SmallVec::new();
                };

                let leave_request = LeaveRequest {
                    id: LeaveRequestId::generate(env.ids.as_ref()),
                    user_id: requester,
                    leave_type,
                    start_date,
                    end_date,
                    reason: form.reason.trim().to_string(),
                    status: ReviewStatus::INITIAL,
                    reviewed_by: None,
                    reviewed_at: None,
                    created_at: env.clock.now(),
                };
                let id = leave_request.id.to_string();
                Self::apply_event(state, LifecycleAction::LeaveRequestCreated { leave_request });
                Self::created(
                    RequestKind::LeaveRequest,
                    &id,
                    "Leave request submitted successfully",
                )
            },

            LifecycleAction::CreateRoomBooking { form, requester } => {
                const FAILURE: &str = "Failed to submit booking";
                if let Err(error) = Self::validate_requester(&state.entities, &requester) {
                    return Self::reject(state, error, FAILURE);
                }
                if let Err(error) = Self::validate_booking(&state.entities, &form) {
                    return Self::reject(state, error.into(), FAILURE);
                }
                let (Some(room_id), Some(date)) = (form.room_id, form.date) else {
                    return SmallVec::new();
                };

                let booking = RoomBooking {
                    id: BookingId::generate(env.ids.as_ref()),
                    room_id,
                    user_id: requester,
                    purpose: form.purpose.trim().to_string(),
                    date,
                    start_time: form.start_time.trim().to_string(),
                    end_time: form.end_time.trim().to_string(),
                    participants: form.participants,
                    required_facilities: form.required_facilities,
                    status: ReviewStatus::INITIAL,
                    reviewed_by: None,
                    reviewed_at: None,
                    created_at: env.clock.now(),
                };
                let id = booking.id.to_string();
                Self::apply_event(state, LifecycleAction::RoomBookingCreated { booking });
                Self::created(
                    RequestKind::RoomBooking,
                    &id,
                    "Booking request submitted successfully",
                )
            },

            // ========== Status changes ==========
            LifecycleAction::ChangeTicketStatus {
                ticket_id,
                status,
                reviewer,
            } => {
                const FAILURE: &str = "Failed to update status";
                let Some(from) = state.entities.ticket(&ticket_id).map(|t| t.status) else {
                    let error = DeskError::not_found(RequestKind::Ticket, &ticket_id);
                    return Self::reject(state, error, FAILURE);
                };
                if let Err(error) = Self::validate_transition(env.policy, from, status) {
                    return Self::reject(state, error, FAILURE);
                }

                let id = ticket_id.to_string();
                Self::apply_event(
                    state,
                    LifecycleAction::TicketStatusChanged {
                        ticket_id,
                        from,
                        to: status,
                        changed_by: reviewer,
                        changed_at: env.clock.now(),
                    },
                );
                Self::transitioned(
                    RequestKind::Ticket,
                    &id,
                    from,
                    status,
                    Toast::success("Status updated successfully"),
                )
            },

            LifecycleAction::ReviewLeaveRequest {
                leave_request_id,
                status,
                reviewer,
            } => {
                const FAILURE: &str = "Failed to update status";
                let Some(from) = state
                    .entities
                    .leave_request(&leave_request_id)
                    .map(|r| r.status)
                else {
                    let error = DeskError::not_found(RequestKind::LeaveRequest, &leave_request_id);
                    return Self::reject(state, error, FAILURE);
                };
                if let Err(error) = Self::validate_transition(env.policy, from, status) {
                    return Self::reject(state, error, FAILURE);
                }

                let id = leave_request_id.to_string();
                Self::apply_event(
                    state,
                    LifecycleAction::LeaveRequestReviewed {
                        leave_request_id,
                        from,
                        to: status,
                        reviewed_by: reviewer,
                        reviewed_at: env.clock.now(),
                    },
                );
                Self::transitioned(
                    RequestKind::LeaveRequest,
                    &id,
                    from,
                    status,
                    Self::review_toast("Leave request", status),
                )
            },

            LifecycleAction::ReviewRoomBooking {
                booking_id,
                status,
                reviewer,
            } => {
                const FAILURE: &str = "Failed to update status";
                let Some(from) = state.entities.room_booking(&booking_id).map(|b| b.status) else {
                    let error = DeskError::not_found(RequestKind::RoomBooking, &booking_id);
                    return Self::reject(state, error, FAILURE);
                };
                if let Err(error) = Self::validate_transition(env.policy, from, status) {
                    return Self::reject(state, error, FAILURE);
                }

                let id = booking_id.to_string();
                Self::apply_event(
                    state,
                    LifecycleAction::RoomBookingReviewed {
                        booking_id,
                        from,
                        to: status,
                        reviewed_by: reviewer,
                        reviewed_at: env.clock.now(),
                    },
                );
                Self::transitioned(
                    RequestKind::RoomBooking,
                    &id,
                    from,
                    status,
                    Self::review_toast("Booking", status),
                )
            },

            // ========== Comments and notifications ==========
            LifecycleAction::AddComment {
                ticket_id,
                author,
                content,
            } => {
                const FAILURE: &str = "Failed to add comment";
                if let Err(error) = Self::validate_requester(&state.entities, &author) {
                    return Self::reject(state, error, FAILURE);
                }
                if state.entities.ticket(&ticket_id).is_none() {
                    let error = DeskError::not_found(RequestKind::Ticket, &ticket_id);
                    return Self::reject(state, error, FAILURE);
                }
                let content = content.trim();
                if content.is_empty() {
                    let error = ValidationError {
                        errors: vec![FieldError::new("content", "Comment cannot be empty")],
                    };
                    return Self::reject(state, error.into(), FAILURE);
                }

                let comment = Comment {
                    id: CommentId::generate(env.ids.as_ref()),
                    ticket_id,
                    user_id: author,
                    content: content.to_string(),
                    created_at: env.clock.now(),
                };
                tracing::info!(ticket_id = %comment.ticket_id, author = %comment.user_id, "Comment added");
                Self::apply_event(state, LifecycleAction::CommentAdded { comment });
                smallvec![Effect::Emit(DeskEffect::Toast(Toast::success(
                    "Comment added successfully"
                )))]
            },

            LifecycleAction::MarkNotificationsRead { user_id } => {
                Self::apply_event(state, LifecycleAction::NotificationsRead { user_id });
                SmallVec::new()
            },

            // ========== Events (replayed directly) ==========
            event => {
                Self::apply_event(state, event);
                SmallVec::new()
            },
        }
    }
}
