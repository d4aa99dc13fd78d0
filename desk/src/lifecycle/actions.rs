//! Actions for the lifecycle reducer.

use crate::error::DeskError;
use crate::types::{
    BookingForm, BookingId, Comment, LeaveForm, LeaveRequest, LeaveRequestId, LeaveStatus,
    BookingStatus, RoomBooking, Ticket, TicketForm, TicketId, TicketStatus, UserId,
};
use chrono::{DateTime, Utc};

/// Commands and the events they produce
///
/// Commands are validated against the current state; on success the
/// matching event is applied, otherwise `ValidationFailed` records the error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleAction {
    // ========================================================================
    // Commands
    // ========================================================================
    /// Submit the new ticket form
    CreateTicket {
        /// Form input
        form: TicketForm,
        /// Owner of the new ticket
        requester: UserId,
    },

    /// Submit the new leave request form
    CreateLeaveRequest {
        /// Form input
        form: LeaveForm,
        /// Owner of the new request
        requester: UserId,
    },

    /// Submit the new room booking form
    CreateRoomBooking {
        /// Form input
        form: BookingForm,
        /// Owner of the new booking
        requester: UserId,
    },

    /// Move a ticket to another status
    ChangeTicketStatus {
        /// Ticket to change
        ticket_id: TicketId,
        /// New status
        status: TicketStatus,
        /// Who made the change
        reviewer: UserId,
    },

    /// Approve, reject or reset a leave request
    ReviewLeaveRequest {
        /// Request to review
        leave_request_id: LeaveRequestId,
        /// New status
        status: LeaveStatus,
        /// Reviewer
        reviewer: UserId,
    },

    /// Approve, reject or reset a room booking
    ReviewRoomBooking {
        /// Booking to review
        booking_id: BookingId,
        /// New status
        status: BookingStatus,
        /// Reviewer
        reviewer: UserId,
    },

    /// Comment on a ticket
    AddComment {
        /// Ticket to comment on
        ticket_id: TicketId,
        /// Author
        author: UserId,
        /// Text
        content: String,
    },

    /// Mark all notifications of a user as read
    MarkNotificationsRead {
        /// Recipient
        user_id: UserId,
    },

    // ========================================================================
    // Events
    // ========================================================================
    /// A ticket was filed
    TicketCreated {
        /// The new ticket
        ticket: Ticket,
    },

    /// A leave request was filed
    LeaveRequestCreated {
        /// The new request
        leave_request: LeaveRequest,
    },

    /// A room booking was requested
    RoomBookingCreated {
        /// The new booking
        booking: RoomBooking,
    },

    /// A ticket changed status
    TicketStatusChanged {
        /// Ticket
        ticket_id: TicketId,
        /// Previous status
        from: TicketStatus,
        /// New status
        to: TicketStatus,
        /// Who made the change
        changed_by: UserId,
        /// When
        changed_at: DateTime<Utc>,
    },

    /// A leave request was reviewed
    LeaveRequestReviewed {
        /// Request
        leave_request_id: LeaveRequestId,
        /// Previous status
        from: LeaveStatus,
        /// New status
        to: LeaveStatus,
        /// Reviewer
        reviewed_by: UserId,
        /// When
        reviewed_at: DateTime<Utc>,
    },

    /// A room booking was reviewed
    RoomBookingReviewed {
        /// Booking
        booking_id: BookingId,
        /// Previous status
        from: BookingStatus,
        /// New status
        to: BookingStatus,
        /// Reviewer
        reviewed_by: UserId,
        /// When
        reviewed_at: DateTime<Utc>,
    },

    /// A comment was added to a ticket
    CommentAdded {
        /// The new comment
        comment: Comment,
    },

    /// A user's notifications were marked read
    NotificationsRead {
        /// Recipient
        user_id: UserId,
    },

    /// A command was rejected
    ValidationFailed {
        /// Why
        error: DeskError,
    },
}

impl LifecycleAction {
    /// Whether this action is an event (as opposed to a command)
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::TicketCreated { .. }
                | Self::LeaveRequestCreated { .. }
                | Self::RoomBookingCreated { .. }
                | Self::TicketStatusChanged { .. }
                | Self::LeaveRequestReviewed { .. }
                | Self::RoomBookingReviewed { .. }
                | Self::CommentAdded { .. }
                | Self::NotificationsRead { .. }
                | Self::ValidationFailed { .. }
        )
    }
}
