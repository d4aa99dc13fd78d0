//! In-memory entity store.
//!
//! One explicit object holding every collection the desk works with. It is
//! created from a [`Seed`] and handed to whoever needs it; there is no global
//! instance. Request collections are kept newest first: creation prepends.

use crate::seed::Seed;
use crate::types::{
    BookingId, Comment, LeaveRequest, LeaveRequestId, MeetingRoom, Notification, RoomBooking,
    RoomId, Ticket, TicketId, User, UserId,
};

/// Name shown for ids that resolve to no user
pub const UNKNOWN_USER: &str = "Unknown User";

/// Name shown for ids that resolve to no room
pub const UNKNOWN_ROOM: &str = "Unknown Room";

/// Canonical collections of users, requests, rooms, notifications and comments
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityStore {
    users: Vec<User>,
    tickets: Vec<Ticket>,
    leave_requests: Vec<LeaveRequest>,
    room_bookings: Vec<RoomBooking>,
    meeting_rooms: Vec<MeetingRoom>,
    notifications: Vec<Notification>,
    comments: Vec<Comment>,
}

impl EntityStore {
    /// Builds a store from seed data
    #[must_use]
    pub fn init(seed: Seed) -> Self {
        tracing::debug!(
            users = seed.users.len(),
            tickets = seed.tickets.len(),
            leave_requests = seed.leave_requests.len(),
            room_bookings = seed.room_bookings.len(),
            meeting_rooms = seed.meeting_rooms.len(),
            "Entity store initialized"
        );

        Self {
            users: seed.users,
            tickets: seed.tickets,
            leave_requests: seed.leave_requests,
            room_bookings: seed.room_bookings,
            meeting_rooms: seed.meeting_rooms,
            notifications: seed.notifications,
            comments: seed.comments,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// All users
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All tickets, newest first
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// All leave requests, newest first
    #[must_use]
    pub fn leave_requests(&self) -> &[LeaveRequest] {
        &self.leave_requests
    }

    /// All room bookings, newest first
    #[must_use]
    pub fn room_bookings(&self) -> &[RoomBooking] {
        &self.room_bookings
    }

    /// All meeting rooms
    #[must_use]
    pub fn meeting_rooms(&self) -> &[MeetingRoom] {
        &self.meeting_rooms
    }

    /// All notifications
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// All ticket comments, oldest first
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// User by id
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    /// User by login email, case-insensitive
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    /// Display name of a user, or [`UNKNOWN_USER`]
    #[must_use]
    pub fn user_name(&self, id: &UserId) -> &str {
        self.user(id).map_or(UNKNOWN_USER, |user| user.name.as_str())
    }

    /// Ticket by id
    #[must_use]
    pub fn ticket(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| &ticket.id == id)
    }

    /// Leave request by id
    #[must_use]
    pub fn leave_request(&self, id: &LeaveRequestId) -> Option<&LeaveRequest> {
        self.leave_requests.iter().find(|request| &request.id == id)
    }

    /// Room booking by id
    #[must_use]
    pub fn room_booking(&self, id: &BookingId) -> Option<&RoomBooking> {
        self.room_bookings.iter().find(|booking| &booking.id == id)
    }

    /// Meeting room by id
    #[must_use]
    pub fn meeting_room(&self, id: &RoomId) -> Option<&MeetingRoom> {
        self.meeting_rooms.iter().find(|room| &room.id == id)
    }

    /// Display name of a room, or [`UNKNOWN_ROOM`]
    #[must_use]
    pub fn room_name(&self, id: &RoomId) -> &str {
        self.meeting_room(id)
            .map_or(UNKNOWN_ROOM, |room| room.name.as_str())
    }

    /// Comments on one ticket, oldest first
    pub fn comments_for<'a>(
        &'a self,
        ticket_id: &TicketId,
    ) -> impl Iterator<Item = &'a Comment> + use<'a> {
        let ticket_id = ticket_id.clone();
        self.comments
            .iter()
            .filter(move |comment| comment.ticket_id == ticket_id)
    }

    /// Notifications addressed to one user
    pub fn notifications_for<'a>(
        &'a self,
        user_id: &'a UserId,
    ) -> impl Iterator<Item = &'a Notification> {
        self.notifications
            .iter()
            .filter(move |notification| &notification.user_id == user_id)
    }

    // ========================================================================
    // Mutation (used by the lifecycle reducer)
    // ========================================================================

    pub(crate) fn insert_ticket(&mut self, ticket: Ticket) {
        self.tickets.insert(0, ticket);
    }

    pub(crate) fn insert_leave_request(&mut self, request: LeaveRequest) {
        self.leave_requests.insert(0, request);
    }

    pub(crate) fn insert_room_booking(&mut self, booking: RoomBooking) {
        self.room_bookings.insert(0, booking);
    }

    pub(crate) fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub(crate) fn ticket_mut(&mut self, id: &TicketId) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|ticket| &ticket.id == id)
    }

    pub(crate) fn leave_request_mut(&mut self, id: &LeaveRequestId) -> Option<&mut LeaveRequest> {
        self.leave_requests
            .iter_mut()
            .find(|request| &request.id == id)
    }

    pub(crate) fn room_booking_mut(&mut self, id: &BookingId) -> Option<&mut RoomBooking> {
        self.room_bookings
            .iter_mut()
            .find(|booking| &booking.id == id)
    }

    /// Marks every unread notification of `user_id` as read; returns how many changed
    pub(crate) fn mark_notifications_read(&mut self, user_id: &UserId) -> usize {
        let mut changed = 0;
        for notification in self
            .notifications
            .iter_mut()
            .filter(|notification| &notification.user_id == user_id && !notification.read)
        {
            notification.read = true;
            changed += 1;
        }
        changed
    }
}
