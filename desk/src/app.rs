//! The desk facade: session, dispatch and queries.
//!
//! [`Desk`] is the imperative shell around the lifecycle reducer. It owns the
//! store, remembers who is signed in, checks review rights before status
//! changes and executes the toast and navigation effects the reducer emits.

use crate::auth;
use crate::config::DeskConfig;
use crate::error::{AuthError, DeskError, SeedError};
use crate::filter::{self, BookingFilter, LeaveFilter, SearchMode, TicketFilter};
use crate::lifecycle::{LifecycleAction, LifecycleEnvironment, LifecycleReducer, LifecycleState};
use crate::rooms;
use crate::seed::Seed;
use crate::shell::{DeskEffect, HistoryNavigator, Navigator, Route, Toaster, TracingToaster};
use crate::stats::{self, Activity, Overview};
use crate::store::EntityStore;
use crate::types::{
    BookingForm, BookingId, BookingStatus, Capability, Comment, Facility, LeaveForm,
    LeaveRequest, LeaveRequestId, LeaveStatus, MeetingRoom, Notification, RequestKind,
    RoomBooking, Severity, Ticket, TicketForm, TicketId, TicketStatus, User,
};
use deskflow_core::store::Store;
use std::collections::BTreeSet;

/// The request desk as seen by one signed-in user at a time
pub struct Desk<T = TracingToaster, N = HistoryNavigator>
where
    T: Toaster,
    N: Navigator,
{
    store: Store<LifecycleReducer>,
    search_mode: SearchMode,
    session: Option<User>,
    toaster: T,
    navigator: N,
}

impl Desk {
    /// Production desk: wall clock, random ids, logging toaster
    ///
    /// Seeds from `config.seed_file` if set, from the demo data otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the seed file cannot be loaded.
    pub fn from_config(config: &DeskConfig) -> Result<Self, SeedError> {
        let env = LifecycleEnvironment::production().with_policy(config.transition_policy);
        let seed = match &config.seed_file {
            Some(path) => Seed::from_json_file(path)?,
            None => Seed::demo(env.clock.now(), env.ids.as_ref()),
        };

        Ok(Self::new(
            EntityStore::init(seed),
            env,
            config.search_mode,
            TracingToaster,
            HistoryNavigator::default(),
        ))
    }
}

impl<T, N> Desk<T, N>
where
    T: Toaster,
    N: Navigator,
{
    /// Assembles a desk from its parts
    #[must_use]
    pub fn new(
        entities: EntityStore,
        env: LifecycleEnvironment,
        search_mode: SearchMode,
        toaster: T,
        navigator: N,
    ) -> Self {
        tracing::info!(policy = ?env.policy, ?search_mode, "Desk ready");
        Self {
            store: Store::new(LifecycleState::new(entities), LifecycleReducer::new(), env),
            search_mode,
            session: None,
            toaster,
            navigator,
        }
    }

    /// Every entity, unfiltered
    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.store.state().entities
    }

    /// The toaster collaborator
    #[must_use]
    pub const fn toaster(&self) -> &T {
        &self.toaster
    }

    /// The navigator collaborator
    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Active search mode
    #[must_use]
    pub const fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Signs in with a demo account and moves to the dashboard
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown credentials.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, DeskError> {
        match auth::login(self.entities(), email, password) {
            Ok(user) => {
                self.toaster.show("Logged in successfully", Severity::Success);
                self.navigator.navigate(Route::Dashboard);
                self.session = Some(user.clone());
                Ok(user)
            },
            Err(error) => {
                self.toaster.show("Invalid email or password", Severity::Error);
                Err(error.into())
            },
        }
    }

    /// Signs out and returns to the login screen
    pub fn logout(&mut self) {
        if let Some(user) = self.session.take() {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.navigator.navigate(Route::Login);
    }

    /// The signed-in user
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    fn session_user(&self) -> Result<&User, DeskError> {
        self.session.as_ref().ok_or(DeskError::Auth(AuthError::NotLoggedIn))
    }

    /// The signed-in user, or an error toast saying `to_do` needs a login
    fn requester(&mut self, to_do: &str) -> Result<User, DeskError> {
        if let Some(user) = &self.session {
            return Ok(user.clone());
        }
        self.toaster
            .show(&format!("You must be logged in to {to_do}"), Severity::Error);
        Err(AuthError::NotLoggedIn.into())
    }

    /// The signed-in user if they may review requests
    fn reviewer(&mut self) -> Result<User, DeskError> {
        let user = self.requester("change a status")?;
        if user.can(Capability::Review) {
            return Ok(user);
        }
        tracing::warn!(user_id = %user.id, "Status change refused, missing review rights");
        self.toaster
            .show("Only administrators can change a status", Severity::Error);
        Err(DeskError::Forbidden)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Reduces `action` and runs the effects it emits
    fn dispatch(&mut self, action: LifecycleAction) -> Result<(), DeskError> {
        let mut outputs = Vec::new();
        self.store.send(action, |effect| outputs.push(effect))?;

        for effect in outputs {
            match effect {
                DeskEffect::Toast(toast) => self.toaster.show(&toast.message, toast.severity),
                DeskEffect::Navigate(route) => self.navigator.navigate(route),
            }
        }

        match &self.store.state().last_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    /// Newest entry of a collection after a successful create
    fn newest<E: Clone>(items: &[E], kind: RequestKind) -> Result<E, DeskError> {
        items
            .first()
            .cloned()
            .ok_or_else(|| DeskError::not_found(kind, "newest"))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Files a ticket for the signed-in user
    ///
    /// # Errors
    ///
    /// [`DeskError::Validation`] for bad input, [`AuthError::NotLoggedIn`]
    /// without a session.
    pub fn create_ticket(&mut self, form: TicketForm) -> Result<Ticket, DeskError> {
        let requester = self.requester("submit a ticket")?;
        self.dispatch(LifecycleAction::CreateTicket {
            form,
            requester: requester.id,
        })?;
        Self::newest(self.entities().tickets(), RequestKind::Ticket)
    }

    /// Files a leave request for the signed-in user
    ///
    /// # Errors
    ///
    /// [`DeskError::Validation`] for bad input, [`AuthError::NotLoggedIn`]
    /// without a session.
    pub fn create_leave_request(&mut self, form: LeaveForm) -> Result<LeaveRequest, DeskError> {
        let requester = self.requester("submit a leave request")?;
        self.dispatch(LifecycleAction::CreateLeaveRequest {
            form,
            requester: requester.id,
        })?;
        Self::newest(self.entities().leave_requests(), RequestKind::LeaveRequest)
    }

    /// Requests a room booking for the signed-in user
    ///
    /// # Errors
    ///
    /// [`DeskError::Validation`] for bad input (including a room that does
    /// not fit), [`AuthError::NotLoggedIn`] without a session.
    pub fn create_room_booking(&mut self, form: BookingForm) -> Result<RoomBooking, DeskError> {
        let requester = self.requester("book a room")?;
        self.dispatch(LifecycleAction::CreateRoomBooking {
            form,
            requester: requester.id,
        })?;
        Self::newest(self.entities().room_bookings(), RequestKind::RoomBooking)
    }

    /// Moves a ticket to `status`
    ///
    /// # Errors
    ///
    /// [`DeskError::Forbidden`] without review rights, [`DeskError::NotFound`]
    /// for an unknown id, [`DeskError::InvalidTransition`] if the policy
    /// refuses the move.
    pub fn change_ticket_status(
        &mut self,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<Ticket, DeskError> {
        let reviewer = self.reviewer()?;
        self.dispatch(LifecycleAction::ChangeTicketStatus {
            ticket_id: ticket_id.clone(),
            status,
            reviewer: reviewer.id,
        })?;
        self.ticket(ticket_id).cloned()
    }

    /// Approves, rejects or resets a leave request
    ///
    /// # Errors
    ///
    /// [`DeskError::Forbidden`] without review rights, [`DeskError::NotFound`]
    /// for an unknown id, [`DeskError::InvalidTransition`] if the policy
    /// refuses the move.
    pub fn review_leave_request(
        &mut self,
        leave_request_id: &LeaveRequestId,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, DeskError> {
        let reviewer = self.reviewer()?;
        self.dispatch(LifecycleAction::ReviewLeaveRequest {
            leave_request_id: leave_request_id.clone(),
            status,
            reviewer: reviewer.id,
        })?;
        self.leave_request(leave_request_id).cloned()
    }

    /// Approves, rejects or resets a room booking
    ///
    /// # Errors
    ///
    /// [`DeskError::Forbidden`] without review rights, [`DeskError::NotFound`]
    /// for an unknown id, [`DeskError::InvalidTransition`] if the policy
    /// refuses the move.
    pub fn review_room_booking(
        &mut self,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> Result<RoomBooking, DeskError> {
        let reviewer = self.reviewer()?;
        self.dispatch(LifecycleAction::ReviewRoomBooking {
            booking_id: booking_id.clone(),
            status,
            reviewer: reviewer.id,
        })?;
        self.room_booking(booking_id).cloned()
    }

    /// Comments on a ticket as the signed-in user
    ///
    /// # Errors
    ///
    /// [`DeskError::Validation`] for a blank comment, [`DeskError::NotFound`]
    /// for an unknown ticket, [`AuthError::NotLoggedIn`] without a session.
    pub fn add_comment(&mut self, ticket_id: &TicketId, content: &str) -> Result<Comment, DeskError> {
        let author = self.requester("comment")?;
        self.dispatch(LifecycleAction::AddComment {
            ticket_id: ticket_id.clone(),
            author: author.id,
            content: content.to_string(),
        })?;
        self.entities()
            .comments()
            .last()
            .cloned()
            .ok_or_else(|| DeskError::not_found(RequestKind::Ticket, ticket_id))
    }

    /// Marks the signed-in user's notifications read; returns how many were unread
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn mark_notifications_read(&mut self) -> Result<usize, DeskError> {
        let user = self.requester("read notifications")?;
        let unread = stats::unread_notifications(self.entities(), &user.id);
        self.dispatch(LifecycleAction::MarkNotificationsRead { user_id: user.id })?;
        Ok(unread)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tickets matching `criteria` that the signed-in user may see
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn tickets(&self, criteria: &TicketFilter) -> Result<Vec<&Ticket>, DeskError> {
        let user = self.session_user()?;
        Ok(filter::filter(self.entities(), criteria, user, self.search_mode))
    }

    /// Leave requests matching `criteria` that the signed-in user may see
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn leave_requests(&self, criteria: &LeaveFilter) -> Result<Vec<&LeaveRequest>, DeskError> {
        let user = self.session_user()?;
        Ok(filter::filter(self.entities(), criteria, user, self.search_mode))
    }

    /// Room bookings matching `criteria` that the signed-in user may see
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn room_bookings(&self, criteria: &BookingFilter) -> Result<Vec<&RoomBooking>, DeskError> {
        let user = self.session_user()?;
        Ok(filter::filter(self.entities(), criteria, user, self.search_mode))
    }

    /// One ticket by id
    ///
    /// # Errors
    ///
    /// [`DeskError::NotFound`] for an unknown id.
    pub fn ticket(&self, id: &TicketId) -> Result<&Ticket, DeskError> {
        self.entities()
            .ticket(id)
            .ok_or_else(|| DeskError::not_found(RequestKind::Ticket, id))
    }

    /// One leave request by id
    ///
    /// # Errors
    ///
    /// [`DeskError::NotFound`] for an unknown id.
    pub fn leave_request(&self, id: &LeaveRequestId) -> Result<&LeaveRequest, DeskError> {
        self.entities()
            .leave_request(id)
            .ok_or_else(|| DeskError::not_found(RequestKind::LeaveRequest, id))
    }

    /// One room booking by id
    ///
    /// # Errors
    ///
    /// [`DeskError::NotFound`] for an unknown id.
    pub fn room_booking(&self, id: &BookingId) -> Result<&RoomBooking, DeskError> {
        self.entities()
            .room_booking(id)
            .ok_or_else(|| DeskError::not_found(RequestKind::RoomBooking, id))
    }

    /// Comments on a ticket, oldest first
    #[must_use]
    pub fn comments(&self, ticket_id: &TicketId) -> Vec<&Comment> {
        self.entities().comments_for(ticket_id).collect()
    }

    /// Notifications of the signed-in user
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn notifications(&self) -> Result<Vec<&Notification>, DeskError> {
        let user = self.session_user()?;
        Ok(self.entities().notifications_for(&user.id).collect())
    }

    /// Rooms that fit `participants` people and offer `required`
    #[must_use]
    pub fn available_rooms(
        &self,
        participants: u32,
        required: &BTreeSet<Facility>,
    ) -> Vec<&MeetingRoom> {
        rooms::available_rooms(self.entities().meeting_rooms(), participants, required)
    }

    /// Pending requests of `kind` in the signed-in user's scope
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn count(&self, kind: RequestKind) -> Result<usize, DeskError> {
        let user = self.session_user()?;
        Ok(stats::count(self.entities(), kind, &stats::Scope::for_user(user)))
    }

    /// Dashboard counters of the signed-in user
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn overview(&self) -> Result<Overview, DeskError> {
        let user = self.session_user()?;
        Ok(stats::overview(self.entities(), user))
    }

    /// Recent activity visible to the signed-in user
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session.
    pub fn recent_activity(&self) -> Result<Vec<Activity>, DeskError> {
        let user = self.session_user()?;
        Ok(stats::recent_activity(self.entities(), user))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::shell::RecordingToaster;
    use crate::types::{Department, Priority};
    use deskflow_core::environment::Clock;
    use deskflow_testing::{SequentialIdGenerator, test_clock};
    use std::sync::Arc;

    fn desk() -> Desk<RecordingToaster, HistoryNavigator> {
        let ids = Arc::new(SequentialIdGenerator::new());
        let seed = Seed::demo(test_clock().now(), ids.as_ref());
        Desk::new(
            EntityStore::init(seed),
            LifecycleEnvironment::new(Arc::new(test_clock()), ids),
            SearchMode::Exclusive,
            RecordingToaster::new(),
            HistoryNavigator::default(),
        )
    }

    fn form() -> TicketForm {
        TicketForm {
            title: "Monitor flickers".to_string(),
            description: "The second monitor flickers every few seconds.".to_string(),
            priority: Some(Priority::Low),
            department: Some(Department::It),
        }
    }

    #[test]
    fn login_moves_to_dashboard() {
        let mut desk = desk();
        let user = desk.login("user@example.com", "password").unwrap();
        assert_eq!(desk.current_user(), Some(&user));
        assert_eq!(desk.navigator().current(), &Route::Dashboard);
        assert_eq!(desk.toaster().last().unwrap().severity, Severity::Success);
    }

    #[test]
    fn failed_login_keeps_session_empty() {
        let mut desk = desk();
        let err = desk.login("user@example.com", "nope").unwrap_err();
        assert_eq!(err, DeskError::Auth(AuthError::InvalidCredentials));
        assert!(desk.current_user().is_none());
        assert_eq!(desk.toaster().last().unwrap().severity, Severity::Error);
    }

    #[test]
    fn creating_without_session_is_refused() {
        let mut desk = desk();
        let err = desk.create_ticket(form()).unwrap_err();
        assert_eq!(err, DeskError::Auth(AuthError::NotLoggedIn));
        assert_eq!(
            desk.toaster().last().unwrap().message,
            "You must be logged in to submit a ticket"
        );
        assert_eq!(desk.entities().tickets().len(), 4);
    }

    #[test]
    fn created_ticket_is_returned_and_listed() {
        let mut desk = desk();
        desk.login("user@example.com", "password").unwrap();
        let ticket = desk.create_ticket(form()).unwrap();

        // Fourteen ids went into the demo seed.
        assert_eq!(ticket.id.as_str(), "T-0000000F");
        assert_eq!(desk.navigator().current(), &Route::List(RequestKind::Ticket));
        let listed = desk.tickets(&TicketFilter::default()).unwrap();
        assert_eq!(listed[0].id, ticket.id);
    }

    #[test]
    fn regular_user_cannot_review() {
        let mut desk = desk();
        desk.login("user@example.com", "password").unwrap();
        let id = desk.entities().leave_requests()[0].id.clone();

        let err = desk
            .review_leave_request(&id, LeaveStatus::Approved)
            .unwrap_err();
        assert_eq!(err, DeskError::Forbidden);
        assert_eq!(
            desk.leave_request(&id).unwrap().status,
            LeaveStatus::Waiting
        );
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let desk = desk();
        assert_eq!(
            desk.ticket(&TicketId::new("T-NOPE0000")).unwrap_err(),
            DeskError::not_found(RequestKind::Ticket, "T-NOPE0000")
        );
        assert!(matches!(
            desk.room_booking(&BookingId::new("B-NOPE0000")),
            Err(DeskError::NotFound { kind: RequestKind::RoomBooking, .. })
        ));
    }

    #[test]
    fn queries_need_a_session() {
        let desk = desk();
        assert_eq!(
            desk.overview().unwrap_err(),
            DeskError::Auth(AuthError::NotLoggedIn)
        );
    }

    #[test]
    fn logout_returns_to_login() {
        let mut desk = desk();
        desk.login("admin@example.com", "password").unwrap();
        desk.logout();
        assert!(desk.current_user().is_none());
        assert_eq!(desk.navigator().current(), &Route::Login);
    }

    #[test]
    fn comment_list_outlives_the_lookup_id() {
        let mut desk = desk();
        desk.login("admin@example.com", "password").unwrap();
        desk.add_comment(&TicketId::new("T-00000001"), "Mailbox was full.")
            .unwrap();

        let comments = {
            let id = TicketId::new("T-00000001");
            desk.comments(&id)
        };
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "Mailbox was full.");
    }

    #[test]
    fn marking_read_reports_previously_unread() {
        let mut desk = desk();
        desk.login("user@example.com", "password").unwrap();
        assert_eq!(desk.mark_notifications_read().unwrap(), 3);
        assert_eq!(desk.overview().unwrap().unread_notifications, 0);
        assert_eq!(desk.mark_notifications_read().unwrap(), 0);
    }
}
