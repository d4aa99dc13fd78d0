//! Domain types for the request desk.
//!
//! Users, the three request kinds (tickets, leave requests, room bookings),
//! meeting rooms, notifications and ticket comments, plus the form inputs the
//! lifecycle reducer validates.

use chrono::{DateTime, NaiveDate, Utc};
use deskflow_core::environment::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

macro_rules! prefixed_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Prefix of generated identifiers
            pub const PREFIX: &'static str = $prefix;

            /// Generates `<PREFIX>-<8 uppercase hex digits>`
            #[must_use]
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(format!("{}-{}", Self::PREFIX, ids.short_token()))
            }
        }
    };
}

string_id!(
    /// Identifier of a user (seeded, e.g. `"1"`)
    UserId
);
string_id!(
    /// Identifier of an IT ticket (`T-XXXXXXXX`)
    TicketId
);
string_id!(
    /// Identifier of a leave request (`L-XXXXXXXX`)
    LeaveRequestId
);
string_id!(
    /// Identifier of a room booking (`B-XXXXXXXX`)
    BookingId
);
string_id!(
    /// Identifier of a meeting room (seeded)
    RoomId
);
string_id!(
    /// Identifier of a notification
    NotificationId
);
string_id!(
    /// Identifier of a ticket comment
    CommentId
);

prefixed_id!(TicketId, "T");
prefixed_id!(LeaveRequestId, "L");
prefixed_id!(BookingId, "B");

impl NotificationId {
    /// Full UUID string
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.generate().to_string())
    }
}

impl CommentId {
    /// Full UUID string
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.generate().to_string())
    }
}

// ============================================================================
// Users and roles
// ============================================================================

/// What a role is allowed to do
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// See requests owned by other users
    ViewAll,
    /// Change the status of any request
    Review,
}

/// Closed set of user roles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee
    #[default]
    User,
    /// Administrator
    Admin,
}

impl Role {
    /// Capabilities granted to this role
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::User => &[],
            Self::Admin => &[Capability::ViewAll, Capability::Review],
        }
    }

    /// Whether this role grants `capability`
    #[must_use]
    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Company department
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    /// Information technology
    #[serde(rename = "IT")]
    It,
    /// Human resources
    #[serde(rename = "HR")]
    Hr,
    /// Marketing
    Marketing,
    /// Sales
    Sales,
    /// Finance
    Finance,
    /// Anything else
    Other,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::It => "IT",
            Self::Hr => "HR",
            Self::Marketing => "Marketing",
            Self::Sales => "Sales",
            Self::Finance => "Finance",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A seeded user account. Immutable after seeding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Role, decides visibility and review rights
    pub role: Role,
    /// Department the user belongs to
    pub department: Department,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Whether the user's role grants `capability`
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }
}

// ============================================================================
// Statuses
// ============================================================================

/// A closed status enum for one request kind
pub trait Status: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Status given to newly created requests
    const INITIAL: Self;

    /// Every member of the enum
    const ALL: &'static [Self];

    /// Whether the request still needs attention (counted on the dashboard)
    fn is_pending(self) -> bool;

    /// Statuses reachable when only forward moves are allowed
    fn forward_targets(self) -> &'static [Self];
}

/// Status of an IT ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    /// Newly filed
    Open,
    /// Being worked on
    InProgress,
    /// Done
    Solved,
}

impl Status for TicketStatus {
    const INITIAL: Self = Self::Open;
    const ALL: &'static [Self] = &[Self::Open, Self::InProgress, Self::Solved];

    fn is_pending(self) -> bool {
        self != Self::Solved
    }

    fn forward_targets(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::InProgress, Self::Solved],
            Self::InProgress => &[Self::Solved],
            Self::Solved => &[],
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::InProgress => f.write_str("in-progress"),
            Self::Solved => f.write_str("solved"),
        }
    }
}

/// Approval status shared by leave requests and room bookings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    /// Awaiting a reviewer
    Waiting,
    /// Approved by a reviewer
    Approved,
    /// Rejected by a reviewer
    Rejected,
}

/// Status of a leave request
pub type LeaveStatus = ReviewStatus;

/// Status of a room booking
pub type BookingStatus = ReviewStatus;

impl Status for ReviewStatus {
    const INITIAL: Self = Self::Waiting;
    const ALL: &'static [Self] = &[Self::Waiting, Self::Approved, Self::Rejected];

    fn is_pending(self) -> bool {
        self == Self::Waiting
    }

    fn forward_targets(self) -> &'static [Self] {
        match self {
            Self::Waiting => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => f.write_str("waiting"),
            Self::Approved => f.write_str("approved"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// The three kinds of request a user can file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// IT ticket
    Ticket,
    /// Leave request
    LeaveRequest,
    /// Meeting room booking
    RoomBooking,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticket => f.write_str("ticket"),
            Self::LeaveRequest => f.write_str("leave request"),
            Self::RoomBooking => f.write_str("room booking"),
        }
    }
}

/// Behavior shared by tickets, leave requests and room bookings
pub trait Request {
    /// The kind's closed status enum
    type Status: Status;

    /// Which kind this is
    const KIND: RequestKind;

    /// Identifier as a string
    fn id_str(&self) -> &str;

    /// The owning user
    fn owner(&self) -> &UserId;

    /// Current status
    fn status(&self) -> Self::Status;

    /// Creation time
    fn created_at(&self) -> DateTime<Utc>;
}

/// Ticket priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

/// An IT support ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Identifier
    pub id: TicketId,
    /// Short summary
    pub title: String,
    /// Full description
    pub description: String,
    /// Current status
    pub status: TicketStatus,
    /// Priority
    pub priority: Priority,
    /// Department the ticket is filed against
    pub department: Department,
    /// Technician assigned to the ticket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    /// Owner
    pub created_by: UserId,
    /// When the ticket was filed
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

impl Request for Ticket {
    type Status = TicketStatus;
    const KIND: RequestKind = RequestKind::Ticket;

    fn id_str(&self) -> &str {
        self.id.as_str()
    }

    fn owner(&self) -> &UserId {
        &self.created_by
    }

    fn status(&self) -> TicketStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Kind of leave
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    /// Annual leave
    Annual,
    /// Sick leave
    Sick,
    /// Personal leave
    Personal,
    /// Bereavement leave
    Bereavement,
    /// Anything else
    Other,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Annual => "annual",
            Self::Sick => "sick",
            Self::Personal => "personal",
            Self::Bereavement => "bereavement",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A request for time off
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Identifier
    pub id: LeaveRequestId,
    /// Owner
    pub user_id: UserId,
    /// Kind of leave
    pub leave_type: LeaveType,
    /// First day off
    pub start_date: NaiveDate,
    /// Last day off
    pub end_date: NaiveDate,
    /// Free-text reason
    pub reason: String,
    /// Current status
    pub status: LeaveStatus,
    /// Reviewer of the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<UserId>,
    /// Time of the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When the request was filed
    pub created_at: DateTime<Utc>,
}

impl Request for LeaveRequest {
    type Status = LeaveStatus;
    const KIND: RequestKind = RequestKind::LeaveRequest;

    fn id_str(&self) -> &str {
        self.id.as_str()
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    fn status(&self) -> LeaveStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Equipment a meeting room may offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    /// Projector
    Projector,
    /// Whiteboard
    Whiteboard,
    /// Video conferencing
    Videoconference,
    /// Catering
    Catering,
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Projector => "projector",
            Self::Whiteboard => "whiteboard",
            Self::Videoconference => "videoconference",
            Self::Catering => "catering",
        };
        f.write_str(name)
    }
}

/// A bookable meeting room (static reference data)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRoom {
    /// Identifier
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Maximum number of participants
    pub capacity: u32,
    /// Equipment available in the room
    pub facilities: BTreeSet<Facility>,
    /// Where the room is
    pub location: String,
    /// Picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A reservation request for a meeting room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBooking {
    /// Identifier
    pub id: BookingId,
    /// Booked room
    pub room_id: RoomId,
    /// Owner
    pub user_id: UserId,
    /// Purpose of the meeting
    pub purpose: String,
    /// Day of the meeting
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub start_time: String,
    /// End time, `HH:MM`
    pub end_time: String,
    /// Number of participants
    pub participants: u32,
    /// Equipment the meeting needs
    pub required_facilities: BTreeSet<Facility>,
    /// Current status
    pub status: BookingStatus,
    /// Reviewer of the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<UserId>,
    /// Time of the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When the booking was requested
    pub created_at: DateTime<Utc>,
}

impl Request for RoomBooking {
    type Status = BookingStatus;
    const KIND: RequestKind = RequestKind::RoomBooking;

    fn id_str(&self) -> &str {
        self.id.as_str()
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    fn status(&self) -> BookingStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ============================================================================
// Notifications and comments
// ============================================================================

/// Severity of a notification or toast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Something succeeded
    Success,
    /// Needs attention
    Warning,
    /// Something failed
    Error,
}

/// A message addressed to one user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier
    pub id: NotificationId,
    /// Recipient
    pub user_id: UserId,
    /// Text
    pub message: String,
    /// Severity
    #[serde(rename = "type")]
    pub kind: Severity,
    /// Whether the recipient has seen it
    pub read: bool,
    /// When it was created
    pub created_at: DateTime<Utc>,
}

/// A comment on a ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier
    pub id: CommentId,
    /// Ticket the comment belongs to
    pub ticket_id: TicketId,
    /// Author
    pub user_id: UserId,
    /// Text
    pub content: String,
    /// When it was written
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Form input
// ============================================================================

/// Input of the "new ticket" form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketForm {
    /// Short summary, required, at most 100 characters
    pub title: String,
    /// Description, required, at least 10 characters
    pub description: String,
    /// Priority, required
    pub priority: Option<Priority>,
    /// Department, required
    pub department: Option<Department>,
}

/// Input of the "new leave request" form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveForm {
    /// Kind of leave, required
    pub leave_type: Option<LeaveType>,
    /// First day off, required
    pub start_date: Option<NaiveDate>,
    /// Last day off, required, not before `start_date`
    pub end_date: Option<NaiveDate>,
    /// Reason, required, at least 5 characters
    pub reason: String,
}

/// Input of the "new room booking" form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    /// Chosen room, required, must fit participants and facilities
    pub room_id: Option<RoomId>,
    /// Purpose, required, at most 100 characters
    pub purpose: String,
    /// Day of the meeting, required
    pub date: Option<NaiveDate>,
    /// Start time, `HH:MM`, required
    pub start_time: String,
    /// End time, `HH:MM`, required, after `start_time`
    pub end_time: String,
    /// Number of participants, at least 1
    pub participants: u32,
    /// Equipment the meeting needs
    pub required_facilities: BTreeSet<Facility>,
}
