//! Seed data for the entity store.
//!
//! [`Seed::demo`] builds the built-in demo data set with timestamps relative
//! to a given instant. [`Seed::from_json_file`] loads the same shape from disk.

use crate::error::SeedError;
use crate::types::{
    BookingId, Comment, Department, Facility, LeaveRequest, LeaveRequestId, LeaveType,
    MeetingRoom, Notification, NotificationId, Priority, Request, ReviewStatus, RoomBooking,
    RoomId, Role, Severity, Ticket, TicketId, TicketStatus, User, UserId,
};
use chrono::{DateTime, Duration, Utc};
use deskflow_core::environment::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Everything the store starts with
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    /// User accounts
    pub users: Vec<User>,
    /// IT tickets
    pub tickets: Vec<Ticket>,
    /// Leave requests
    pub leave_requests: Vec<LeaveRequest>,
    /// Room bookings
    pub room_bookings: Vec<RoomBooking>,
    /// Meeting rooms
    pub meeting_rooms: Vec<MeetingRoom>,
    /// Notifications
    pub notifications: Vec<Notification>,
    /// Ticket comments
    pub comments: Vec<Comment>,
}

impl Seed {
    /// Reads a JSON seed file and checks request ownership
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read,
    /// [`SeedError::Json`] if it does not parse, and
    /// [`SeedError::UnknownOwner`] if a request names a missing user.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: shown.clone(),
            source,
        })?;
        let seed: Self = serde_json::from_str(&raw).map_err(|source| SeedError::Json {
            path: shown.clone(),
            source,
        })?;
        seed.check_owners()?;

        tracing::info!(path = %shown, "Loaded seed file");
        Ok(seed)
    }

    /// Every ticket, leave request and booking must belong to a seeded user
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::UnknownOwner`] for the first orphaned request.
    pub fn check_owners(&self) -> Result<(), SeedError> {
        fn check<R: Request>(users: &[User], requests: &[R]) -> Result<(), SeedError> {
            for request in requests {
                if !users.iter().any(|user| &user.id == request.owner()) {
                    return Err(SeedError::UnknownOwner {
                        kind: R::KIND,
                        id: request.id_str().to_string(),
                        user_id: request.owner().to_string(),
                    });
                }
            }
            Ok(())
        }

        check(&self.users, &self.tickets)?;
        check(&self.users, &self.leave_requests)?;
        check(&self.users, &self.room_bookings)
    }

    /// The built-in demo data set
    ///
    /// Three users (`"1"` John Doe, `"2"` Jane Smith the admin, `"3"` Mike
    /// Johnson), four tickets, three leave requests, four rooms, three
    /// bookings and four notifications. The first leave request and the first
    /// booking are waiting for review.
    #[must_use]
    #[allow(clippy::too_many_lines)] // Flat data listing
    pub fn demo(now: DateTime<Utc>, ids: &dyn IdGenerator) -> Self {
        let days_ago = |n: i64| now - Duration::days(n);
        let days_ahead = |n: i64| now + Duration::days(n);
        let facilities = |list: &[Facility]| list.iter().copied().collect::<BTreeSet<_>>();

        let users = vec![
            User {
                id: UserId::new("1"),
                name: "John Doe".to_string(),
                email: "user@example.com".to_string(),
                role: Role::User,
                department: Department::Marketing,
                avatar: Some(
                    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg".to_string(),
                ),
            },
            User {
                id: UserId::new("2"),
                name: "Jane Smith".to_string(),
                email: "admin@example.com".to_string(),
                role: Role::Admin,
                department: Department::It,
                avatar: Some(
                    "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg".to_string(),
                ),
            },
            User {
                id: UserId::new("3"),
                name: "Mike Johnson".to_string(),
                email: "mike@example.com".to_string(),
                role: Role::User,
                department: Department::Sales,
                avatar: Some(
                    "https://images.pexels.com/photos/1222271/pexels-photo-1222271.jpeg"
                        .to_string(),
                ),
            },
        ];

        let ticket = |title: &str,
                      description: &str,
                      status: TicketStatus,
                      priority: Priority,
                      assigned_to: Option<&str>,
                      created_by: &str,
                      created: i64,
                      updated: i64| Ticket {
            id: TicketId::generate(ids),
            title: title.to_string(),
            description: description.to_string(),
            status,
            priority,
            department: Department::It,
            assigned_to: assigned_to.map(UserId::new),
            created_by: UserId::new(created_by),
            created_at: days_ago(created),
            updated_at: days_ago(updated),
        };

        let tickets = vec![
            ticket(
                "Cannot access email",
                "I have not been able to log in to my company email account since yesterday.",
                TicketStatus::Open,
                Priority::High,
                None,
                "1",
                2,
                2,
            ),
            ticket(
                "Printer not working",
                "The printer on the third floor shows an error message.",
                TicketStatus::InProgress,
                Priority::Medium,
                Some("2"),
                "3",
                5,
                1,
            ),
            ticket(
                "Software installation needed",
                "Please install Adobe Photoshop on my computer.",
                TicketStatus::Solved,
                Priority::Low,
                Some("2"),
                "1",
                10,
                8,
            ),
            ticket(
                "Laptop running slowly",
                "My laptop is very slow and freezes often.",
                TicketStatus::Open,
                Priority::High,
                None,
                "3",
                1,
                1,
            ),
        ];

        let leave_requests = vec![
            LeaveRequest {
                id: LeaveRequestId::generate(ids),
                user_id: UserId::new("1"),
                leave_type: LeaveType::Annual,
                start_date: days_ahead(5).date_naive(),
                end_date: days_ahead(10).date_naive(),
                reason: "Family holiday".to_string(),
                status: ReviewStatus::Waiting,
                reviewed_by: None,
                reviewed_at: None,
                created_at: now,
            },
            LeaveRequest {
                id: LeaveRequestId::generate(ids),
                user_id: UserId::new("3"),
                leave_type: LeaveType::Sick,
                start_date: days_ago(5).date_naive(),
                end_date: days_ago(3).date_naive(),
                reason: "Flu".to_string(),
                status: ReviewStatus::Approved,
                reviewed_by: Some(UserId::new("2")),
                reviewed_at: Some(days_ago(7)),
                created_at: days_ago(8),
            },
            LeaveRequest {
                id: LeaveRequestId::generate(ids),
                user_id: UserId::new("1"),
                leave_type: LeaveType::Personal,
                start_date: days_ago(15).date_naive(),
                end_date: days_ago(14).date_naive(),
                reason: "Personal matters".to_string(),
                status: ReviewStatus::Rejected,
                reviewed_by: Some(UserId::new("2")),
                reviewed_at: Some(days_ago(18)),
                created_at: days_ago(20),
            },
        ];

        let meeting_rooms = vec![
            MeetingRoom {
                id: RoomId::new("1"),
                name: "Main Meeting Room".to_string(),
                capacity: 20,
                facilities: facilities(&[
                    Facility::Projector,
                    Facility::Videoconference,
                    Facility::Whiteboard,
                ]),
                location: "Floor 5".to_string(),
                image: None,
            },
            MeetingRoom {
                id: RoomId::new("2"),
                name: "Collaboration Room".to_string(),
                capacity: 10,
                facilities: facilities(&[Facility::Whiteboard, Facility::Videoconference]),
                location: "Floor 3".to_string(),
                image: None,
            },
            MeetingRoom {
                id: RoomId::new("3"),
                name: "Conference Room A".to_string(),
                capacity: 15,
                facilities: facilities(&[
                    Facility::Projector,
                    Facility::Whiteboard,
                    Facility::Catering,
                ]),
                location: "Floor 4".to_string(),
                image: None,
            },
            MeetingRoom {
                id: RoomId::new("4"),
                name: "Small Meeting Room".to_string(),
                capacity: 6,
                facilities: facilities(&[Facility::Videoconference]),
                location: "Floor 2".to_string(),
                image: None,
            },
        ];

        let room_bookings = vec![
            RoomBooking {
                id: BookingId::generate(ids),
                room_id: RoomId::new("1"),
                user_id: UserId::new("1"),
                purpose: "Quarterly review meeting".to_string(),
                date: days_ahead(2).date_naive(),
                start_time: "10:00".to_string(),
                end_time: "12:00".to_string(),
                participants: 15,
                required_facilities: facilities(&[Facility::Projector, Facility::Videoconference]),
                status: ReviewStatus::Waiting,
                reviewed_by: None,
                reviewed_at: None,
                created_at: now,
            },
            RoomBooking {
                id: BookingId::generate(ids),
                room_id: RoomId::new("2"),
                user_id: UserId::new("3"),
                purpose: "Team discussion".to_string(),
                date: days_ahead(1).date_naive(),
                start_time: "14:00".to_string(),
                end_time: "16:00".to_string(),
                participants: 8,
                required_facilities: facilities(&[Facility::Whiteboard]),
                status: ReviewStatus::Approved,
                reviewed_by: Some(UserId::new("2")),
                reviewed_at: Some(days_ago(1)),
                created_at: days_ago(3),
            },
            RoomBooking {
                id: BookingId::generate(ids),
                room_id: RoomId::new("4"),
                user_id: UserId::new("3"),
                purpose: "Client call".to_string(),
                date: days_ago(1).date_naive(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                participants: 4,
                required_facilities: facilities(&[Facility::Videoconference]),
                status: ReviewStatus::Rejected,
                reviewed_by: Some(UserId::new("2")),
                reviewed_at: Some(days_ago(3)),
                created_at: days_ago(5),
            },
        ];

        let notification = |message: &str, kind: Severity, read: bool, created: i64| Notification {
            id: NotificationId::generate(ids),
            user_id: UserId::new("1"),
            message: message.to_string(),
            kind,
            read,
            created_at: days_ago(created),
        };

        let notifications = vec![
            notification(
                "Your IT ticket T-123456 has been assigned to a technician",
                Severity::Info,
                false,
                1,
            ),
            notification("Your leave request has been approved", Severity::Success, false, 2),
            notification("Your meeting room booking was rejected", Severity::Error, true, 3),
            notification(
                "IT system maintenance is scheduled for tomorrow",
                Severity::Warning,
                false,
                0,
            ),
        ];

        Self {
            users,
            tickets,
            leave_requests,
            room_bookings,
            meeting_rooms,
            notifications,
            comments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use deskflow_core::environment::Clock;
    use deskflow_testing::{SequentialIdGenerator, test_clock};

    fn demo() -> Seed {
        Seed::demo(test_clock().now(), &SequentialIdGenerator::new())
    }

    #[test]
    fn demo_ids_use_kind_prefixes() {
        let seed = demo();
        assert_eq!(seed.tickets[0].id.as_str(), "T-00000001");
        assert_eq!(seed.leave_requests[0].id.as_str(), "L-00000005");
        assert_eq!(seed.room_bookings[0].id.as_str(), "B-00000008");
    }

    #[test]
    fn demo_owners_exist() {
        assert!(demo().check_owners().is_ok());
    }

    #[test]
    fn demo_dates_are_relative_to_now() {
        let now = test_clock().now();
        let seed = demo();
        assert_eq!(seed.leave_requests[0].created_at, now);
        assert_eq!(
            seed.leave_requests[0].start_date,
            (now + Duration::days(5)).date_naive()
        );
        assert_eq!(seed.tickets[1].updated_at, now - Duration::days(1));
    }

    #[test]
    fn orphaned_request_is_rejected() {
        let mut seed = demo();
        seed.tickets[0].created_by = UserId::new("42");
        let err = seed.check_owners().unwrap_err();
        assert!(matches!(err, SeedError::UnknownOwner { ref user_id, .. } if user_id == "42"));
    }

    #[test]
    fn json_file_loads_and_missing_collections_default() {
        let dir = std::env::temp_dir().join(format!("deskflow-seed-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");

        let mut seed = demo();
        seed.notifications.clear();
        let mut value = serde_json::to_value(&seed).unwrap();
        value.as_object_mut().unwrap().remove("notifications");
        std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

        let loaded = Seed::from_json_file(&path).expect("seed should load");
        assert_eq!(loaded, seed);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Seed::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
