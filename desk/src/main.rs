//! Deskflow demo run.
//!
//! Loads configuration from the environment (and `.env`), seeds the desk and
//! walks through a short scripted session: an employee files a ticket, a
//! leave request and a room booking, then an administrator reviews them.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=deskflow=debug cargo run
//! DESK_SEED_FILE=seed.json DESK_TRANSITION_POLICY=forward-only cargo run
//! ```

use chrono::Duration;
use deskflow::{
    BookingForm, Desk, DeskConfig, Department, Facility, LeaveForm, LeaveType, Priority,
    RequestKind, ReviewStatus, TicketForm, TicketStatus,
    filter::{Choice, TicketFilter},
    telemetry,
};
use deskflow_core::environment::{Clock, SystemClock};
use std::collections::BTreeSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = DeskConfig::try_from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    telemetry::register_metrics();

    tracing::info!(
        search_mode = ?config.search_mode,
        transition_policy = ?config.transition_policy,
        seed_file = ?config.seed_file,
        "Configuration loaded"
    );

    let mut desk = Desk::from_config(&config)?;
    let today = SystemClock.now().date_naive();

    // ========== Employee ==========

    let employee = desk.login("user@example.com", "password")?;
    println!("Signed in as {} ({})", employee.name, employee.role);

    let ticket = desk.create_ticket(TicketForm {
        title: "VPN drops every hour".to_string(),
        description: "The VPN client disconnects roughly once an hour.".to_string(),
        priority: Some(Priority::High),
        department: Some(Department::It),
    })?;
    println!("Filed {} \"{}\"", ticket.id, ticket.title);

    let leave = desk.create_leave_request(LeaveForm {
        leave_type: Some(LeaveType::Annual),
        start_date: Some(today + Duration::days(14)),
        end_date: Some(today + Duration::days(18)),
        reason: "Trip to the coast".to_string(),
    })?;
    println!("Filed {} ({} to {})", leave.id, leave.start_date, leave.end_date);

    let needs = BTreeSet::from([Facility::Videoconference]);
    let rooms = desk.available_rooms(8, &needs);
    println!(
        "Rooms for 8 with videoconference: {}",
        rooms
            .iter()
            .map(|room| room.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Some(room) = rooms.first() {
        let room_id = room.id.clone();
        let booking = desk.create_room_booking(BookingForm {
            room_id: Some(room_id),
            purpose: "Sprint planning".to_string(),
            date: Some(today + Duration::days(2)),
            start_time: "10:00".to_string(),
            end_time: "11:30".to_string(),
            participants: 8,
            required_facilities: needs,
        })?;
        println!("Filed {} in {}", booking.id, desk.entities().room_name(&booking.room_id));
    }

    // Missing fields are reported per field and nothing is stored.
    if let Err(error) = desk.create_ticket(TicketForm::default()) {
        println!("Empty ticket refused: {error}");
    }

    println!("Employee overview: {}", serde_json::to_string(&desk.overview()?)?);
    desk.logout();

    // ========== Administrator ==========

    let admin = desk.login("admin@example.com", "password")?;
    println!("Signed in as {} ({})", admin.name, admin.role);
    println!(
        "Pending leave requests: {}, pending bookings: {}",
        desk.count(RequestKind::LeaveRequest)?,
        desk.count(RequestKind::RoomBooking)?
    );

    let ticket = desk.change_ticket_status(&ticket.id, TicketStatus::InProgress)?;
    println!("{} is now {}", ticket.id, ticket.status);
    desk.add_comment(&ticket.id, "Looking into the VPN gateway logs.")?;

    let leave = desk.review_leave_request(&leave.id, ReviewStatus::Approved)?;
    if let Some(reviewer) = &leave.reviewed_by {
        println!(
            "{} is now {} (reviewed by {})",
            leave.id,
            leave.status,
            desk.entities().user_name(reviewer)
        );
    }

    let open = desk.tickets(&TicketFilter {
        status: Choice::Only(TicketStatus::Open),
        ..TicketFilter::default()
    })?;
    println!("Open tickets: {}", open.len());

    for activity in desk.recent_activity()? {
        println!(
            "  {} [{}] {} ({})",
            activity.created_at.format("%Y-%m-%d %H:%M"),
            activity.status,
            activity.title,
            activity.description
        );
    }

    desk.logout();
    Ok(())
}
