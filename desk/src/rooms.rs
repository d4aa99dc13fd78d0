//! Meeting room matching by capacity and facilities.

use crate::types::{Facility, MeetingRoom};
use std::collections::BTreeSet;

/// Whether `room` fits `participants` people and offers every `required` facility
#[must_use]
pub fn room_fits(room: &MeetingRoom, participants: u32, required: &BTreeSet<Facility>) -> bool {
    participants > 0 && room.capacity >= participants && required.is_subset(&room.facilities)
}

/// Rooms that fit the meeting, in catalogue order
///
/// A participant count of zero matches nothing. Existing bookings are not
/// considered.
#[must_use]
pub fn available_rooms<'a>(
    rooms: &'a [MeetingRoom],
    participants: u32,
    required: &BTreeSet<Facility>,
) -> Vec<&'a MeetingRoom> {
    rooms
        .iter()
        .filter(|room| room_fits(room, participants, required))
        .collect()
}
