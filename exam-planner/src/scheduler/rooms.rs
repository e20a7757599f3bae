/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Room selection for a fixed exam and slot.
//!
//! Rooms are ranked by two keys, ascending:
//!
//! 1. `0` if the room belongs to the exam's department, else `1`.
//! 2. `|capacity − group_size|`, so the tightest fit comes first.
//!
//! The first ranked room with enough seats and no overlapping booking wins.
//! This is a greedy scan: a large room may go to a smaller exam purely
//! because of scan order.

use super::constraints::room_free;
use super::tracking::TrackingState;
use crate::calendar::TimeSlot;
use crate::model::{Exam, Room};

/// Ranking key for `room` against `exam`.
///
/// An exam without a department has no affinity with any room.
fn rank_key(exam: &Exam, room: &Room) -> (u8, u32) {
    let affinity = match (exam.department_id, room.department_id) {
        (Some(e), Some(r)) if e == r => 0,
        _ => 1,
    };
    (affinity, room.capacity.abs_diff(exam.group_size))
}

/// Rooms in preference order for `exam`.  Ties keep input order.
pub fn rank_rooms<'a>(exam: &Exam, rooms: &'a [Room]) -> Vec<&'a Room> {
    let mut ranked: Vec<&Room> = rooms.iter().collect();
    ranked.sort_by_key(|room| rank_key(exam, room));
    ranked
}

/// Pick the best free room for `exam` at `slot`, or `None` if no room fits.
pub fn select_room<'a>(
    exam: &Exam,
    slot: TimeSlot,
    rooms: &'a [Room],
    tracking: &TrackingState,
) -> Option<&'a Room> {
    rank_rooms(exam, rooms).into_iter().find(|room| {
        room.capacity >= exam.group_size
            && room_free(room.id, slot, exam.duration_minutes, tracking)
    })
}

/// `true` if at least one room could ever seat `exam`, whatever its bookings.
pub fn fits_any_room(exam: &Exam, rooms: &[Room]) -> bool {
    rooms.iter().any(|r| r.capacity >= exam.group_size)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DepartmentId, ExamId, ExamStatus, GroupId, ModuleId, ProfessorId, RoomId, RoomKind};
    use crate::scheduler::tracking::Booking;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn exam(size: u32, dept: Option<u32>) -> Exam {
        Exam {
            id: ExamId(1),
            module_id: ModuleId(1),
            professor_id: ProfessorId(1),
            group_id: GroupId(1),
            group_size: size,
            department_id: dept.map(DepartmentId),
            duration_minutes: 90,
            scheduled_slot: None,
            assigned_room: None,
            status: ExamStatus::Pending,
        }
    }

    fn room(id: u32, capacity: u32, dept: Option<u32>) -> Room {
        Room {
            id: RoomId(id),
            name: format!("R{id}"),
            capacity,
            kind: RoomKind::Classroom,
            department_id: dept.map(DepartmentId),
            available: true,
        }
    }

    fn occupy(t: &mut TrackingState, room: u32, h: u32) {
        t.room_bookings
            .entry(RoomId(room))
            .or_default()
            .entry(at(h))
            .or_default()
            .push(Booking {
                exam: ExamId(50),
                duration_minutes: 90,
            });
    }

    #[test]
    fn picks_room_that_fits_over_tighter_one_that_does_not() {
        // group of 25, rooms of 20 and 30: 20 is closer but too small
        let rooms = vec![room(1, 20, None), room(2, 30, None)];
        let t = TrackingState::new();
        let picked = select_room(&exam(25, None), TimeSlot::new(at(8)), &rooms, &t).unwrap();
        assert_eq!(picked.id, RoomId(2));
    }

    #[test]
    fn tightest_fit_wins_without_affinity() {
        let rooms = vec![room(1, 200, None), room(2, 40, None), room(3, 30, None)];
        let t = TrackingState::new();
        let picked = select_room(&exam(25, None), TimeSlot::new(at(8)), &rooms, &t).unwrap();
        assert_eq!(picked.id, RoomId(3));
    }

    #[test]
    fn department_room_preferred_over_tighter_fit() {
        let rooms = vec![room(1, 30, None), room(2, 100, Some(7))];
        let t = TrackingState::new();
        let picked = select_room(&exam(25, Some(7)), TimeSlot::new(at(8)), &rooms, &t).unwrap();
        assert_eq!(picked.id, RoomId(2));
    }

    #[test]
    fn exam_without_department_has_no_affinity() {
        let rooms = vec![room(1, 100, None), room(2, 30, None)];
        let ranked = rank_rooms(&exam(25, None), &rooms);
        assert_eq!(ranked[0].id, RoomId(2));
    }

    #[test]
    fn ties_keep_input_order() {
        let rooms = vec![room(5, 30, None), room(3, 20, None)];
        // both are 5 seats away from 25
        let ranked = rank_rooms(&exam(25, None), &rooms);
        assert_eq!(ranked[0].id, RoomId(5));
        assert_eq!(ranked[1].id, RoomId(3));
    }

    #[test]
    fn busy_room_is_skipped() {
        let rooms = vec![room(1, 30, None), room(2, 60, None)];
        let mut t = TrackingState::new();
        occupy(&mut t, 1, 8);
        let picked = select_room(&exam(25, None), TimeSlot::new(at(8)), &rooms, &t).unwrap();
        assert_eq!(picked.id, RoomId(2));
    }

    #[test]
    fn none_when_every_room_is_too_small_or_busy() {
        let rooms = vec![room(1, 20, None), room(2, 30, None)];
        let mut t = TrackingState::new();
        occupy(&mut t, 2, 8);
        assert!(select_room(&exam(25, None), TimeSlot::new(at(8)), &rooms, &t).is_none());
        assert!(
            select_room(&exam(25, None), TimeSlot::new(at(10)), &rooms, &t).is_some(),
            "the 30-seat room is free again at 10:00"
        );
    }

    #[test]
    fn fits_any_room_checks_capacity_only() {
        let rooms = vec![room(1, 20, None), room(2, 30, None)];
        assert!(fits_any_room(&exam(30, None), &rooms));
        assert!(!fits_any_room(&exam(31, None), &rooms));
        assert!(!fits_any_room(&exam(1, None), &[]));
    }
}
