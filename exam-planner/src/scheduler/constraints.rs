/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Placement predicates.
//!
//! Each check answers "is this placement allowed?" against the live
//! [`TrackingState`] and has no side effects:
//!
//! | Check | Guards |
//! |---|---|
//! | [`student_conflict_free`] | no student sits two exams on one date |
//! | [`professor_within_cap`] | a professor teaches at most `cap` exams per date |
//! | [`room_free`] | a room never hosts overlapping exam windows |
//!
//! Capacity (room seats ≥ group size) is enforced by the room selector before
//! [`room_free`] is consulted.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::error::RejectReason;
use super::tracking::TrackingState;
use crate::calendar::{windows_overlap, TimeSlot};
use crate::model::{Exam, GroupId, RoomId, StudentId};

/// `true` iff no member of the exam's group already has an exam on `date`.
///
/// Cost is linear in group size.  A group without a roster has no students
/// and therefore never conflicts.
pub fn student_conflict_free(
    exam: &Exam,
    date: NaiveDate,
    rosters: &HashMap<GroupId, Vec<StudentId>>,
    tracking: &TrackingState,
) -> bool {
    rosters
        .get(&exam.group_id)
        .map_or(true, |students| {
            students
                .iter()
                .all(|&s| !tracking.student_has_exam_on(s, date))
        })
}

/// `true` iff the teaching professor's load on `date` is strictly below `cap`.
pub fn professor_within_cap(
    exam: &Exam,
    date: NaiveDate,
    cap: u32,
    tracking: &TrackingState,
) -> bool {
    tracking.professor_load_on(exam.professor_id, date) < cap
}

/// `true` iff no booking of `room` intersects `[slot, slot + duration)`.
///
/// Every booking is compared using its own duration, so exams of different
/// lengths are handled correctly.
pub fn room_free(room: RoomId, slot: TimeSlot, duration_minutes: u32, tracking: &TrackingState) -> bool {
    !tracking.bookings_in(room).any(|(start, booking)| {
        windows_overlap(start, booking.duration_minutes, slot.start(), duration_minutes)
    })
}

/// Run the student and professor checks in order and report the first one
/// that fails.
pub fn check_placement(
    exam: &Exam,
    slot: TimeSlot,
    cap: u32,
    rosters: &HashMap<GroupId, Vec<StudentId>>,
    tracking: &TrackingState,
) -> Result<(), RejectReason> {
    let date = slot.date();

    if !student_conflict_free(exam, date, rosters, tracking) {
        return Err(RejectReason::StudentConflict { date });
    }

    if !professor_within_cap(exam, date, cap, tracking) {
        return Err(RejectReason::ProfessorOverloaded {
            professor: exam.professor_id,
            date,
            load: tracking.professor_load_on(exam.professor_id, date),
            cap,
        });
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExamId, ExamStatus, ModuleId, ProfessorId};
    use crate::scheduler::tracking::Booking;
    use chrono::NaiveDateTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn exam(group: u32, professor: u32) -> Exam {
        Exam {
            id: ExamId(1),
            module_id: ModuleId(1),
            professor_id: ProfessorId(professor),
            group_id: GroupId(group),
            group_size: 3,
            department_id: None,
            duration_minutes: 90,
            scheduled_slot: None,
            assigned_room: None,
            status: ExamStatus::Pending,
        }
    }

    fn rosters() -> HashMap<GroupId, Vec<StudentId>> {
        HashMap::from([
            (GroupId(1), vec![StudentId(1), StudentId(2), StudentId(3)]),
            (GroupId(2), vec![StudentId(3), StudentId(4)]),
        ])
    }

    fn book(t: &mut TrackingState, room: u32, start: NaiveDateTime, minutes: u32) {
        t.room_bookings
            .entry(RoomId(room))
            .or_default()
            .entry(start)
            .or_default()
            .push(Booking {
                exam: ExamId(100),
                duration_minutes: minutes,
            });
    }

    // ── student_conflict_free ─────────────────────────────────────────────────

    #[test]
    fn student_free_when_nothing_tracked() {
        let t = TrackingState::new();
        assert!(student_conflict_free(&exam(1, 1), day(1), &rosters(), &t));
    }

    #[test]
    fn shared_student_blocks_the_date() {
        let mut t = TrackingState::new();
        // student 3 belongs to both groups
        t.student_dates.entry(StudentId(3)).or_default().insert(day(1));
        assert!(!student_conflict_free(&exam(1, 1), day(1), &rosters(), &t));
        assert!(
            student_conflict_free(&exam(1, 1), day(2), &rosters(), &t),
            "other dates stay free"
        );
    }

    #[test]
    fn group_without_roster_never_conflicts() {
        let mut t = TrackingState::new();
        t.student_dates.entry(StudentId(1)).or_default().insert(day(1));
        assert!(student_conflict_free(&exam(9, 1), day(1), &rosters(), &t));
    }

    // ── professor_within_cap ──────────────────────────────────────────────────

    #[test]
    fn professor_cap_is_strict() {
        let mut t = TrackingState::new();
        t.professor_load.entry(ProfessorId(5)).or_default().insert(day(1), 2);
        assert!(professor_within_cap(&exam(1, 5), day(1), 3, &t));

        t.professor_load.entry(ProfessorId(5)).or_default().insert(day(1), 3);
        assert!(!professor_within_cap(&exam(1, 5), day(1), 3, &t));
        assert!(professor_within_cap(&exam(1, 5), day(2), 3, &t));
    }

    #[test]
    fn configured_cap_is_authoritative() {
        let mut t = TrackingState::new();
        t.professor_load.entry(ProfessorId(5)).or_default().insert(day(1), 1);
        assert!(!professor_within_cap(&exam(1, 5), day(1), 1, &t));
        assert!(professor_within_cap(&exam(1, 5), day(1), 5, &t));
    }

    // ── room_free ─────────────────────────────────────────────────────────────

    #[test]
    fn overlapping_booking_blocks_room() {
        let mut t = TrackingState::new();
        book(&mut t, 1, at(1, 8, 0), 90);
        assert!(!room_free(RoomId(1), TimeSlot::new(at(1, 9, 0)), 90, &t));
        assert!(!room_free(RoomId(1), TimeSlot::new(at(1, 7, 0)), 90, &t));
    }

    #[test]
    fn adjacent_booking_leaves_room_free() {
        let mut t = TrackingState::new();
        book(&mut t, 1, at(1, 8, 0), 90);
        assert!(room_free(RoomId(1), TimeSlot::new(at(1, 9, 30)), 90, &t));
        assert!(room_free(RoomId(1), TimeSlot::new(at(1, 6, 30)), 90, &t));
    }

    #[test]
    fn booking_duration_is_per_booking() {
        let mut t = TrackingState::new();
        // a 3h exam at 8:00 still occupies the room at 10:00
        book(&mut t, 1, at(1, 8, 0), 180);
        assert!(!room_free(RoomId(1), TimeSlot::new(at(1, 10, 0)), 90, &t));
    }

    #[test]
    fn other_rooms_are_unaffected() {
        let mut t = TrackingState::new();
        book(&mut t, 1, at(1, 8, 0), 90);
        assert!(room_free(RoomId(2), TimeSlot::new(at(1, 8, 0)), 90, &t));
    }

    // ── check_placement ───────────────────────────────────────────────────────

    #[test]
    fn student_check_runs_before_professor_check() {
        let mut t = TrackingState::new();
        t.student_dates.entry(StudentId(1)).or_default().insert(day(1));
        t.professor_load.entry(ProfessorId(1)).or_default().insert(day(1), 3);

        let err = check_placement(&exam(1, 1), TimeSlot::new(at(1, 8, 0)), 3, &rosters(), &t)
            .unwrap_err();
        assert_eq!(err, RejectReason::StudentConflict { date: day(1) });
    }

    #[test]
    fn overload_reports_load_and_cap() {
        let mut t = TrackingState::new();
        t.professor_load.entry(ProfessorId(1)).or_default().insert(day(1), 3);

        let err = check_placement(&exam(1, 1), TimeSlot::new(at(1, 8, 0)), 3, &rosters(), &t)
            .unwrap_err();
        assert_eq!(
            err,
            RejectReason::ProfessorOverloaded {
                professor: ProfessorId(1),
                date: day(1),
                load: 3,
                cap: 3,
            }
        );
    }

    #[test]
    fn clean_state_accepts_placement() {
        let t = TrackingState::new();
        assert!(check_placement(&exam(1, 1), TimeSlot::new(at(1, 8, 0)), 3, &rosters(), &t).is_ok());
    }
}
