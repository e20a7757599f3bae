/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-run tracking state.
//!
//! One [`TrackingState`] is created at the start of
//! [`ExamScheduler::run()`](super::ExamScheduler::run), passed by reference
//! into every checker and committer call, and dropped at the end of the run.
//! Only the committer and the surveillance balancer mutate it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{ExamId, ProfessorId, RoomId, StudentId};

/// One exam occupying a room from its slot start for `duration_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub exam: ExamId,
    pub duration_minutes: u32,
}

/// student → dates with an exam.
pub type StudentDates = HashMap<StudentId, BTreeSet<NaiveDate>>;

/// professor → (date → exams taught that day).
pub type ProfessorLoad = HashMap<ProfessorId, BTreeMap<NaiveDate, u32>>;

/// room → (slot start → bookings starting then).
///
/// The inner map is a `BTreeMap` so overlap scans walk bookings in time order.
pub type RoomBookings = HashMap<RoomId, BTreeMap<NaiveDateTime, Vec<Booking>>>;

#[derive(Debug, Default)]
pub struct TrackingState {
    pub student_dates: StudentDates,
    pub professor_load: ProfessorLoad,
    pub room_bookings: RoomBookings,
    /// Cumulative duties per professor, seeded from the persisted counts.
    pub surveillance_counts: HashMap<ProfessorId, u32>,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state whose surveillance counts start at the persisted values.
    pub fn with_surveillance_counts(counts: HashMap<ProfessorId, u32>) -> Self {
        Self {
            surveillance_counts: counts,
            ..Self::default()
        }
    }

    pub fn student_has_exam_on(&self, student: StudentId, date: NaiveDate) -> bool {
        self.student_dates
            .get(&student)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Exams `professor` teaches on `date`.  `0` if not tracked yet.
    pub fn professor_load_on(&self, professor: ProfessorId, date: NaiveDate) -> u32 {
        self.professor_load
            .get(&professor)
            .and_then(|days| days.get(&date))
            .copied()
            .unwrap_or(0)
    }

    /// All bookings of `room` as `(start, booking)` pairs in time order.
    pub fn bookings_in(&self, room: RoomId) -> impl Iterator<Item = (NaiveDateTime, Booking)> + '_ {
        self.room_bookings
            .get(&room)
            .into_iter()
            .flat_map(|slots| {
                slots
                    .iter()
                    .flat_map(|(start, list)| list.iter().map(move |b| (*start, *b)))
            })
    }

    pub fn surveillance_count(&self, professor: ProfessorId) -> u32 {
        self.surveillance_counts.get(&professor).copied().unwrap_or(0)
    }

    /// Total committed bookings across all rooms.
    pub fn booking_count(&self) -> usize {
        self.room_bookings
            .values()
            .flat_map(|slots| slots.values())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    #[test]
    fn empty_state_reports_nothing() {
        let t = TrackingState::new();
        assert!(!t.student_has_exam_on(StudentId(1), day(1)));
        assert_eq!(t.professor_load_on(ProfessorId(1), day(1)), 0);
        assert_eq!(t.bookings_in(RoomId(1)).count(), 0);
        assert_eq!(t.surveillance_count(ProfessorId(1)), 0);
        assert_eq!(t.booking_count(), 0);
    }

    #[test]
    fn bookings_are_listed_in_time_order() {
        let mut t = TrackingState::new();
        let late = day(2).and_hms_opt(15, 0, 0).unwrap();
        let early = day(2).and_hms_opt(8, 0, 0).unwrap();
        let slots = t.room_bookings.entry(RoomId(1)).or_default();
        slots.entry(late).or_default().push(Booking {
            exam: ExamId(1),
            duration_minutes: 90,
        });
        slots.entry(early).or_default().push(Booking {
            exam: ExamId(2),
            duration_minutes: 60,
        });

        let got: Vec<_> = t.bookings_in(RoomId(1)).map(|(s, b)| (s, b.exam)).collect();
        assert_eq!(got, vec![(early, ExamId(2)), (late, ExamId(1))]);
        assert_eq!(t.booking_count(), 2);
    }

    #[test]
    fn seeded_surveillance_counts_are_visible() {
        let t = TrackingState::with_surveillance_counts(HashMap::from([(ProfessorId(3), 4)]));
        assert_eq!(t.surveillance_count(ProfessorId(3)), 4);
        assert_eq!(t.surveillance_count(ProfessorId(4)), 0);
    }
}
