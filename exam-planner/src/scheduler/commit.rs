/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Assignment committer.
//!
//! The persistence write happens first.  Tracking state is only updated once
//! the repository accepted the assignment, so a failed write leaves the
//! in-memory state exactly as it was.

use tracing::debug;

use super::error::SchedulerError;
use super::snapshot::DomainSnapshot;
use super::surveillance::{assign_surveillance, SurveillanceOutcome};
use super::tracking::{Booking, TrackingState};
use crate::calendar::TimeSlot;
use crate::model::{Exam, Room};
use crate::repository::ExamRepository;

/// Persist `exam` at `slot` in `room`, update tracking, then balance duty.
///
/// # Errors
/// [`SchedulerError::Commit`] if the repository rejects the assignment.  In
/// that case `tracking` is untouched and no duty is assigned.
pub fn commit_assignment<R: ExamRepository + ?Sized>(
    repo: &mut R,
    exam: &Exam,
    slot: TimeSlot,
    room: &Room,
    snapshot: &DomainSnapshot,
    tracking: &mut TrackingState,
    surveillants_per_exam: usize,
) -> Result<SurveillanceOutcome, SchedulerError> {
    repo.commit_exam_assignment(exam.id, slot.start(), room.id)
        .map_err(|source| SchedulerError::Commit {
            exam: exam.id,
            source,
        })?;

    apply_to_tracking(exam, slot, room, snapshot, tracking);

    Ok(assign_surveillance(
        repo,
        exam,
        &snapshot.professors,
        tracking,
        surveillants_per_exam,
    ))
}

/// Record a committed placement in the three occupancy structures.
fn apply_to_tracking(
    exam: &Exam,
    slot: TimeSlot,
    room: &Room,
    snapshot: &DomainSnapshot,
    tracking: &mut TrackingState,
) {
    let date = slot.date();

    if let Some(students) = snapshot.rosters.get(&exam.group_id) {
        for &student in students {
            tracking.student_dates.entry(student).or_default().insert(date);
        }
    }

    *tracking
        .professor_load
        .entry(exam.professor_id)
        .or_default()
        .entry(date)
        .or_insert(0) += 1;

    tracking
        .room_bookings
        .entry(room.id)
        .or_default()
        .entry(slot.start())
        .or_default()
        .push(Booking {
            exam: exam.id,
            duration_minutes: exam.duration_minutes,
        });

    debug!(
        exam = %exam.id,
        room = %room.id,
        slot = %slot,
        professor_load = tracking.professor_load_on(exam.professor_id, date),
        "tracking updated"
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
