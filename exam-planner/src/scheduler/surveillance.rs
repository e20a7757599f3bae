/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Invigilation balancing.
//!
//! Each newly scheduled exam receives `count` invigilators: the professors
//! with the fewest duties so far, excluding the exam's teaching professor.  Ties go to
//! the lowest professor id.  Counts live in the [`TrackingState`], seeded from
//! the persisted duties at run start, and are incremented only when a write
//! actually inserts a new duty record.

use tracing::{debug, warn};

use super::tracking::TrackingState;
use crate::model::{Exam, Professor, ProfessorId};
use crate::repository::ExamRepository;

/// Result of balancing duty for one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveillanceOutcome {
    /// Professors whose duty record was written.
    pub assigned: Vec<ProfessorId>,
    /// Duty writes that failed.
    pub failures: u32,
}

/// Choose up to `count` invigilators for `exam` without touching any state.
///
/// The teaching professor is never a candidate.  Returns fewer than `count`
/// professors when the pool is too small.
pub fn pick_invigilators(
    exam: &Exam,
    professors: &[Professor],
    tracking: &TrackingState,
    count: usize,
) -> Vec<ProfessorId> {
    let mut eligible: Vec<ProfessorId> = professors
        .iter()
        .map(|p| p.id)
        .filter(|&id| id != exam.professor_id)
        .collect();
    eligible.sort_by_key(|&id| (tracking.surveillance_count(id), id));
    eligible.truncate(count);
    eligible
}

/// Pick invigilators for `exam` and persist their duty records.
///
/// A failed write is logged and counted; it does not undo the exam's own
/// commit and does not stop the remaining picks.
pub fn assign_surveillance<R: ExamRepository + ?Sized>(
    repo: &mut R,
    exam: &Exam,
    professors: &[Professor],
    tracking: &mut TrackingState,
    count: usize,
) -> SurveillanceOutcome {
    let picked = pick_invigilators(exam, professors, tracking, count);
    if picked.is_empty() {
        warn!(exam = %exam.id, "no eligible professor to invigilate");
        return SurveillanceOutcome::default();
    }

    let mut outcome = SurveillanceOutcome::default();
    for professor in picked {
        match repo.record_surveillance_duty(professor, exam.id) {
            Ok(true) => {
                let n = tracking.surveillance_counts.entry(professor).or_insert(0);
                *n += 1;
                debug!(exam = %exam.id, professor = %professor, duties = *n, "invigilator assigned");
                outcome.assigned.push(professor);
            }
            // Already persisted, so the seeded count includes it
            Ok(false) => {
                debug!(exam = %exam.id, professor = %professor, "duty already recorded");
                outcome.assigned.push(professor);
            }
            Err(e) => {
                warn!(exam = %exam.id, professor = %professor, error = %e, "surveillance write failed");
                outcome.failures += 1;
            }
        }
    }
    outcome
}

// ── Tests ─────────────────────────────────────────────────────────────────────
