/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the exam scheduler.
//!
//! Two types model the two failure layers:
//!
//! * [`RejectReason`]: why one candidate slot was refused for one exam.  This
//!   is a normal search outcome, not an error; it only feeds `debug!` events.
//! * [`SchedulerError`]: a repository failure, either while loading the
//!   snapshot (aborts the run) or while committing one exam (caught by the
//!   driver and counted, never propagated out of
//!   [`ExamScheduler::run()`](super::ExamScheduler::run)).

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{ExamId, ProfessorId};
use crate::repository::RepositoryError;

// ── Candidate rejection ───────────────────────────────────────────────────────

/// Reason a candidate slot was refused for an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A member of the exam's group already has an exam on this date.
    StudentConflict { date: NaiveDate },

    /// The teaching professor already reached the daily cap on this date.
    ProfessorOverloaded {
        professor: ProfessorId,
        date: NaiveDate,
        load: u32,
        cap: u32,
    },

    /// No room is both large enough and free for the whole exam window.
    NoRoomAvailable,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::StudentConflict { date } => {
                write!(f, "a student of the group already sits an exam on {date}")
            }
            RejectReason::ProfessorOverloaded {
                professor,
                date,
                load,
                cap,
            } => write!(
                f,
                "professor {professor} already teaches {load} exam(s) on {date} (cap {cap})"
            ),
            RejectReason::NoRoomAvailable => {
                write!(f, "no room with enough capacity is free for the exam window")
            }
        }
    }
}

// ── Top-level scheduler errors ────────────────────────────────────────────────

/// Error raised by the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The domain snapshot could not be loaded.  No exam has been touched.
    #[error("failed to load scheduling snapshot: {0}")]
    Load(#[source] RepositoryError),

    /// Persisting an accepted placement failed.  Tracking state was not
    /// updated for this exam.
    #[error("failed to commit exam {exam}: {source}")]
    Commit {
        exam: ExamId,
        #[source]
        source: RepositoryError,
    },
}
