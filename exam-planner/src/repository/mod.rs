/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Data-access boundary between the scheduler and the persistence layer.
//!
//! The scheduler never talks to a storage engine directly.  It reads one
//! snapshot per run through [`ExamRepository`] and issues two kinds of write:
//! an exam assignment and a surveillance duty.  Every call is synchronous;
//! failures propagate as [`RepositoryError`] and are never retried.

pub mod memory;

pub use memory::{Dataset, InMemoryRepository};

use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{Exam, ExamId, GroupId, Professor, ProfessorId, Room, RoomId, StudentId};

/// Failure of a single repository call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached or rejected the request.
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("exam {0} does not exist")]
    UnknownExam(ExamId),

    #[error("room {0} does not exist")]
    UnknownRoom(RoomId),

    /// Commit attempted on an exam that is no longer pending.
    #[error("exam {0} is not pending")]
    NotPending(ExamId),

    /// A pending exam references a group or professor that does not exist, so
    /// it cannot be joined.
    #[error("exam {exam} has an invalid reference: {detail}")]
    InvalidReference { exam: ExamId, detail: String },

    /// A pending exam has no usable duration.  A zero-length window would
    /// never overlap another booking of the same room.
    #[error("exam {0} has a zero duration")]
    ZeroDuration(ExamId),
}

/// The persistence collaborator used by one scheduling run.
pub trait ExamRepository {
    /// Rooms flagged available.  No ordering guarantee.
    fn load_available_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    fn load_professors(&self) -> Result<Vec<Professor>, RepositoryError>;

    /// Pending exams only, joined with group size and the teaching
    /// professor's department.
    fn load_pending_exams(&self) -> Result<Vec<Exam>, RepositoryError>;

    /// Group → member students, for students currently assigned to a group.
    fn load_group_rosters(&self) -> Result<HashMap<GroupId, Vec<StudentId>>, RepositoryError>;

    /// Professor → number of persisted surveillance duties.
    fn load_surveillance_counts(&self) -> Result<HashMap<ProfessorId, u32>, RepositoryError>;

    /// Set slot and room on `exam` and mark it scheduled.
    fn commit_exam_assignment(
        &mut self,
        exam: ExamId,
        slot: NaiveDateTime,
        room: RoomId,
    ) -> Result<(), RepositoryError>;

    /// Persist a duty record.  Returns `false` when the pair already existed
    /// and nothing was written.
    fn record_surveillance_duty(
        &mut self,
        professor: ProfessorId,
        exam: ExamId,
    ) -> Result<bool, RepositoryError>;
}
