/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core domain types for the exam-assignment engine.
//!
//! ```text
//! repository ──(snapshot)──►  Exam / Room / Professor / Group  ──(scheduler)──►  commit
//!                              ↑ read-only inputs, except the three
//!                                mutable Exam fields filled on commit
//! ```
//!
//! # Ownership model
//! The scheduler owns a snapshot of every value for the duration of one run.
//! Only the repository ever mutates persisted exams; the in-memory `Exam` is
//! never written back by the scheduler itself.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Identifiers ───────────────────────────────────────────────────────────────

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Exam identity.  Also the tie-breaker of the processing order.
    ExamId
);
id_type!(RoomId);
id_type!(
    /// Professor identity.  Ascending order breaks ties in duty balancing.
    ProfessorId
);
id_type!(GroupId);
id_type!(StudentId);
id_type!(ModuleId);
id_type!(DepartmentId);

// ── Exam status ───────────────────────────────────────────────────────────────

/// Lifecycle of an exam as seen by the scheduler.
///
/// The only transition the engine ever performs is `Pending → Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    #[default]
    Pending,
    Scheduled,
}

// ── Room category ─────────────────────────────────────────────────────────────

/// Physical category of an exam room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Amphitheater,
    #[default]
    Classroom,
    Lab,
    SmallRoom,
}

// ── Exam ──────────────────────────────────────────────────────────────────────

/// A pending exam, pre-joined with its group size and department.
#[derive(Debug, Clone, PartialEq)]
pub struct Exam {
    pub id: ExamId,
    pub module_id: ModuleId,

    /// Teaching professor.  Never eligible to invigilate this exam.
    pub professor_id: ProfessorId,

    pub group_id: GroupId,

    /// Enrolled-student capacity of the group.  The assigned room must hold at
    /// least this many seats.
    pub group_size: u32,

    /// Department of the teaching professor, used for room affinity.
    pub department_id: Option<DepartmentId>,

    pub duration_minutes: u32,

    // ── Assignment (filled on commit) ─────────────────────────────────────────
    pub scheduled_slot: Option<NaiveDateTime>,
    pub assigned_room: Option<RoomId>,
    pub status: ExamStatus,
}

// ── Room ──────────────────────────────────────────────────────────────────────

/// An exam room.  Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub kind: RoomKind,
    /// Owning department.  `None` means a shared room with no affinity.
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

// ── Professor ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub department_id: DepartmentId,
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// A student cohort sharing one exam calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Enrolled-student capacity.  May differ from `students.len()` when the
    /// roster is partially assigned.
    pub capacity: u32,
    #[serde(default)]
    pub students: Vec<StudentId>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_as_bare_numbers() {
        assert_eq!(ExamId(42).to_string(), "42");
        assert_eq!(ProfessorId(7).to_string(), "7");
    }

    #[test]
    fn room_yaml_optional_fields_use_defaults() {
        let room: Room = serde_yaml::from_str("id: 4\ncapacity: 30\n").unwrap();
        assert_eq!(room.id, RoomId(4));
        assert_eq!(room.kind, RoomKind::Classroom);
        assert_eq!(room.department_id, None);
        assert!(room.available, "rooms are available unless flagged otherwise");
    }

    #[test]
    fn room_kind_uses_snake_case_names() {
        let kind: RoomKind = serde_yaml::from_str("small_room").unwrap();
        assert_eq!(kind, RoomKind::SmallRoom);
        let status: ExamStatus = serde_yaml::from_str("scheduled").unwrap();
        assert_eq!(status, ExamStatus::Scheduled);
    }
}
