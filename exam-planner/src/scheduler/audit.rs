/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Post-hoc conflict audit over a persisted dataset.  Test oracle only.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;

use crate::calendar::windows_overlap;
use crate::model::{ExamId, ExamStatus, GroupId, ProfessorId, RoomId, StudentId};
use crate::repository::Dataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    StudentDoubleBooked { student: StudentId, a: ExamId, b: ExamId },
    ProfessorOverCap { professor: ProfessorId, date: chrono::NaiveDate, count: u32 },
    RoomOverlap { room: RoomId, a: ExamId, b: ExamId },
    RoomTooSmall { exam: ExamId, room: RoomId },
    SelfInvigilation { exam: ExamId, professor: ProfessorId },
    IncompleteAssignment { exam: ExamId },
}

struct Placed {
    id: ExamId,
    professor: ProfessorId,
    group: GroupId,
    start: NaiveDateTime,
    minutes: u32,
    room: RoomId,
}

/// Every scheduling conflict in `dataset`.  Empty means conflict-free.
pub fn audit(dataset: &Dataset, professor_cap: u32, default_minutes: u32) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut placed = Vec::new();
    for e in dataset.exams.iter().filter(|e| e.status == ExamStatus::Scheduled) {
        match (e.scheduled_at, e.room_id) {
            (Some(start), Some(room)) => placed.push(Placed {
                id: e.id,
                professor: e.professor_id,
                group: e.group_id,
                start,
                minutes: e.duration_minutes.unwrap_or(default_minutes),
                room,
            }),
            _ => violations.push(Violation::IncompleteAssignment { exam: e.id }),
        }
    }

    // students, via group membership
    let mut student_days: HashMap<(StudentId, chrono::NaiveDate), ExamId> = HashMap::new();
    for p in &placed {
        let Some(group) = dataset.groups.iter().find(|g| g.id == p.group) else {
            continue;
        };
        for &s in &group.students {
            if let Some(&other) = student_days.get(&(s, p.start.date())) {
                violations.push(Violation::StudentDoubleBooked {
                    student: s,
                    a: other,
                    b: p.id,
                });
            } else {
                student_days.insert((s, p.start.date()), p.id);
            }
        }
    }

    // professor daily cap
    let mut loads: BTreeMap<(ProfessorId, chrono::NaiveDate), u32> = BTreeMap::new();
    for p in &placed {
        *loads.entry((p.professor, p.start.date())).or_insert(0) += 1;
    }
    for ((professor, date), count) in loads {
        if count > professor_cap {
            violations.push(Violation::ProfessorOverCap {
                professor,
                date,
                count,
            });
        }
    }

    // room windows
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if a.room == b.room && windows_overlap(a.start, a.minutes, b.start, b.minutes) {
                violations.push(Violation::RoomOverlap {
                    room: a.room,
                    a: a.id,
                    b: b.id,
                });
            }
        }
    }

    // capacity
    for p in &placed {
        let capacity = dataset.rooms.iter().find(|r| r.id == p.room).map(|r| r.capacity);
        let size = dataset.groups.iter().find(|g| g.id == p.group).map(|g| g.capacity);
        if let (Some(capacity), Some(size)) = (capacity, size) {
            if capacity < size {
                violations.push(Violation::RoomTooSmall {
                    exam: p.id,
                    room: p.room,
                });
            }
        }
    }

    // self-invigilation
    for duty in &dataset.surveillances {
        if let Some(e) = dataset.exams.iter().find(|e| e.id == duty.exam_id) {
            if e.professor_id == duty.professor_id {
                violations.push(Violation::SelfInvigilation {
                    exam: e.id,
                    professor: duty.professor_id,
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_injected_conflicts() {
        let ds: Dataset = serde_yaml::from_str(
            r#"
rooms:
  - { id: 1, capacity: 10 }
professors:
  - { id: 1, department_id: 1 }
groups:
  - { id: 1, capacity: 20, students: [1] }
exams:
  - { id: 1, module_id: 1, professor_id: 1, group_id: 1, status: scheduled, scheduled_at: "2026-02-01T08:00:00", room_id: 1 }
  - { id: 2, module_id: 1, professor_id: 1, group_id: 1, status: scheduled, scheduled_at: "2026-02-01T09:00:00", room_id: 1 }
surveillances:
  - { professor_id: 1, exam_id: 1 }
"#,
        )
        .unwrap();

        let v = audit(&ds, 1, 90);
        assert!(v.iter().any(|x| matches!(x, Violation::StudentDoubleBooked { .. })));
        assert!(v.iter().any(|x| matches!(x, Violation::ProfessorOverCap { count: 2, .. })));
        assert!(v.iter().any(|x| matches!(x, Violation::RoomOverlap { .. })));
        assert!(v.iter().any(|x| matches!(x, Violation::RoomTooSmall { .. })));
        assert!(v.iter().any(|x| matches!(x, Violation::SelfInvigilation { .. })));
    }

    #[test]
    fn empty_dataset_is_clean() {
        assert!(audit(&Dataset::default(), 3, 90).is_empty());
    }
}
