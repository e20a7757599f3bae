/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! In-memory [`ExamRepository`] backed by a YAML dataset.
//!
//! The binary uses it as a file-backed store: load the dataset, run, save the
//! updated dataset.  Tests use it directly and inject failures through
//! [`InMemoryRepository::fail_commits_for`] and friends.
//!
//! ```yaml
//! rooms:
//!   - { id: 1, name: "Amphi A", capacity: 200, kind: amphitheater, department_id: 1 }
//! professors:
//!   - { id: 1, department_id: 1 }
//! groups:
//!   - { id: 1, capacity: 25, students: [1, 2, 3] }
//! exams:
//!   - { id: 1, module_id: 1, professor_id: 1, group_id: 1, duration_minutes: 90 }
//! surveillances:
//!   - { professor_id: 2, exam_id: 1 }
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ExamRepository, RepositoryError};
use crate::config::SchedulingConfig;
use crate::model::{
    Exam, ExamId, ExamStatus, Group, GroupId, ModuleId, Professor, ProfessorId, Room, RoomId,
    StudentId,
};

// ── Dataset (serialised form) ─────────────────────────────────────────────────

/// A persisted exam row, before joining with its group and professor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: ExamId,
    pub module_id: ModuleId,
    pub professor_id: ProfessorId,
    pub group_id: GroupId,
    /// Falls back to the repository's default duration when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub status: ExamStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurveillanceRecord {
    pub professor_id: ProfessorId,
    pub exam_id: ExamId,
}

/// Everything the repository persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub rooms: Vec<Room>,
    pub professors: Vec<Professor>,
    pub groups: Vec<Group>,
    pub exams: Vec<ExamRecord>,
    pub surveillances: Vec<SurveillanceRecord>,
}

impl Dataset {
    /// Parse a YAML dataset from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not a valid dataset.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading dataset from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open dataset file: {}", path.display()))?;
        let dataset: Dataset = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        info!(
            rooms = dataset.rooms.len(),
            professors = dataset.professors.len(),
            groups = dataset.groups.len(),
            exams = dataset.exams.len(),
            surveillances = dataset.surveillances.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Write the dataset to `path` as YAML, replacing any existing file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialise dataset")?;
        std::fs::write(path, content)
            .with_context(|| format!("Cannot write dataset file: {}", path.display()))?;
        info!("Dataset written to: {}", path.display());
        Ok(())
    }
}

// ── InMemoryRepository ────────────────────────────────────────────────────────

/// [`ExamRepository`] over an owned [`Dataset`].
#[derive(Debug)]
pub struct InMemoryRepository {
    dataset: Dataset,
    default_duration_minutes: u32,
    duties: BTreeSet<SurveillanceRecord>,

    // Fault injection
    offline: bool,
    failing_commits: HashSet<ExamId>,
    failing_duties: bool,
}

impl InMemoryRepository {
    /// Default duration for exam rows that carry none.
    pub const DEFAULT_DURATION_MINUTES: u32 = 90;

    pub fn new(dataset: Dataset) -> Self {
        let duties = dataset.surveillances.iter().copied().collect();
        Self {
            dataset,
            default_duration_minutes: Self::DEFAULT_DURATION_MINUTES,
            duties,
            offline: false,
            failing_commits: HashSet::new(),
            failing_duties: false,
        }
    }

    /// Repository over `dataset` using the configured default exam duration.
    pub fn for_config(dataset: Dataset, config: &SchedulingConfig) -> Self {
        Self::new(dataset).with_default_duration(config.exam_duration_minutes)
    }

    pub fn with_default_duration(mut self, minutes: u32) -> Self {
        self.default_duration_minutes = minutes;
        self
    }

    /// Current dataset, including every commit made so far.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Every load and write fails with [`RepositoryError::Unavailable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Commits of `exam` fail with [`RepositoryError::Unavailable`].
    pub fn fail_commits_for(&mut self, exam: ExamId) {
        self.failing_commits.insert(exam);
    }

    /// Surveillance writes fail with [`RepositoryError::Unavailable`].
    pub fn fail_surveillance_writes(&mut self, fail: bool) {
        self.failing_duties = fail;
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.offline {
            Err(RepositoryError::Unavailable("repository is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl ExamRepository for InMemoryRepository {
    fn load_available_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        self.ensure_online()?;
        Ok(self
            .dataset
            .rooms
            .iter()
            .filter(|r| r.available)
            .cloned()
            .collect())
    }

    fn load_professors(&self) -> Result<Vec<Professor>, RepositoryError> {
        self.ensure_online()?;
        Ok(self.dataset.professors.clone())
    }

    fn load_pending_exams(&self) -> Result<Vec<Exam>, RepositoryError> {
        self.ensure_online()?;

        let groups: HashMap<GroupId, &Group> =
            self.dataset.groups.iter().map(|g| (g.id, g)).collect();
        let professors: HashMap<ProfessorId, &Professor> =
            self.dataset.professors.iter().map(|p| (p.id, p)).collect();

        self.dataset
            .exams
            .iter()
            .filter(|e| e.status == ExamStatus::Pending)
            .map(|record| {
                let group = groups.get(&record.group_id).ok_or_else(|| {
                    RepositoryError::InvalidReference {
                        exam: record.id,
                        detail: format!("group {} does not exist", record.group_id),
                    }
                })?;
                let professor = professors.get(&record.professor_id).ok_or_else(|| {
                    RepositoryError::InvalidReference {
                        exam: record.id,
                        detail: format!("professor {} does not exist", record.professor_id),
                    }
                })?;

                let duration_minutes = record
                    .duration_minutes
                    .unwrap_or(self.default_duration_minutes);
                if duration_minutes == 0 {
                    return Err(RepositoryError::ZeroDuration(record.id));
                }

                Ok(Exam {
                    id: record.id,
                    module_id: record.module_id,
                    professor_id: record.professor_id,
                    group_id: record.group_id,
                    group_size: group.capacity,
                    department_id: Some(professor.department_id),
                    duration_minutes,
                    scheduled_slot: record.scheduled_at,
                    assigned_room: record.room_id,
                    status: record.status,
                })
            })
            .collect()
    }

    fn load_group_rosters(&self) -> Result<HashMap<GroupId, Vec<StudentId>>, RepositoryError> {
        self.ensure_online()?;
        Ok(self
            .dataset
            .groups
            .iter()
            .filter(|g| !g.students.is_empty())
            .map(|g| (g.id, g.students.clone()))
            .collect())
    }

    fn load_surveillance_counts(&self) -> Result<HashMap<ProfessorId, u32>, RepositoryError> {
        self.ensure_online()?;
        let mut counts = HashMap::new();
        for duty in &self.duties {
            *counts.entry(duty.professor_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn commit_exam_assignment(
        &mut self,
        exam: ExamId,
        slot: NaiveDateTime,
        room: RoomId,
    ) -> Result<(), RepositoryError> {
        self.ensure_online()?;
        if self.failing_commits.contains(&exam) {
            return Err(RepositoryError::Unavailable(format!(
                "write of exam {exam} rejected"
            )));
        }
        if !self.dataset.rooms.iter().any(|r| r.id == room) {
            return Err(RepositoryError::UnknownRoom(room));
        }

        let record = self
            .dataset
            .exams
            .iter_mut()
            .find(|e| e.id == exam)
            .ok_or(RepositoryError::UnknownExam(exam))?;
        if record.status != ExamStatus::Pending {
            return Err(RepositoryError::NotPending(exam));
        }

        record.scheduled_at = Some(slot);
        record.room_id = Some(room);
        record.status = ExamStatus::Scheduled;
        debug!(exam = %exam, room = %room, slot = %slot, "exam assignment persisted");
        Ok(())
    }

    fn record_surveillance_duty(
        &mut self,
        professor: ProfessorId,
        exam: ExamId,
    ) -> Result<bool, RepositoryError> {
        self.ensure_online()?;
        if self.failing_duties {
            return Err(RepositoryError::Unavailable(format!(
                "write of duty ({professor}, {exam}) rejected"
            )));
        }

        let record = SurveillanceRecord {
            professor_id: professor,
            exam_id: exam,
        };
        let inserted = self.duties.insert(record);
        if inserted {
            self.dataset.surveillances.push(record);
        }
        Ok(inserted)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
