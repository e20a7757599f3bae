/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Domain snapshot: everything one run reads from the repository, loaded once.

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::info;

use super::error::SchedulerError;
use crate::model::{Exam, GroupId, Professor, ProfessorId, Room, StudentId};
use crate::repository::ExamRepository;

/// Read-only inputs of one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct DomainSnapshot {
    /// Available rooms, sorted by id so ranking ties are deterministic.
    pub rooms: Vec<Room>,
    /// Professors, sorted by id so duty-balancing ties go to the lowest id.
    pub professors: Vec<Professor>,
    /// Pending exams in processing order (see [`processing_order`]).
    pub exams: Vec<Exam>,
    pub rosters: HashMap<GroupId, Vec<StudentId>>,
    pub surveillance_counts: HashMap<ProfessorId, u32>,
}

impl DomainSnapshot {
    /// Load every input through `repo`.
    ///
    /// # Errors
    /// The first failing repository call aborts the load with
    /// [`SchedulerError::Load`].
    pub fn load<R: ExamRepository + ?Sized>(repo: &R) -> Result<Self, SchedulerError> {
        let mut rooms = repo.load_available_rooms().map_err(SchedulerError::Load)?;
        rooms.sort_by_key(|r| r.id);
        info!("Loaded {} available room(s)", rooms.len());

        let mut professors = repo.load_professors().map_err(SchedulerError::Load)?;
        professors.sort_by_key(|p| p.id);
        info!("Loaded {} professor(s)", professors.len());

        let mut exams = repo.load_pending_exams().map_err(SchedulerError::Load)?;
        processing_order(&mut exams);
        info!("Loaded {} pending exam(s)", exams.len());

        let rosters = repo.load_group_rosters().map_err(SchedulerError::Load)?;
        info!("Loaded rosters for {} group(s)", rosters.len());

        let surveillance_counts = repo.load_surveillance_counts().map_err(SchedulerError::Load)?;

        Ok(Self {
            rooms,
            professors,
            exams,
            rosters,
            surveillance_counts,
        })
    }
}

/// Largest groups first (they fit fewer rooms), ties by exam id ascending.
pub fn processing_order(exams: &mut [Exam]) {
    exams.sort_by_key(|e| (Reverse(e.group_size), e.id));
}
