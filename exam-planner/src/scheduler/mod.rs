//! Exam scheduler.
//!
//! [`ExamScheduler`] places pending exams into `(slot, room)` pairs so that
//! no student sits two exams on one date, no professor exceeds the daily
//! teaching cap, no room hosts overlapping exams, every room seats the whole
//! group, and nobody invigilates their own exam.  The result is a
//! [`RunReport`]; the placements themselves are persisted through the
//! [`ExamRepository`] as they are accepted.
//!
//! # Search
//! Exams are processed one at a time, largest group first.  For each exam a
//! random sample of at most `slot_sample_size` slots is tried in order:
//!
//! ```text
//! slot ─► student check ─► professor check ─► room selector ─► commit
//!            │ fail             │ fail              │ none
//!            └──────────────────┴───────────────────┴──► next sampled slot
//! ```
//!
//! The first accepted slot wins.  An exam whose sample is exhausted is
//! reported `Unscheduled` and never revisited.  Nothing is backtracked.
//!
//! # State
//! All per-run state ([`TrackingState`], RNG, timers) lives inside
//! [`run()`](ExamScheduler::run).  The scheduler itself only holds the
//! configuration and is `Send + Sync`.
//!
//! # Example
//! ```rust,ignore
//! let scheduler = ExamScheduler::new(Arc::new(config));
//! let report = scheduler.run(&mut repository)?;
//! println!("{} scheduled, {} failed", report.scheduled, report.failed);
//! ```

pub mod commit;
pub mod constraints;
pub mod error;
pub mod rooms;
pub mod snapshot;
pub mod surveillance;
pub mod tracking;

#[cfg(test)]
mod audit;

pub use error::{RejectReason, SchedulerError};
pub use snapshot::DomainSnapshot;
pub use tracking::TrackingState;

use std::sync::Arc;
use std::time::Instant;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};

use crate::calendar::{generate_slots, TimeSlot};
use crate::config::SchedulingConfig;
use crate::model::{ExamId, RoomId};
use crate::repository::ExamRepository;

use commit::commit_assignment;
use constraints::check_placement;
use rooms::{fits_any_room, select_room};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Individual unscheduled exams are logged at `warn` up to this many; the
/// rest only appear in the final summary.
const MAX_LOGGED_FAILURES: u32 = 20;

/// Emit a progress line every this many scheduled exams.
const PROGRESS_EVERY: u32 = 50;

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Final state of one exam after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamOutcome {
    /// Placed and persisted.
    Scheduled { slot: TimeSlot, room: RoomId },
    /// The sampled slots held no feasible placement.
    Unscheduled,
    /// A placement was accepted but the repository rejected the write.
    CommitFailed,
    /// Not attempted because the run's time budget was exhausted.
    OutOfTime,
}

impl ExamOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, ExamOutcome::Scheduled { .. })
    }
}

/// Aggregate result of one run.  The caller decides whether a partial run
/// is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub scheduled: u32,
    /// Every exam that did not end `Scheduled`, whatever the reason.
    pub failed: u32,
    /// Duty writes that failed after their exam was committed.
    pub surveillance_failures: u32,
    pub budget_exhausted: bool,
    /// Per-exam outcome in processing order.
    pub outcomes: Vec<(ExamId, ExamOutcome)>,
}

impl RunReport {
    pub fn total(&self) -> u32 {
        self.scheduled + self.failed
    }

    /// `true` when every pending exam was scheduled.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    pub fn outcome_of(&self, exam: ExamId) -> Option<ExamOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == exam)
            .map(|(_, o)| *o)
    }

    fn record(&mut self, exam: ExamId, outcome: ExamOutcome) {
        if outcome.is_scheduled() {
            self.scheduled += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push((exam, outcome));
    }
}

// ── ExamScheduler ─────────────────────────────────────────────────────────────

pub struct ExamScheduler {
    config: Arc<SchedulingConfig>,
}

impl ExamScheduler {
    pub fn new(config: Arc<SchedulingConfig>) -> Self {
        Self { config }
    }

    // ── Public entry points ───────────────────────────────────────────────────

    /// Schedule every pending exam in `repo`.
    ///
    /// The RNG is seeded from `config.seed` when set, so identical inputs
    /// give identical placements; otherwise it is seeded from the thread RNG.
    ///
    /// # Errors
    /// Only [`SchedulerError::Load`]: failures while committing individual
    /// exams are reported in the [`RunReport`], never returned.
    pub fn run<R: ExamRepository + ?Sized>(&self, repo: &mut R) -> Result<RunReport, SchedulerError> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        self.run_with_rng(repo, &mut rng)
    }

    /// [`run()`](Self::run) with a caller-provided RNG.
    pub fn run_with_rng<R, G>(&self, repo: &mut R, rng: &mut G) -> Result<RunReport, SchedulerError>
    where
        R: ExamRepository + ?Sized,
        G: Rng + ?Sized,
    {
        let started = Instant::now();

        let snapshot = DomainSnapshot::load(repo)?;
        let mut slots = generate_slots(
            self.config.start_date,
            self.config.num_days,
            &self.config.exam_start_hours,
        );

        info!(
            exams = snapshot.exams.len(),
            slots = slots.len(),
            rooms = snapshot.rooms.len(),
            professors = snapshot.professors.len(),
            "=== ExamScheduler::run() ==="
        );

        let mut report = RunReport::default();

        // ── Preconditions ─────────────────────────────────────────────────────
        if snapshot.exams.is_empty() {
            info!("No pending exams, nothing to schedule");
            return Ok(report);
        }
        if snapshot.rooms.is_empty() || slots.is_empty() {
            warn!(
                rooms = snapshot.rooms.len(),
                slots = slots.len(),
                "No rooms or no slots available, every pending exam stays unscheduled"
            );
            for exam in &snapshot.exams {
                report.record(exam.id, ExamOutcome::Unscheduled);
            }
            return Ok(report);
        }

        // ── Per-run state ─────────────────────────────────────────────────────
        let mut tracking = TrackingState::with_surveillance_counts(snapshot.surveillance_counts.clone());
        let budget = self.config.time_budget();
        let sample_size = self.config.slot_sample_size.min(slots.len());
        let surveillants = self.config.surveillants_per_exam as usize;

        // Spread exams across the calendar instead of favouring early dates
        slots.shuffle(rng);

        for exam in &snapshot.exams {
            if budget.is_some_and(|limit| started.elapsed() > limit) {
                if !report.budget_exhausted {
                    warn!(
                        elapsed_s = started.elapsed().as_secs(),
                        remaining = snapshot.exams.len() - report.outcomes.len(),
                        "Time budget exhausted, remaining exams left unscheduled"
                    );
                    report.budget_exhausted = true;
                }
                report.record(exam.id, ExamOutcome::OutOfTime);
                continue;
            }

            if !fits_any_room(exam, &snapshot.rooms) {
                warn!(
                    exam = %exam.id,
                    group_size = exam.group_size,
                    largest_room = snapshot.rooms.iter().map(|r| r.capacity).max(),
                    "No room is large enough for this group"
                );
                report.record(exam.id, ExamOutcome::Unscheduled);
                continue;
            }

            let candidates: Vec<TimeSlot> = slots.choose_multiple(rng, sample_size).copied().collect();
            let accepted = candidates.into_iter().find_map(|slot| {
                if let Err(reason) = check_placement(
                    exam,
                    slot,
                    self.config.max_exams_per_day_professor,
                    &snapshot.rosters,
                    &tracking,
                ) {
                    debug!(exam = %exam.id, slot = %slot, %reason, "slot rejected");
                    return None;
                }
                match select_room(exam, slot, &snapshot.rooms, &tracking) {
                    Some(room) => Some((slot, room)),
                    None => {
                        debug!(
                            exam = %exam.id,
                            slot = %slot,
                            reason = %RejectReason::NoRoomAvailable,
                            "slot rejected"
                        );
                        None
                    }
                }
            });

            let outcome = match accepted {
                Some((slot, room)) => match commit_assignment(
                    repo,
                    exam,
                    slot,
                    room,
                    &snapshot,
                    &mut tracking,
                    surveillants,
                ) {
                    Ok(duty) => {
                        report.surveillance_failures += duty.failures;
                        info!(
                            exam = %exam.id,
                            slot = %slot,
                            room = %room.id,
                            invigilators = ?duty.assigned,
                            "✓ scheduled"
                        );
                        ExamOutcome::Scheduled { slot, room: room.id }
                    }
                    Err(e) => {
                        error!(exam = %exam.id, error = %e, "✗ commit failed, exam left pending");
                        ExamOutcome::CommitFailed
                    }
                },
                None => ExamOutcome::Unscheduled,
            };

            if outcome == ExamOutcome::Unscheduled {
                let unscheduled = report.failed + 1;
                if unscheduled <= MAX_LOGGED_FAILURES {
                    warn!(exam = %exam.id, group = %exam.group_id, "✗ could not schedule exam");
                } else if unscheduled == MAX_LOGGED_FAILURES + 1 {
                    warn!("... further unscheduled exams are only counted");
                }
            }

            report.record(exam.id, outcome);

            if outcome.is_scheduled() && report.scheduled % PROGRESS_EVERY == 0 {
                info!(
                    "Scheduled {}/{} ({:.1}%)",
                    report.scheduled,
                    snapshot.exams.len(),
                    f64::from(report.scheduled) * 100.0 / snapshot.exams.len() as f64
                );
            }
        }

        info!(
            scheduled = report.scheduled,
            failed = report.failed,
            total = report.total(),
            surveillance_failures = report.surveillance_failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "=== Scheduling complete ==="
        );
        if report.failed > 0 {
            warn!(
                "{} exam(s) could not be scheduled, consider adding rooms, \
                 extending the session or shortening exams",
                report.failed
            );
        }

        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
