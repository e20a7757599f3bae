/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Candidate time slots.
//!
//! A [`TimeSlot`] is an atomic `(date, start hour)` pair.  The full slot set is
//! the Cartesian product of the configured day range and daily start hours,
//! generated once per run.  These are free functions so they can be tested
//! independently of the scheduler.

use std::fmt;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

// ── TimeSlot ──────────────────────────────────────────────────────────────────

/// A concrete exam start time.  The end time depends on the exam duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    start: NaiveDateTime,
}

impl TimeSlot {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { start }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Calendar date of the slot.  Student and professor limits are per date.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start.format("%Y-%m-%d %H:%M"))
    }
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Expand `num_days` days from `start_date` × `start_hours` into slots.
///
/// Order is day-major: every hour of day 0, then every hour of day 1, and so
/// on, with hours kept in the order given.  Hours outside `0..=23` are skipped
/// (configuration loading rejects them before this point).  The range stops
/// at the last representable date.
pub fn generate_slots(start_date: NaiveDate, num_days: u32, start_hours: &[u32]) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for offset in 0..num_days {
        let Some(date) = start_date.checked_add_days(Days::new(u64::from(offset))) else {
            warn!(
                %start_date,
                num_days,
                "Session runs past the last representable date, truncating"
            );
            break;
        };
        for &hour in start_hours {
            if let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) {
                slots.push(TimeSlot::new(date.and_time(time)));
            }
        }
    }
    slots
}

/// Half-open interval intersection test.
///
/// `[a, a+d1)` and `[b, b+d2)` intersect iff `a < b+d2 && b < a+d1`.
/// Back-to-back windows (one ends exactly when the other starts) do not
/// intersect.
pub fn windows_overlap(
    a_start: NaiveDateTime,
    a_minutes: u32,
    b_start: NaiveDateTime,
    b_minutes: u32,
) -> bool {
    let end = |start: NaiveDateTime, minutes: u32| {
        start
            .checked_add_signed(Duration::minutes(i64::from(minutes)))
            .unwrap_or(NaiveDateTime::MAX)
    };
    a_start < end(b_start, b_minutes) && b_start < end(a_start, a_minutes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
