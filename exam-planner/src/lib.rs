/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! exam-planner – university exam session scheduler
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – YAML scheduling configuration
//! ├── model           – exams, rooms, professors, groups, typed ids
//! ├── calendar        – time slots and window overlap
//! ├── repository/     – persistence trait + in-memory YAML dataset
//! └── scheduler/      – greedy sampled placement, rooms, invigilation
//! ```

pub mod calendar;
pub mod config;
pub mod model;
pub mod repository;
pub mod scheduler;
