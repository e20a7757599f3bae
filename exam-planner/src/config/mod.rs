//! Scheduling configuration loading and management.
//!
//! The expected YAML structure is:
//! ```yaml
//! scheduling:
//!   start_date: 2026-02-01
//!   num_days: 28
//!   exam_start_hours: [8, 10, 13, 15, 17]
//!   max_exams_per_day_professor: 3
//!   exam_duration_minutes: 90
//!   max_optimization_time_seconds: 120
//!   surveillants_per_exam: 1
//!   slot_sample_size: 50
//!   seed: 42
//! ```
//!
//! Every key is optional; missing keys fall back to the values of
//! [`SchedulingConfig::default`].

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    scheduling: Option<SchedulingConfig>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Tunables for one scheduling run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// First calendar day of the exam session.
    pub start_date: NaiveDate,

    /// Number of consecutive days in the session.
    pub num_days: u32,

    /// Daily start hours (0–23), in preference order.
    pub exam_start_hours: Vec<u32>,

    /// Maximum exams one professor may teach on a single date.
    pub max_exams_per_day_professor: u32,

    /// Duration given to dataset exams that do not carry their own.
    ///
    /// Applied by the repository when it loads exams, not by the scheduler:
    /// build the repository with `InMemoryRepository::for_config` (or apply
    /// the value in a custom `ExamRepository`) for it to take effect.
    pub exam_duration_minutes: u32,

    /// Wall-clock budget for the whole run.  `0` disables the budget.
    pub max_optimization_time_seconds: u64,

    /// Invigilators assigned to each newly scheduled exam.
    pub surveillants_per_exam: u32,

    /// Upper bound on candidate slots sampled per exam.
    pub slot_sample_size: usize,

    /// RNG seed.  `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap_or_default(),
            num_days: 28,
            exam_start_hours: vec![8, 10, 13, 15, 17],
            max_exams_per_day_professor: 3,
            exam_duration_minutes: 90,
            max_optimization_time_seconds: 120,
            surveillants_per_exam: 1,
            slot_sample_size: 50,
            seed: None,
        }
    }
}

impl SchedulingConfig {
    /// Total number of candidate slots this calendar produces.
    pub fn slot_count(&self) -> usize {
        self.num_days as usize * self.exam_start_hours.len()
    }

    /// The run budget, or `None` when disabled.
    pub fn time_budget(&self) -> Option<Duration> {
        (self.max_optimization_time_seconds > 0)
            .then(|| Duration::from_secs(self.max_optimization_time_seconds))
    }

    /// Reject values the scheduler cannot work with.
    ///
    /// An empty calendar (`num_days == 0` or no start hours) is accepted here;
    /// the scheduler reports it as a run with nothing scheduled.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.exam_start_hours.iter().find(|&&h| h > 23) {
            bail!("exam_start_hours contains {bad}, hours must be within 0..=23");
        }
        if self.max_exams_per_day_professor == 0 {
            bail!("max_exams_per_day_professor must be at least 1");
        }
        if self.slot_sample_size == 0 {
            bail!("slot_sample_size must be at least 1");
        }
        if self.surveillants_per_exam == 0 {
            bail!("surveillants_per_exam must be at least 1");
        }
        if self.exam_duration_minutes == 0 {
            bail!("exam_duration_minutes must be at least 1");
        }
        Ok(())
    }
}

// ── ConfigManager ─────────────────────────────────────────────────────────────

/// Loads and holds the [`SchedulingConfig`] from a YAML file.
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: SchedulingConfig,

    /// Set to `true` after a successful [`load_from_file`](Self::load_from_file).
    loaded: bool,
}

impl ConfigManager {
    /// Creates a manager holding the default configuration, not yet loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` and replaces the held configuration.
    ///
    /// * An empty file or a file without a `scheduling` section yields the
    ///   defaults (with a warning).
    /// * On any error the previous configuration is reset to defaults and the
    ///   manager is left not loaded.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or a value fails [`SchedulingConfig::validate`].
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading scheduling configuration from: {}", path.display());

        self.config = SchedulingConfig::default();
        self.loaded = false;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        // serde_yaml rejects a document with no content, treat it as "all defaults"
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?
        };

        let config = match file.scheduling {
            Some(cfg) => cfg,
            None => {
                warn!("No scheduling section in configuration file, using defaults");
                SchedulingConfig::default()
            }
        };

        config
            .validate()
            .with_context(|| format!("Invalid scheduling configuration: {}", path.display()))?;

        debug!(?config, "scheduling configuration parsed");
        info!(
            start_date = %config.start_date,
            num_days = config.num_days,
            start_hours = ?config.exam_start_hours,
            slots = config.slot_count(),
            professor_cap = config.max_exams_per_day_professor,
            "Scheduling configuration loaded"
        );

        self.config = config;
        self.loaded = true;
        Ok(())
    }

    /// The held configuration: the file contents after a successful load,
    /// otherwise the defaults.
    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Consumes the manager, returning the held configuration.
    pub fn into_config(self) -> SchedulingConfig {
        self.config
    }

    /// Returns `true` after a successful call to [`load_from_file`](Self::load_from_file).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
