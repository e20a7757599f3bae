/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use exam_planner::config::ConfigManager;
use exam_planner::repository::{Dataset, InMemoryRepository};
use exam_planner::scheduler::ExamScheduler;

/// Exit status when some pending exams could not be scheduled.
const EXIT_PARTIAL: i32 = 2;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Exam session scheduler.
///
/// Example:
///   exam-planner -c scheduling.yaml -d session.yaml -o session.out.yaml
#[derive(Debug, Parser)]
#[command(
    name = "exam-planner",
    about = "Assigns pending exams to time slots, rooms and invigilators",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML scheduling configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Path to the YAML dataset (rooms, professors, groups, exams).
    #[arg(short = 'd', long = "dataset")]
    dataset: PathBuf,

    /// Where to write the updated dataset.  Defaults to the input dataset.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// RNG seed, overrides the configuration file.
    #[arg(long = "seed")]
    seed: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        config  = ?cli.config,
        dataset = %cli.dataset.display(),
        output  = ?cli.output,
        seed    = ?cli.seed,
        "exam-planner starting up"
    );

    // ── Load scheduling configuration ─────────────────────────────────────────
    let mut config_manager = ConfigManager::new();
    match &cli.config {
        Some(path) => {
            if let Err(e) = config_manager.load_from_file(path) {
                error!("Failed to load scheduling configuration: {:#}", e);
                process::exit(1);
            }
        }
        None => warn!("No configuration file provided, using default scheduling settings"),
    }

    let mut config = config_manager.into_config();
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    // ── Load dataset ──────────────────────────────────────────────────────────
    let dataset = match Dataset::load_from_file(&cli.dataset) {
        Ok(ds) => ds,
        Err(e) => {
            error!("Failed to load dataset: {:#}", e);
            process::exit(1);
        }
    };

    let mut repo = InMemoryRepository::for_config(dataset, &config);

    // ── Run ───────────────────────────────────────────────────────────────────
    let scheduler = ExamScheduler::new(Arc::new(config));
    let report = match scheduler.run(&mut repo) {
        Ok(report) => report,
        Err(e) => {
            error!("Scheduling aborted: {}", e);
            process::exit(1);
        }
    };

    let output = cli.output.as_ref().unwrap_or(&cli.dataset);
    if let Err(e) = repo.into_dataset().save_to_file(output) {
        error!("Failed to write dataset: {:#}", e);
        process::exit(1);
    }

    info!(
        scheduled = report.scheduled,
        failed = report.failed,
        surveillance_failures = report.surveillance_failures,
        budget_exhausted = report.budget_exhausted,
        output = %output.display(),
        "Done"
    );

    if !report.is_complete() {
        process::exit(EXIT_PARTIAL);
    }
}
