//! Weekclose command line
//!
//! Closes one budgeting week described by a JSON file.
//!
//! Usage:
//!   weekclose <week.json>            - Preview the plan, nothing is written
//!   weekclose <week.json> --commit   - Close the week and print the outcome

mod input;

use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use weekclose_core::{ClosedWeek, WeekPreview};
use weekclose_shared::{AppConfig, LoggingConfig};
use weekclose_store::MemoryStores;

use crate::input::WeekFile;

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Preview(WeekPreview),
    Closed {
        #[serde(flatten)]
        closed: ClosedWeek,
        summary: String,
        on_track_streak: u32,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays valid JSON.
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn parse_args() -> anyhow::Result<(PathBuf, bool)> {
    let mut path = None;
    let mut commit = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--commit" => commit = true,
            flag if flag.starts_with("--") => bail!("Unknown flag {flag}"),
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => bail!("Only one week file can be closed at a time"),
        }
    }
    let path = path.context("Usage: weekclose <week.json> [--commit]")?;
    Ok((path, commit))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let (path, commit) = parse_args()?;
    let week = WeekFile::read(&path)?;
    let overrides = week.overrides(&config.reconcile)?;

    let stores = MemoryStores::seeded(
        week.savings_goals,
        week.recovery_debt,
        week.app_savings_balance,
        week.history,
    );
    let closer = stores.closer(&config.reconcile)?;
    info!(file = %path.display(), commit, "Loaded week");

    let (output, complete) = if commit {
        let closed = closer.close_week(week.figures, &overrides, week.date).await?;
        let summary = closed.commit.summary();
        let complete = closed.commit.is_complete();
        if !complete {
            warn!(summary = %summary, "Week only partially closed");
        }
        let on_track_streak = closer.on_track_streak(52).await?;
        (
            Output::Closed {
                closed,
                summary,
                on_track_streak,
            },
            complete,
        )
    } else {
        (
            Output::Preview(closer.preview(week.figures, &overrides).await?),
            true,
        )
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if !complete {
        bail!("Commit did not complete");
    }
    Ok(())
}
