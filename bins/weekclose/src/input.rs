//! The week file read by the command line.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use weekclose_core::report::WeekReport;
use weekclose_core::{RecoveryDebt, SavingsGoalRef, UserOverrides, WeekFigures};
use weekclose_shared::{Money, ReconcileConfig};

/// Everything needed to close one week against fresh in-memory stores.
#[derive(Debug, Deserialize)]
pub struct WeekFile {
    /// Any day in the week being closed.
    pub date: NaiveDate,
    /// Income, budget and spend figures.
    pub figures: WeekFigures,
    /// Savings cushion balance.
    #[serde(default)]
    pub app_savings_balance: Money,
    /// Active savings goals.
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoalRef>,
    /// Existing recovery debt record.
    #[serde(default)]
    pub recovery_debt: Option<RecoveryDebt>,
    /// Reports of previously closed weeks.
    #[serde(default)]
    pub history: Vec<WeekReport>,
    /// User choices; unset fields fall back to configuration.
    #[serde(default)]
    pub overrides: Option<serde_json::Value>,
}

impl WeekFile {
    /// Reads and parses a week file.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Overrides from the file layered over the configured defaults.
    pub fn overrides(&self, config: &ReconcileConfig) -> anyhow::Result<UserOverrides> {
        let defaults = UserOverrides::from_config(config);
        let Some(serde_json::Value::Object(fields)) = &self.overrides else {
            return Ok(defaults);
        };

        let mut merged = match serde_json::to_value(&defaults)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        merged.extend(fields.clone());
        serde_json::from_value(serde_json::Value::Object(merged)).context("Invalid overrides")
    }
}
