//! Application configuration management.

use chrono::Weekday;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Week-closing defaults.
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied when closing a week.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// Amortization window for a brand-new recovery debt.
    #[serde(default = "default_amortization_weeks")]
    pub default_amortization_weeks: u32,
    /// First day of the budgeting week.
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: Weekday,
    /// Cover deficits from the savings cushion before creating debt.
    #[serde(default = "default_true")]
    pub use_app_savings_for_recovery: bool,
    /// Create or extend the recovery debt for an uncovered deficit.
    #[serde(default = "default_true")]
    pub create_or_add_to_recovery: bool,
}

fn default_amortization_weeks() -> u32 {
    4
}

fn default_week_starts_on() -> Weekday {
    Weekday::Mon
}

fn default_true() -> bool {
    true
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            default_amortization_weeks: default_amortization_weeks(),
            week_starts_on: default_week_starts_on(),
            use_app_savings_for_recovery: true,
            create_or_add_to_recovery: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "weekclose=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("WEEKCLOSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
