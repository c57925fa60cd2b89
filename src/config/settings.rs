//! User settings for Budget Planner
//!
//! Manages display preferences and the tuning knobs of the allocation
//! calculator (stepper increment, slider step, auto-allocate pacing).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::PlannerPaths;
use crate::allocation::{CalculatorSettings, CurrencyFormat};
use crate::error::PlannerError;
use crate::models::Money;

/// User settings for Budget Planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol appended to formatted amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Thousands separator used when formatting amounts
    #[serde(default = "default_group_separator")]
    pub group_separator: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Stepper increment, in whole currency units
    #[serde(default = "default_stepper_increment")]
    pub stepper_increment: i64,

    /// Slider step, in percent
    #[serde(default = "default_slider_step")]
    pub slider_step: f64,

    /// Pacing delay before auto-allocation applies its writes
    #[serde(default = "default_auto_allocate_delay_ms")]
    pub auto_allocate_delay_ms: u64,

    /// Length of a new budget when no end date is given
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,

    /// Whether `init` has been run
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₽".to_string()
}

fn default_group_separator() -> String {
    "\u{a0}".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_stepper_increment() -> i64 {
    1000
}

fn default_slider_step() -> f64 {
    0.1
}

fn default_auto_allocate_delay_ms() -> u64 {
    500
}

fn default_period_days() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            group_separator: default_group_separator(),
            date_format: default_date_format(),
            stepper_increment: default_stepper_increment(),
            slider_step: default_slider_step(),
            auto_allocate_delay_ms: default_auto_allocate_delay_ms(),
            default_period_days: default_period_days(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PlannerPaths) -> Result<Self, PlannerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PlannerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PlannerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PlannerPaths) -> Result<(), PlannerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PlannerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PlannerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Currency formatting derived from these settings
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.currency_symbol.clone(), self.group_separator.clone())
    }

    /// Calculator tuning derived from these settings
    pub fn calculator_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            stepper_increment: Money::from_units(self.stepper_increment.max(0)),
            slider_step: self.slider_step.clamp(0.01, 100.0),
            auto_allocate_delay: Duration::from_millis(self.auto_allocate_delay_ms),
        }
    }
}
