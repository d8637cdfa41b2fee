use std::{collections::HashSet, env};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use kitchen_mealplan::{DEFAULT_HORIZON_DAYS, MealSlots};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub meal_slots: MealSlots,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// IANA timezone deciding what "today" is; UTC when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            meal_slots: MealSlots::default(),
            horizon_days: default_horizon_days(),
            timezone: None,
        }
    }
}

fn default_category() -> String {
    "international".to_string()
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_bundled_path")]
    pub bundled_path: String,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default = "default_state_path")]
    pub state_path: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bundled_path: default_bundled_path(),
            remote_url: None,
            state_path: default_state_path(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_bundled_path() -> String {
    "recipes.json".to_string()
}

fn default_state_path() -> String {
    ".kitchen-dashboard/state.json".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Structured JSON log lines instead of the pretty console format.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (KITCHEN__DATA__REMOTE_URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("dashboard.default_category", default_category())?
            .set_default("dashboard.horizon_days", i64::from(default_horizon_days()))?
            .set_default("data.bundled_path", default_bundled_path())?
            .set_default("data.state_path", default_state_path())?
            .set_default("data.fetch_timeout_secs", default_fetch_timeout_secs())?
            .set_default("observability.log_level", default_log_level())?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("KITCHEN")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.dashboard.horizon_days == 0 {
            return Err("dashboard.horizon_days must be at least 1".to_string());
        }

        if self.dashboard.meal_slots.is_empty() {
            return Err("dashboard.meal_slots must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for slot in self.dashboard.meal_slots.iter() {
            if slot.name.trim().is_empty() {
                return Err("dashboard.meal_slots contains an empty name".to_string());
            }
            if !seen.insert(slot.name.as_str()) {
                return Err(format!("dashboard.meal_slots repeats '{}'", slot.name));
            }
            if slot.start_hour > 23 {
                return Err(format!(
                    "dashboard.meal_slots '{}' starts at hour {}",
                    slot.name, slot.start_hour
                ));
            }
        }

        if self.data.fetch_timeout_secs == 0 {
            return Err("data.fetch_timeout_secs must be at least 1".to_string());
        }

        if let Some(tz) = &self.dashboard.timezone {
            if time_tz::timezones::get_by_name(tz).is_none() {
                return Err(format!("dashboard.timezone '{tz}' is not a known timezone"));
            }
        }

        Ok(())
    }
}
