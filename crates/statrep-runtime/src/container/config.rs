//! # Runtime Configuration
//!
//! Unified configuration for the store, the subsystems and telemetry.
//!
//! Every value has a default; `from_env` overrides them from `SR_*`
//! variables and `validate` rejects values the subsystems cannot run with.

use std::path::PathBuf;

use sr_02_reports::{ReportStoreConfig, DEFAULT_MAX_QUERY_LIMIT};
use sr_03_submission::{WorkflowConfig, DEFAULT_MIN_PIN_LENGTH};
use sr_telemetry::TelemetryConfig;

/// Default SQLite file.
pub const DEFAULT_DATABASE_PATH: &str = "./data/statrep.db";

/// Default number of rows shown by `recent`.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Workflow configuration.
    pub workflow: WorkflowConfig,
    /// Report query configuration.
    pub reports: ReportsConfig,
    /// Logging and metrics configuration.
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(path) = lookup("SR_DATABASE_PATH") {
            config.storage.database_path = PathBuf::from(path);
        }
        if let Some(value) = lookup("SR_UTC_OFFSET_MINUTES") {
            config.workflow.utc_offset_minutes = parse("SR_UTC_OFFSET_MINUTES", &value)?;
        }
        if let Some(value) = lookup("SR_MIN_PIN_LENGTH") {
            config.workflow.min_pin_length = parse("SR_MIN_PIN_LENGTH", &value)?;
        }
        if let Some(value) = lookup("SR_RECENT_LIMIT") {
            config.reports.recent_limit = parse("SR_RECENT_LIMIT", &value)?;
        }
        if let Some(value) = lookup("SR_MAX_QUERY_LIMIT") {
            config.reports.max_query_limit = parse("SR_MAX_QUERY_LIMIT", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration before the container is built.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the minimum PIN length is below 4
    /// - the UTC offset is outside ±24 hours
    /// - a query limit is zero, or `recent_limit` exceeds `max_query_limit`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.min_pin_length < DEFAULT_MIN_PIN_LENGTH {
            return Err(ConfigError::PinLengthTooShort(self.workflow.min_pin_length));
        }
        if self.workflow.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::OffsetOutOfRange(self.workflow.utc_offset_minutes));
        }
        if self.reports.max_query_limit == 0 {
            return Err(ConfigError::ZeroLimit("SR_MAX_QUERY_LIMIT"));
        }
        if self.reports.recent_limit == 0 {
            return Err(ConfigError::ZeroLimit("SR_RECENT_LIMIT"));
        }
        if self.reports.recent_limit > self.reports.max_query_limit {
            return Err(ConfigError::RecentAboveMax {
                recent: self.reports.recent_limit,
                max: self.reports.max_query_limit,
            });
        }
        Ok(())
    }

    /// Query settings for the report service.
    pub fn report_store_config(&self) -> ReportStoreConfig {
        ReportStoreConfig {
            max_query_limit: self.reports.max_query_limit,
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed.
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
    /// Minimum PIN length below the floor of 4.
    PinLengthTooShort(usize),
    /// UTC offset outside ±24 hours.
    OffsetOutOfRange(i32),
    /// A query limit of zero.
    ZeroLimit(&'static str),
    /// Default page larger than the cap.
    RecentAboveMax {
        /// Configured `SR_RECENT_LIMIT`.
        recent: usize,
        /// Configured `SR_MAX_QUERY_LIMIT`.
        max: usize,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an invalid value: {value:?}")
            }
            ConfigError::PinLengthTooShort(len) => write!(
                f,
                "SR_MIN_PIN_LENGTH must be at least {DEFAULT_MIN_PIN_LENGTH}, got {len}"
            ),
            ConfigError::OffsetOutOfRange(minutes) => write!(
                f,
                "SR_UTC_OFFSET_MINUTES must be within ±1439 minutes, got {minutes}"
            ),
            ConfigError::ZeroLimit(key) => write!(f, "{key} must be greater than zero"),
            ConfigError::RecentAboveMax { recent, max } => write!(
                f,
                "SR_RECENT_LIMIT ({recent}) cannot exceed SR_MAX_QUERY_LIMIT ({max})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite database file. Parent directories are created on open.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

/// Report query configuration.
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// Rows returned by `recent` when no limit is given.
    pub recent_limit: usize,
    /// Hard cap applied to every limited query.
    pub max_query_limit: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            max_query_limit: DEFAULT_MAX_QUERY_LIMIT,
        }
    }
}
