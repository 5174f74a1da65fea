// src/config/model.rs

use log::LevelFilter;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Re-entry interval used when the config file does not set one. Deployments
/// that want "one entry per working day" set `reentry_interval = "20h"`.
pub const DEFAULT_REENTRY_INTERVAL: Duration = Duration::from_secs(30);

/// Log file name used when logging is enabled without `[logging] file`.
pub const DEFAULT_LOG_FILE: &str = "gatepass.log";

/// Top-level runtime config
#[derive(Debug, Clone)]
pub struct Config {
    pub logging:   LoggingConfig,
    pub database:  DatabaseConfig,
    pub policy:    PolicyConfig,
    pub generator: GeneratorConfig,
    pub export:    ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging:   LoggingConfig { enable: false, file: None, level: LevelFilter::Info },
            database:  DatabaseConfig::default(),
            policy:    PolicyConfig { reentry_interval: DEFAULT_REENTRY_INTERVAL },
            generator: GeneratorConfig::default(),
            export:    ExportConfig::default(),
        }
    }
}

impl Config {
    /// Anchor every relative path (database, log file, export file, generator
    /// output) at `base_dir`. Absolute paths are kept as written.
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        self.database.path = crate::db::db_path(base_dir, &self.database);
        if self.logging.enable {
            let file = self.logging.file.take().unwrap_or_else(|| DEFAULT_LOG_FILE.into());
            self.logging.file = Some(base_dir.join(file));
        }
        self.export.file = base_dir.join(&self.export.file);
        self.generator.output = base_dir.join(&self.generator.output);
        self
    }
}

/// Fully-typed `[logging]`
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub enable: bool,
    pub file:   Option<PathBuf>,
    pub level:  LevelFilter,
}

/// Mirror of the `[database]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path:            PathBuf,
    pub journal_mode:    String,
    pub synchronous:     String,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path:            "student_info.db".into(),
            journal_mode:    "WAL".into(),
            synchronous:     "NORMAL".into(),
            busy_timeout_ms: 1_000,
        }
    }
}

/// Fully-typed `[policy]`
#[derive(Debug, Clone, Copy)]
pub struct PolicyConfig {
    pub reentry_interval: Duration,
}

/// Mirror of the `[generator]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Pixels per QR module before upscaling.
    pub module_px:  u32,
    /// Border width in modules.
    pub quiet_zone: u32,
    pub upscale:    u32,
    pub output:     PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { module_px: 10, quiet_zone: 4, upscale: 3, output: "qrcode.png".into() }
    }
}

/// Mirror of the `[export]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { file: "student_data.csv".into() }
    }
}

/// Raw `[logging]` as written in TOML
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RawLogging {
    pub enable: bool,
    pub file:   Option<String>,
    pub level:  String,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self { enable: false, file: None, level: "INFO".into() }
    }
}

/// Raw `[policy]`; the interval is a humantime string such as `"30s"` or `"20h"`
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RawPolicy {
    pub reentry_interval: String,
}

impl Default for RawPolicy {
    fn default() -> Self {
        Self { reentry_interval: humantime::format_duration(DEFAULT_REENTRY_INTERVAL).to_string() }
    }
}

/// The whole file as deserialized; every table is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub logging:   RawLogging,
    pub database:  DatabaseConfig,
    pub policy:    RawPolicy,
    pub generator: GeneratorConfig,
    pub export:    ExportConfig,
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, #[source] humantime::DurationError),

    #[error("invalid generator setting: {0}")]
    InvalidGenerator(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// `"warn"` → `LevelFilter::Warn`
pub fn parse_level(s: &str) -> Result<LevelFilter, ConfigError> {
    s.parse::<LevelFilter>()
        .map_err(|_| ConfigError::InvalidLevel(s.into()))
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let level = parse_level(&raw.logging.level)?;
        let interval = humantime::parse_duration(raw.policy.reentry_interval.trim())
            .map_err(|e| ConfigError::InvalidDuration(raw.policy.reentry_interval.clone(), e))?;

        let generator = raw.generator;
        if generator.module_px == 0 {
            return Err(ConfigError::InvalidGenerator("module_px must be at least 1"));
        }
        if generator.upscale == 0 {
            return Err(ConfigError::InvalidGenerator("upscale must be at least 1"));
        }

        Ok(Config {
            logging: LoggingConfig {
                enable: raw.logging.enable,
                file:   raw.logging.file.map(PathBuf::from),
                level,
            },
            database: raw.database,
            policy: PolicyConfig { reentry_interval: interval },
            generator,
            export: raw.export,
        })
    }
}
