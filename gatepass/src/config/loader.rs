// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads a TOML file, deserializes it into `RawConfig`, and converts that into
//! the typed runtime `Config`.

use crate::config::model::{Config, ConfigError, RawConfig};
use crate::gatepass_log;
use log::Level;
use std::{fs, path::Path};

/// Load and parse the configuration from `path`.
/// Logs at DEBUG before reading and INFO on success.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    gatepass_log!(Level::Debug, "config", "Reading config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg = parse(&txt)?;
    gatepass_log!(
        Level::Info,
        "config",
        "Loaded config from {:?} (reentry interval {})",
        path,
        humantime::format_duration(cfg.policy.reentry_interval)
    );
    Ok(cfg)
}

/// Parse configuration text; an empty document yields the defaults.
pub fn parse(txt: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = toml::from_str(txt)?;
    raw.try_into()
}

/// `load(path)` when the file exists, built-in defaults otherwise.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load(path)
    } else {
        gatepass_log!(Level::Debug, "config", "{:?} not found, using defaults", path);
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use std::time::Duration;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.policy.reentry_interval, Duration::from_secs(30));
        assert_eq!(cfg.database.path, Path::new("student_info.db"));
        assert_eq!(cfg.database.synchronous, "NORMAL");
        assert_eq!(cfg.logging.level, LevelFilter::Info);
        assert!(!cfg.logging.enable);
        assert_eq!(cfg.generator.module_px, 10);
        assert_eq!(cfg.export.file, Path::new("student_data.csv"));
    }

    #[test]
    fn humantime_interval_is_parsed() {
        let cfg = parse("[policy]\nreentry_interval = \"20h\"\n").unwrap();
        assert_eq!(cfg.policy.reentry_interval, Duration::from_secs(20 * 3600));
    }

    #[test]
    fn bad_interval_is_rejected() {
        let err = parse("[policy]\nreentry_interval = \"soon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration(ref s, _) if s == "soon"), "{err}");
    }

    #[test]
    fn bad_level_is_rejected() {
        let err = parse("[logging]\nlevel = \"chatty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));
    }

    #[test]
    fn zero_upscale_is_rejected() {
        let err = parse("[generator]\nupscale = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGenerator(_)));
    }

    #[test]
    fn unknown_toml_is_a_parse_error() {
        assert!(matches!(parse("[database\n"), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let base = Path::new("/srv/desk");
        let cfg = parse(
            "[logging]\nenable = true\n\
             [database]\npath = \"data/entries.db\"\n\
             [generator]\noutput = \"codes/qr.png\"\n\
             [export]\nfile = \"/tmp/out.csv\"\n",
        )
        .unwrap()
        .resolve_paths(base);

        assert_eq!(cfg.database.path, base.join("data/entries.db"));
        assert_eq!(cfg.logging.file.as_deref(), Some(base.join("gatepass.log").as_path()));
        assert_eq!(cfg.generator.output, base.join("codes/qr.png"));
        assert_eq!(cfg.export.file, Path::new("/tmp/out.csv"));
    }

    #[test]
    fn default_paths_land_in_base_dir() {
        let base = Path::new("/srv/desk");
        let cfg = parse("").unwrap().resolve_paths(base);
        assert_eq!(cfg.export.file, base.join("student_data.csv"));
        assert_eq!(cfg.generator.output, base.join("qrcode.png"));
        assert!(cfg.logging.file.is_none());
    }
}
