// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::autoscroll::AutoScroll;
use crate::context::AppContext;
use crate::model::parser::DEFAULT_DURATION_MINS;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fs;
use std::time::Duration;

fn default_true() -> bool {
    true
}
fn default_quiet_period() -> u64 {
    5
}
fn default_header_offset() -> usize {
    2
}
fn default_duration() -> i64 {
    DEFAULT_DURATION_MINS
}
fn default_tick_interval() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Track the current item automatically.
    #[serde(default = "default_true")]
    pub auto_scroll: bool,
    /// Seconds without user scrolling before auto-scroll resumes.
    #[serde(default = "default_quiet_period")]
    pub quiet_period_secs: u64,
    /// Rows kept free above the target for the sticky hour header.
    #[serde(default = "default_header_offset")]
    pub header_offset_rows: usize,
    /// Length of an item whose sheet row has no end time.
    #[serde(default = "default_duration")]
    pub default_duration_mins: i64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_scroll: true,
            quiet_period_secs: 5,
            header_offset_rows: 2,
            default_duration_mins: DEFAULT_DURATION_MINS,
            tick_interval_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads the config, writing defaults on first start.
    /// Syntax and permission errors are still reported.
    pub fn load_or_init(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                let cfg = Self::default();
                if let Err(e) = cfg.save(ctx) {
                    log::warn!("Could not write default config: {:#}", e);
                }
                Ok(cfg)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether an error from [`Config::load`] means the file simply does not exist.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_secs(self.quiet_period_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        // Sub-100ms ticks would only burn CPU redrawing the same second.
        Duration::from_millis(self.tick_interval_ms.max(100))
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn autoscroll(&self) -> AutoScroll {
        let mut auto = AutoScroll::new(self.quiet_period(), self.header_offset_rows);
        auto.set_enabled(self.auto_scroll);
        auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_config_falls_back_and_is_written() {
        let ctx = TestContext::new();
        let cfg = Config::load_or_init(&ctx).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(ctx.get_config_file_path().unwrap().exists());
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let cfg: Config = toml::from_str("quiet_period_secs = 8").unwrap();
        assert_eq!(cfg.quiet_period_secs, 8);
        assert!(cfg.auto_scroll);
        assert_eq!(cfg.default_duration_mins, 10);
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let ctx = TestContext::new();
        fs::write(ctx.get_config_file_path().unwrap(), "auto_scroll = [").unwrap();
        let err = Config::load_or_init(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
    }

    #[test]
    fn test_log_level_parsing() {
        let cfg = Config {
            log_level: "debug".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.log_level_filter(), LevelFilter::Debug);
        let cfg = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.log_level_filter(), LevelFilter::Info);
    }
}
