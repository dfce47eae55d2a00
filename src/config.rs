use crate::clock::SystemClock;
use crate::scheduler::{DEFAULT_REFRESH_SECS, DEFAULT_ROLLOVER_CHECK_SECS};
use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which offset decides where one calendar day ends and the next begins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayPolicy {
    #[default]
    Utc,
    Local,
    #[serde(rename_all = "camelCase")]
    Fixed { offset_minutes: i32 },
}

/// User settings stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub timezone: DayPolicy,
    #[serde(default = "default_rollover_check_secs")]
    pub rollover_check_secs: u64,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_rollover_check_secs() -> u64 {
    DEFAULT_ROLLOVER_CHECK_SECS
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DayPolicy::default(),
            rollover_check_secs: DEFAULT_ROLLOVER_CHECK_SECS,
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl Config {
    /// Build the wall clock matching the configured day policy
    pub fn clock(&self) -> Result<SystemClock> {
        match self.timezone {
            DayPolicy::Utc => Ok(SystemClock::utc()),
            DayPolicy::Local => Ok(SystemClock::local()),
            DayPolicy::Fixed { offset_minutes } => {
                let offset = offset_minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .with_context(|| format!("Invalid UTC offset: {} minutes", offset_minutes))?;
                Ok(SystemClock::with_offset(offset))
            }
        }
    }
}

/// Load config.json, falling back to defaults when the file doesn't exist
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}
