use super::files::atomic_write;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// App metadata stored in meta.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    /// Day the rollover check last ran for
    #[serde(default)]
    pub last_checked: Option<NaiveDate>,
}

impl AppMetadata {
    /// The last-checked date, or `today` on first run
    pub fn last_checked_or(&self, today: NaiveDate) -> NaiveDate {
        self.last_checked.unwrap_or(today)
    }
}

/// Load app metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<AppMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppMetadata::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    let metadata: AppMetadata = serde_json::from_str(&content)
        .with_context(|| format!("Invalid metadata: {}", path.display()))?;
    Ok(metadata)
}

/// Save app metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &AppMetadata) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(metadata)?;
    atomic_write(path, &json)
        .with_context(|| format!("Failed to write metadata: {}", path.display()))?;
    Ok(())
}
