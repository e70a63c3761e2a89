//! Browsing configuration, loadable from a JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Weekday};
use clip_grouping::DEFAULT_GRID_RESOLUTION_DEGREES;
use serde::{Deserialize, Serialize};
use timeline_plan::{OverlayTiming, DEFAULT_DATE_STAMP_FORMAT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub grid_resolution_degrees: f64,
    pub first_weekday: Weekday,
    /// Fixed offset for day boundaries; the system zone when absent
    pub utc_offset_minutes: Option<i32>,
    pub date_stamp_format: String,
    pub overlay: OverlayTiming,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            grid_resolution_degrees: DEFAULT_GRID_RESOLUTION_DEGREES,
            first_weekday: Weekday::Sun,
            utc_offset_minutes: None,
            date_stamp_format: DEFAULT_DATE_STAMP_FORMAT.to_string(),
            overlay: OverlayTiming::default(),
        }
    }
}

impl BrowseConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Configured fixed offset, `None` to use the system time zone
    pub fn fixed_offset(&self) -> Result<Option<FixedOffset>> {
        self.utc_offset_minutes
            .map(|minutes| {
                FixedOffset::east_opt(minutes * 60)
                    .with_context(|| format!("UTC offset out of range: {} minutes", minutes))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("clipbook.json");
        fs::write(&path, r#"{ "first_weekday": "Mon", "utc_offset_minutes": 540 }"#)?;

        let config = BrowseConfig::load(&path)?;

        assert_eq!(config.first_weekday, Weekday::Mon);
        assert_eq!(config.grid_resolution_degrees, DEFAULT_GRID_RESOLUTION_DEGREES);
        assert_eq!(config.date_stamp_format, "%Y/%m/%d");
        assert_eq!(config.fixed_offset()?, FixedOffset::east_opt(9 * 3600));
        Ok(())
    }

    #[test]
    fn test_offset_out_of_range() {
        let config = BrowseConfig {
            utc_offset_minutes: Some(24 * 60),
            ..Default::default()
        };
        assert!(config.fixed_offset().is_err());
    }
}
