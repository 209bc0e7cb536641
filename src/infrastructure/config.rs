//! Configuration management

use crate::domain::Granularity;
use crate::error::{CourseError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the directory marking a workspace
pub const WORKSPACE_DIR: &str = ".periodical";

/// Colours used to tell the issues of a block apart
pub const DEFAULT_ISSUE_COLOURS: [&str; 11] = [
    "#CC0000", "#0000AA", "#33FF00", "#FF9900", "#5555FF", "#006600", "#AAAAFF", "#000055",
    "#0000FF", "#FFFF00", "#000000",
];

/// Date of the first known newspaper; earlier dates are implausible
pub fn default_earliest_plausible() -> NaiveDate {
    NaiveDate::from_ymd_opt(1605, 9, 12).unwrap_or(NaiveDate::MIN)
}

fn default_issue_colours() -> Vec<String> {
    DEFAULT_ISSUE_COLOURS.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_issue_colours")]
    pub issue_colours: Vec<String>,
    #[serde(default = "default_earliest_plausible")]
    pub earliest_plausible: NaiveDate,
    #[serde(default)]
    pub granularity: Granularity,
    pub created: DateTime<Utc>,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            issue_colours: default_issue_colours(),
            earliest_plausible: default_earliest_plausible(),
            granularity: Granularity::default(),
            created: Utc::now(),
        }
    }

    /// Load config from .periodical/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(WORKSPACE_DIR).join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CourseError::NotWorkspace(path.to_path_buf())
            } else {
                CourseError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .periodical/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let workspace_dir = path.join(WORKSPACE_DIR);
        let config_path = workspace_dir.join("config.toml");

        if !workspace_dir.exists() {
            fs::create_dir(&workspace_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Reject settings the editor cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.issue_colours.iter().all(|c| c.trim().is_empty()) {
            return Err(CourseError::Config(
                "issue_colours must contain at least one colour".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a `;`-separated colour list, e.g. "#CC0000;#0000AA"
    pub fn parse_colours(value: &str) -> Vec<String> {
        value
            .split(';')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}
