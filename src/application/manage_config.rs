//! Config management use case

use crate::domain::Granularity;
use crate::error::{CourseError, Result};
use crate::infrastructure::{Config, FileSystemRepository, WorkspaceRepository};
use chrono::NaiveDate;
use std::str::FromStr;

/// Keys accepted by `get`
pub const CONFIG_KEYS: [&str; 4] = [
    "granularity",
    "issue_colours",
    "earliest_plausible",
    "created",
];

/// Service for managing workspace configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;
        value_of(&config, key)
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "granularity" => {
                config.granularity = Granularity::from_str(value).map_err(CourseError::Config)?;
            }
            "issue_colours" => {
                config.issue_colours = Config::parse_colours(value);
                config.validate()?;
            }
            "earliest_plausible" => {
                config.earliest_plausible = NaiveDate::from_str(value).map_err(|_| {
                    CourseError::Config(format!(
                        "Invalid date for earliest_plausible: '{}'. Use YYYY-MM-DD",
                        value
                    ))
                })?;
            }
            "created" => {
                return Err(CourseError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(CourseError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: granularity, issue_colours, earliest_plausible",
                    key
                )));
            }
        }

        self.repository.save_config(&config)?;
        Ok(())
    }

    /// List all config values as key/value pairs
    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        let config = self.repository.load_config()?;
        CONFIG_KEYS
            .iter()
            .map(|key| value_of(&config, key).map(|value| (*key, value)))
            .collect()
    }
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    match key {
        "granularity" => Ok(config.granularity.to_string()),
        "issue_colours" => Ok(config.issue_colours.join(";")),
        "earliest_plausible" => Ok(config.earliest_plausible.to_string()),
        "created" => Ok(config.created.to_rfc3339()),
        _ => Err(CourseError::Config(format!(
            "Unknown config key: '{}'. Valid keys are: {}",
            key,
            CONFIG_KEYS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> ConfigService {
        let repo = FileSystemRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();
        repo.save_config(&Config::new()).unwrap();
        ConfigService::new(repo)
    }

    #[test]
    fn test_get_defaults() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert_eq!(service.get("granularity").unwrap(), "days");
        assert_eq!(service.get("earliest_plausible").unwrap(), "1605-09-12");
        assert!(service.get("issue_colours").unwrap().starts_with("#CC0000;"));
    }

    #[test]
    fn test_set_values() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        service.set("granularity", "Quarters").unwrap();
        service.set("issue_colours", "red; blue").unwrap();
        service.set("earliest_plausible", "1650-01-01").unwrap();

        assert_eq!(service.get("granularity").unwrap(), "quarters");
        assert_eq!(service.get("issue_colours").unwrap(), "red;blue");
        assert_eq!(service.get("earliest_plausible").unwrap(), "1650-01-01");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert!(service.set("granularity", "fortnights").is_err());
        assert!(service.set("issue_colours", ";").is_err());
        assert!(service.set("earliest_plausible", "12.09.1605").is_err());
        assert!(service.set("created", "2020-01-01T00:00:00Z").is_err());
        assert!(service.set("editor", "vim").is_err());
        assert_eq!(service.get("granularity").unwrap(), "days");
    }

    #[test]
    fn test_list() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let keys: Vec<&str> = service.list().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, CONFIG_KEYS.to_vec());
    }
}
