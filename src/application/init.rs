//! Initialize workspace use case

use crate::domain::Course;
use crate::error::Result;
use crate::infrastructure::{to_xml, Config, FileSystemRepository, WorkspaceRepository};
use std::fs;
use std::path::Path;

/// Initialize a new workspace with an empty course at the specified path.
pub fn init(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = FileSystemRepository::new(path.to_path_buf());
    repo.initialize()?;

    let config = Config::new();
    repo.save_config(&config)?;
    repo.save_course_document(&to_xml(&Course::new())?)?;

    println!("Initialized periodical workspace at {}", path.display());
    println!("Granularity: {}", config.granularity);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_workspace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gazette");

        init(&path).unwrap();

        assert!(path.join(".periodical/config.toml").is_file());
        let document = fs::read_to_string(path.join("course.xml")).unwrap();
        assert!(document.contains("course"));
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        init(temp.path()).unwrap();
        assert!(init(temp.path()).is_err());
    }
}
