//! File system repository

use crate::error::{CourseError, Result};
use crate::infrastructure::config::{Config, WORKSPACE_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File holding the course of a workspace
pub const COURSE_FILE: &str = "course.xml";

/// Abstract repository for workspace operations
pub trait WorkspaceRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load configuration from .periodical/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .periodical/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .periodical directory exists
    fn is_initialized(&self) -> bool;

    /// Create .periodical directory structure
    fn initialize(&self) -> Result<()>;

    /// Read the stored course document, `None` if there is none yet
    fn load_course_document(&self) -> Result<Option<String>>;

    /// Replace the stored course document
    fn save_course_document(&self, xml: &str) -> Result<()>;
}

/// File system implementation of WorkspaceRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover workspace root by walking up from current directory
    /// First checks PERIODICAL_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("PERIODICAL_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_workspace_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(CourseError::Config(format!(
                    "PERIODICAL_ROOT is set to '{}' but no .periodical directory found. \
                    Run 'periodical init' in that directory or unset PERIODICAL_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover workspace root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_workspace_dir(&current) {
                debug!("Found workspace at {}", current.display());
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(CourseError::NotWorkspace(start.to_path_buf())),
            }
        }
    }

    fn has_workspace_dir(path: &Path) -> bool {
        path.join(WORKSPACE_DIR).is_dir()
    }

    fn course_path(&self) -> PathBuf {
        self.root.join(COURSE_FILE)
    }
}

impl WorkspaceRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_workspace_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let workspace_dir = self.root.join(WORKSPACE_DIR);

        if workspace_dir.exists() {
            return Err(CourseError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&workspace_dir)?;
        info!("Initialized workspace at {}", self.root.display());
        Ok(())
    }

    fn load_course_document(&self) -> Result<Option<String>> {
        let path = self.course_path();
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(CourseError::Io)
    }

    /// Written to a temp file first and renamed into place, so a failed
    /// write never leaves a truncated course behind.
    fn save_course_document(&self, xml: &str) -> Result<()> {
        let path = self.course_path();
        let tmp_path = path.with_file_name(format!("{}.tmp-{}", COURSE_FILE, std::process::id()));

        fs::write(&tmp_path, xml)?;
        if path.exists() {
            // rename does not overwrite on Windows
            fs::remove_file(&path)?;
        }
        fs::rename(&tmp_path, &path)?;

        info!("Saved course to {}", path.display());
        Ok(())
    }
}
