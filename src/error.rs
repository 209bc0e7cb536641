//! Error types for periodical

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for periodical
#[derive(Debug, Error)]
pub enum CourseError {
    #[error("Date range {first} – {last} overlaps the block {other}")]
    Overlap {
        first: NaiveDate,
        last: NaiveDate,
        other: String,
    },

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Malformed course document: {0}")]
    MalformedCourse(String),

    #[error("Cannot write course document: {0}")]
    XmlSerialize(String),

    #[error("Cannot read date: {0}")]
    DateParse(String),

    #[error("The course does not contain any issue")]
    EmptyCourse,

    #[error("Granularity not available: {0}")]
    GranularityUnavailable(String),

    #[error("No block number {0}")]
    UnknownBlock(u64),

    #[error("No issue number {0} in the selected block")]
    UnknownIssue(usize),

    #[error("No block selected")]
    NoBlockSelected,

    #[error("Not a periodical workspace: {0}")]
    NotWorkspace(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot read config.toml: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Cannot write config.toml: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl CourseError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CourseError::NotWorkspace(_) => 2,
            CourseError::DateParse(_) => 3,
            CourseError::Overlap { .. } | CourseError::InvalidRange(_) => 4,
            CourseError::MalformedCourse(_) => 5,
            CourseError::EmptyCourse | CourseError::GranularityUnavailable(_) => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            CourseError::NotWorkspace(path) => {
                format!(
                    "Not a periodical workspace: {}\n\n\
                    Suggestions:\n\
                    • Run 'periodical init' in this directory to create a new workspace\n\
                    • Navigate to an existing workspace\n\
                    • Set PERIODICAL_ROOT environment variable to your workspace path",
                    path.display()
                )
            }
            CourseError::DateParse(input) => {
                format!(
                    "Cannot read date: '{}'\n\n\
                    Dates are read as day, month, year separated by any non-digit:\n\
                    • 17.01.1850, 17/1/1850, 17-01-1850\n\
                    • Two-digit years are completed to the most recent past century\n\
                    • Day and month are swapped if the date is invalid otherwise",
                    input
                )
            }
            CourseError::Overlap { .. } => {
                format!(
                    "{}\n\n\
                    Blocks of a course must not share any day.\n\
                    Use 'periodical block list' to see the existing date ranges.",
                    self
                )
            }
            CourseError::EmptyCourse => "The course does not contain any issue.\n\n\
                Suggestions:\n\
                • Add a block: periodical block add --first 1.1.1850 --last 31.12.1850\n\
                • Add an issue to it: periodical issue add 1 Morning --days mon,wed,fri"
                .to_string(),
            CourseError::GranularityUnavailable(msg) => {
                format!(
                    "{}\n\n\
                    Valid granularities: days, weeks, months, quarters, years, issues, as-imported\n\
                    'as-imported' requires a course imported with process boundaries",
                    msg
                )
            }
            CourseError::Config(msg) => {
                if msg.contains("Invalid granularity") {
                    format!(
                        "{}\n\n\
                        Example: periodical config granularity weeks",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using CourseError
pub type Result<T> = std::result::Result<T, CourseError>;
