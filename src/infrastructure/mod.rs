//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod course_xml;
pub mod repository;

pub use config::Config;
pub use course_xml::{from_xml, to_xml};
pub use repository::{FileSystemRepository, WorkspaceRepository, COURSE_FILE};
