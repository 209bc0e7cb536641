//! periodical - Course of appearance editor for newspapers
//!
//! Describes when the issues of a newspaper appeared: blocks of dates with
//! regular days of week plus exceptions, partitioned into processes and
//! exchanged as XML course documents.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::CourseError;
