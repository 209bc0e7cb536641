//! Domain layer - The course of appearance and its partitioning

pub mod block;
pub mod course;
pub mod date_input;
pub mod granularity;
pub mod issue;

pub use block::{Block, BlockId, DATE_FORMAT};
pub use course::Course;
pub use date_input::{parse_flexible, DateHint, FlexibleDate};
pub use granularity::{Granularity, IndividualIssue, Process};
pub use issue::{Issue, WEEKDAYS};
