//! Application layer - Use cases and orchestration

pub mod calendar_editor;
pub mod course_service;
pub mod init;
pub mod manage_config;

pub use calendar_editor::{
    BlockOption, CalendarEditor, Cell, DateField, EditorSettings, IssueOption, IssueView, Notice,
    YearGrid,
};
pub use course_service::{select_block_number, CourseService};
pub use manage_config::ConfigService;
