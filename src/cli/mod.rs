//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{BlockCommand, Cli, Commands, DayList, IssueCommand};
pub use output::{
    format_block_list, format_issue_list, format_notices, format_process_list, format_year_grid,
};
