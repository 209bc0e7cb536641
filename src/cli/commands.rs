//! CLI command definitions

use chrono::Weekday;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "periodical")]
#[command(about = "Course of appearance editor for newspapers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new workspace
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Manage the blocks of the course
    #[command(subcommand)]
    Block(BlockCommand),

    /// Manage the issues of a block
    #[command(subcommand)]
    Issue(IssueCommand),

    /// Show the calendar sheet of a year
    Show {
        /// Year to show (default: a year of the selected block)
        year: Option<i32>,

        /// Block to show the issues of (default: 1)
        #[arg(short, long)]
        block: Option<usize>,
    },

    /// Count the individual issues of the course
    Count,

    /// Split the course into processes
    Split {
        /// Granularity (issues, days, weeks, months, quarters, years, as-imported)
        #[arg(short, long)]
        granularity: Option<String>,
    },

    /// Replace the course by a course document
    Import {
        /// Course document to read
        file: PathBuf,
    },

    /// Write the course to a course document
    Export {
        /// Course document to write
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// List the blocks of the course
    List,

    /// Add a block
    Add {
        /// Date of first appearance (e.g. 1.1.1850)
        #[arg(long)]
        first: String,

        /// Date of last appearance (e.g. 31.12.1850)
        #[arg(long)]
        last: String,
    },

    /// Change the dates of a block
    Set {
        /// Block number as shown by 'block list'
        block: usize,

        #[arg(long)]
        first: Option<String>,

        #[arg(long)]
        last: Option<String>,
    },

    /// Copy a block to start right after the course ends
    Copy {
        /// Block number as shown by 'block list'
        block: usize,
    },

    /// Remove a block
    Remove {
        /// Block number as shown by 'block list'
        block: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// Add an issue to a block
    Add {
        /// Block number as shown by 'block list'
        block: usize,

        /// Heading of the issue (e.g. Morning edition)
        heading: String,

        /// Days of week the issue appears on (e.g. mon,wed,fri)
        #[arg(short, long, value_parser = parse_weekdays)]
        days: Option<DayList>,
    },

    /// Remove an issue from a block
    Remove {
        block: usize,

        /// Issue number as shown by 'show'
        issue: usize,
    },

    /// Replace the days of week an issue appears on
    Days {
        block: usize,

        issue: usize,

        /// Days of week, e.g. mon,wed,fri; 'none' for no regular day
        #[arg(value_parser = parse_weekdays)]
        days: DayList,
    },

    /// Rename an issue
    Rename {
        block: usize,

        issue: usize,

        heading: String,
    },

    /// Flip whether an issue appeared on a date
    Toggle {
        block: usize,

        issue: usize,

        /// Date to flip (e.g. 24.12.1850)
        date: String,
    },
}

/// Days of week given as one argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayList(pub Vec<Weekday>);

/// Parse a comma-separated list of days of week, e.g. "mon,wed,fri"
pub fn parse_weekdays(value: &str) -> Result<DayList, String> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(DayList(Vec::new()));
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(|day| {
            day.parse::<Weekday>().map_err(|_| {
                format!(
                    "Invalid day of week: '{}'. Use mon, tue, wed, thu, fri, sat or sun",
                    day
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(DayList)
}
