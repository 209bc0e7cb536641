//! Granularity definitions and the partitioning of a course into processes

use crate::domain::Course;
use crate::error::{CourseError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The time resolution at which individual issues are grouped into
/// processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One process per issue appearance
    Issues,
    /// One process per day with at least one appearance
    #[default]
    Days,
    /// One process per ISO week
    Weeks,
    /// One process per calendar month
    Months,
    /// One process per quarter of a year
    Quarters,
    /// One process per calendar year
    Years,
    /// The process boundaries of the imported course document
    AsImported,
}

/// One appearance of one issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualIssue {
    pub date: NaiveDate,
    pub heading: String,
}

impl IndividualIssue {
    pub fn new(date: NaiveDate, heading: impl Into<String>) -> Self {
        IndividualIssue {
            date,
            heading: heading.into(),
        }
    }
}

/// A unit of digitization work: one or more consecutive individual issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub issues: Vec<IndividualIssue>,
}

impl Process {
    pub fn new(issues: Vec<IndividualIssue>) -> Self {
        Process { issues }
    }

    /// Date of the first issue in the process
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.issues.first().map(|issue| issue.date)
    }

    /// Date of the last issue in the process
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.issues.last().map(|issue| issue.date)
    }
}

impl Granularity {
    pub const ALL: [Granularity; 7] = [
        Granularity::Issues,
        Granularity::Days,
        Granularity::Weeks,
        Granularity::Months,
        Granularity::Quarters,
        Granularity::Years,
        Granularity::AsImported,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Issues => "issues",
            Granularity::Days => "days",
            Granularity::Weeks => "weeks",
            Granularity::Months => "months",
            Granularity::Quarters => "quarters",
            Granularity::Years => "years",
            Granularity::AsImported => "as-imported",
        }
    }

    /// Key of the period a date belongs to. Appearances with the same key
    /// end up in the same process. `None` for granularities that do not
    /// group by date.
    fn period_key(&self, date: NaiveDate) -> Option<(i32, u32)> {
        match self {
            Granularity::Days => Some((date.year(), date.ordinal())),
            Granularity::Weeks => {
                let week = date.iso_week();
                Some((week.year(), week.week()))
            }
            Granularity::Months => Some((date.year(), date.month())),
            Granularity::Quarters => Some((date.year(), (date.month() - 1) / 3)),
            Granularity::Years => Some((date.year(), 0)),
            Granularity::Issues | Granularity::AsImported => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Granularity::ALL
            .into_iter()
            .find(|granularity| granularity.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid granularity: '{}'. Valid granularities are: \
                    issues, days, weeks, months, quarters, years, as-imported",
                    s
                )
            })
    }
}

/// Group the individual issues of a course into processes.
///
/// Appearances are visited in chronological order; a new process starts
/// whenever the period of the granularity changes.
pub fn partition(course: &Course, granularity: Granularity) -> Result<Vec<Process>> {
    let issues = course.individual_issues();
    if issues.is_empty() {
        return Err(CourseError::EmptyCourse);
    }

    if granularity == Granularity::AsImported {
        return course
            .imported_processes()
            .map(<[Process]>::to_vec)
            .ok_or_else(|| {
                CourseError::GranularityUnavailable(
                    "the course carries no imported process boundaries".to_string(),
                )
            });
    }

    let mut processes: Vec<Process> = Vec::new();
    let mut current_key = None;

    for issue in issues {
        let key = granularity.period_key(issue.date);
        match processes.last_mut() {
            Some(process) if key.is_some() && key == current_key => process.issues.push(issue),
            _ => {
                current_key = key;
                processes.push(Process::new(vec![issue]));
            }
        }
    }

    Ok(processes)
}
