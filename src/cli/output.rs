//! Output formatting utilities

use crate::application::{Cell, IssueView, Notice, YearGrid};
use crate::domain::{Course, Process, DATE_FORMAT};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format the blocks of a course for display, numbered from 1
pub fn format_block_list(course: &Course) -> String {
    if course.is_empty() {
        return "No blocks found".to_string();
    }

    let mut output = String::new();
    for (number, block) in course.iter().enumerate() {
        let headings: Vec<&str> = block.issues().iter().map(|issue| issue.heading()).collect();
        output.push_str(&format!(
            "{:>3}  {}  {}\n",
            number + 1,
            block.label(),
            if headings.is_empty() {
                "(no issues)".to_string()
            } else {
                headings.join(", ")
            }
        ));
    }
    output
}

/// Format the issues of a block for display, numbered from 1
pub fn format_issue_list(issues: &[IssueView]) -> String {
    if issues.is_empty() {
        return "No issues found".to_string();
    }

    let mut output = String::new();
    for issue in issues {
        let days: Vec<String> = issue
            .days
            .iter()
            .map(|day| day.to_string().to_lowercase())
            .collect();
        output.push_str(&format!(
            "{:>3}  {}  [{}]  {}\n",
            issue.index + 1,
            issue.heading,
            issue.colour,
            if days.is_empty() {
                "irregular".to_string()
            } else {
                days.join(",")
            }
        ));
    }
    output
}

fn format_cell(cell: &Cell) -> String {
    if cell.date.is_none() {
        return String::new();
    }
    if !cell.on_block {
        return "-".to_string();
    }
    let selected: Vec<usize> = cell
        .issues
        .iter()
        .filter(|option| option.selected)
        .map(|option| option.index + 1)
        .collect();
    match selected.as_slice() {
        [] => ".".to_string(),
        [number] => number.to_string(),
        several => format!("+{}", several.len()),
    }
}

/// Format a calendar sheet: one row per day, one column per month.
///
/// `-` marks days outside any block, `.` days without an issue; a number
/// names the single issue that appeared, `+n` counts several.
pub fn format_year_grid(grid: &YearGrid) -> String {
    let mut output = format!("{}\n    ", grid.year);
    for month in MONTHS {
        output.push_str(&format!("{:>4}", month));
    }
    output.push('\n');

    for row in grid.rows() {
        let label = row.first().and_then(Cell::day_label).unwrap_or_default();
        output.push_str(&format!("{:>4}", label));
        for cell in row {
            output.push_str(&format!("{:>4}", format_cell(cell)));
        }
        output.push('\n');
    }
    output
}

/// Format processes for display, numbered from 1
pub fn format_process_list(processes: &[Process]) -> String {
    if processes.is_empty() {
        return "No processes found".to_string();
    }

    let mut output = String::new();
    for (number, process) in processes.iter().enumerate() {
        let (Some(first), Some(last)) = (process.first_date(), process.last_date()) else {
            continue;
        };
        let count = process.issues.len();
        output.push_str(&format!(
            "{:>4}  {} – {}  {} {}\n",
            number + 1,
            first.format(DATE_FORMAT),
            last.format(DATE_FORMAT),
            count,
            if count == 1 { "issue" } else { "issues" }
        ));
    }
    output
}

/// Format notices, one per line
pub fn format_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| format!("Note: {}\n", notice))
        .collect()
}
