//! Lenient parsing of dates typed by the user

use crate::error::{CourseError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Three numbers separated by anything that is not a digit
const FLEXIBLE_DATE: &str = r"^\D*(\d+)\D+(\d+)\D+(\d+)\D*$";

fn flexible_date() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(FLEXIBLE_DATE).expect("valid date pattern"))
}

/// A guess the parser made while reading a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateHint {
    /// A two-digit year was completed to a full year
    YearCompleted { given: String, completed: i32 },
    /// Day and month were swapped to obtain a valid date
    DayMonthSwapped,
}

/// Result of reading a date: the date and the guesses it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexibleDate {
    pub date: NaiveDate,
    pub hints: Vec<DateHint>,
}

/// Read a date given as day, month and year.
///
/// Two-digit years are put into the century of `today`, or the one
/// before if that would lie in the future. If day and month do not form a
/// valid date, they are tried the other way round.
pub fn parse_flexible(input: &str, today: NaiveDate) -> Result<FlexibleDate> {
    let captures = flexible_date()
        .captures(input.trim())
        .ok_or_else(|| CourseError::DateParse(input.to_string()))?;

    let number = |index: usize| -> Result<u32> {
        captures[index]
            .parse::<u32>()
            .map_err(|_| CourseError::DateParse(input.to_string()))
    };
    let day = number(1)?;
    let month = number(2)?;
    let given_year = number(3)?;
    let mut year = i32::try_from(given_year).map_err(|_| CourseError::DateParse(input.to_string()))?;

    let mut hints = Vec::new();
    if year < 100 {
        year += today.year() / 100 * 100;
        if year > today.year() {
            year -= 100;
        }
        hints.push(DateHint::YearCompleted {
            given: captures[3].to_string(),
            completed: year,
        });
    }

    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        return Ok(FlexibleDate { date, hints });
    }

    match NaiveDate::from_ymd_opt(year, day, month) {
        Some(date) => {
            hints.push(DateHint::DayMonthSwapped);
            Ok(FlexibleDate { date, hints })
        }
        None => Err(CourseError::DateParse(input.to_string())),
    }
}
