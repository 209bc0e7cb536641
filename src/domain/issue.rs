//! Issues: a named edition with a weekly pattern and per-date exceptions

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// The days of the week in storage order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// An issue of a newspaper, e.g. the morning and the evening edition.
///
/// The issue regularly appears on its days of week. Single dates may
/// deviate from that: an *addition* is an appearance on a day the issue
/// normally does not appear, an *exclusion* suppresses a regular one.
/// Exceptions are date-specific and survive changes of the weekly pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issue {
    heading: String,
    days_of_week: [bool; 7],
    additions: BTreeSet<NaiveDate>,
    exclusions: BTreeSet<NaiveDate>,
}

impl Issue {
    /// Create an issue that does not appear on any day yet
    pub fn new(heading: impl Into<String>) -> Self {
        Issue {
            heading: heading.into(),
            ..Default::default()
        }
    }

    /// Create an issue appearing on the given days of week
    pub fn with_days<I>(heading: impl Into<String>, days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut issue = Issue::new(heading);
        for day in days {
            issue.add_day_of_week(day);
        }
        issue
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn set_heading(&mut self, heading: impl Into<String>) {
        self.heading = heading.into();
    }

    /// Let the issue regularly appear on the given day of week
    pub fn add_day_of_week(&mut self, day: Weekday) {
        self.days_of_week[day.num_days_from_monday() as usize] = true;
    }

    /// Stop the issue from regularly appearing on the given day of week
    pub fn remove_day_of_week(&mut self, day: Weekday) {
        self.days_of_week[day.num_days_from_monday() as usize] = false;
    }

    pub fn is_day_of_week(&self, day: Weekday) -> bool {
        self.days_of_week[day.num_days_from_monday() as usize]
    }

    /// The days of week the issue regularly appears on, Monday first
    pub fn days_of_week(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEKDAYS
            .iter()
            .copied()
            .filter(move |day| self.is_day_of_week(*day))
    }

    /// Record an appearance outside the weekly pattern
    pub fn add_addition(&mut self, date: NaiveDate) {
        self.exclusions.remove(&date);
        self.additions.insert(date);
    }

    pub fn remove_addition(&mut self, date: NaiveDate) {
        self.additions.remove(&date);
    }

    /// Record that a regular appearance did not take place
    pub fn add_exclusion(&mut self, date: NaiveDate) {
        self.additions.remove(&date);
        self.exclusions.insert(date);
    }

    pub fn remove_exclusion(&mut self, date: NaiveDate) {
        self.exclusions.remove(&date);
    }

    pub fn additions(&self) -> &BTreeSet<NaiveDate> {
        &self.additions
    }

    pub fn exclusions(&self) -> &BTreeSet<NaiveDate> {
        &self.exclusions
    }

    /// Whether the issue appeared on the given date
    pub fn is_match(&self, date: NaiveDate) -> bool {
        (self.is_day_of_week(date.weekday()) && !self.exclusions.contains(&date))
            || self.additions.contains(&date)
    }
}
