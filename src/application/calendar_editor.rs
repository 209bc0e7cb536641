//! Editing the course of appearance of a newspaper on a calendar sheet

use crate::domain::{
    parse_flexible, Block, BlockId, Course, DateHint, Granularity, Issue, Process, DATE_FORMAT,
};
use crate::error::{CourseError, Result};
use crate::infrastructure::{course_xml, Config};
use chrono::{Datelike, Months, NaiveDate, Weekday};
use std::fmt;
use tracing::{debug, warn};

/// Blocks spanning more years than this are suspicious
const LONG_BLOCK_YEARS: u32 = 100;

/// Settings the editor needs from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub issue_colours: Vec<String>,
    pub earliest_plausible: NaiveDate,
}

impl EditorSettings {
    pub fn from_config(config: &Config) -> Self {
        EditorSettings {
            issue_colours: config.issue_colours.clone(),
            earliest_plausible: config.earliest_plausible,
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings::from_config(&Config::new())
    }
}

/// Which of the two dates of a block an input was meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    FirstAppearance,
    LastAppearance,
    IssueDate,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::FirstAppearance => f.write_str("first appearance"),
            DateField::LastAppearance => f.write_str("last appearance"),
            DateField::IssueDate => f.write_str("issue date"),
        }
    }
}

/// Informational hint about an edit. Notices never prevent the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    YearCompleted {
        field: DateField,
        given: String,
        completed: i32,
    },
    DayMonthSwapped {
        field: DateField,
    },
    LongBlock,
    FirstAppearanceEarly,
    FirstAppearanceFiction,
    LastAppearanceEarly,
    LastAppearanceFiction,
}

impl Notice {
    fn from_hint(field: DateField, hint: DateHint) -> Self {
        match hint {
            DateHint::YearCompleted { given, completed } => Notice::YearCompleted {
                field,
                given,
                completed,
            },
            DateHint::DayMonthSwapped => Notice::DayMonthSwapped { field },
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::YearCompleted {
                field,
                given,
                completed,
            } => write!(f, "Year '{}' of the {} read as {}", given, field, completed),
            Notice::DayMonthSwapped { field } => {
                write!(f, "Day and month of the {} were swapped", field)
            }
            Notice::LongBlock => write!(
                f,
                "The block spans more than {} years",
                LONG_BLOCK_YEARS
            ),
            Notice::FirstAppearanceEarly => {
                f.write_str("The first appearance is before the first known newspaper")
            }
            Notice::FirstAppearanceFiction => f.write_str("The first appearance is in the future"),
            Notice::LastAppearanceEarly => {
                f.write_str("The last appearance is before the first known newspaper")
            }
            Notice::LastAppearanceFiction => f.write_str("The last appearance is in the future"),
        }
    }
}

/// An issue that may have appeared on the date of a calendar cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOption {
    pub block: BlockId,
    pub index: usize,
    pub heading: String,
    pub colour: String,
    pub date: NaiveDate,
    pub selected: bool,
}

/// One cell of the calendar sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// `None` for cells like the 30th of February
    pub date: Option<NaiveDate>,
    /// Whether any block covers the date
    pub on_block: bool,
    /// Whether the block being edited covers the date
    pub on_showing_block: bool,
    pub issues: Vec<IssueOption>,
}

impl Default for Cell {
    fn default() -> Self {
        // cells without a date are not greyed out
        Cell {
            date: None,
            on_block: true,
            on_showing_block: false,
            issues: Vec::new(),
        }
    }
}

impl Cell {
    /// Day of month followed by a full stop, e.g. "5."
    pub fn day_label(&self) -> Option<String> {
        self.date.map(|date| format!("{}.", date.day()))
    }

    /// Style class of the cell, by day of week and block coverage
    pub fn style_class(&self) -> Option<&'static str> {
        let date = self.date?;
        let class = match (date.weekday(), self.on_block) {
            (Weekday::Sat, true) => "saturday",
            (Weekday::Sun, true) => "sunday",
            (_, true) => "weekday",
            (Weekday::Sat, false) => "saturdayNoBlock",
            (Weekday::Sun, false) => "sundayNoBlock",
            (_, false) => "weekdayNoBlock",
        };
        Some(class)
    }
}

/// A calendar year laid out as 31 rows (days) by 12 columns (months)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrid {
    pub year: i32,
    rows: Vec<Vec<Cell>>,
}

impl YearGrid {
    fn empty(year: i32) -> Self {
        YearGrid {
            year,
            rows: vec![vec![Cell::default(); 12]; 31],
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell for day 1–31 of month 1–12
    pub fn cell(&self, day: u32, month: u32) -> Option<&Cell> {
        let row = self.rows.get(day.checked_sub(1)? as usize)?;
        row.get(month.checked_sub(1)? as usize)
    }
}

/// The properties of one issue of the block being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueView {
    pub index: usize,
    pub heading: String,
    pub colour: String,
    pub days: Vec<Weekday>,
}

/// An entry of the block chooser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOption {
    pub id: BlockId,
    pub label: String,
}

/// Interactive editor for a course.
///
/// The editor keeps track of the block being edited ("showing") and of the
/// year displayed on the calendar sheet. Every operation is a single
/// request: it either applies completely or returns an error and leaves
/// the course as it was.
#[derive(Debug, Clone)]
pub struct CalendarEditor {
    course: Course,
    showing: Option<BlockId>,
    year: i32,
    today: NaiveDate,
    settings: EditorSettings,
}

impl CalendarEditor {
    pub fn new(settings: EditorSettings, today: NaiveDate) -> Self {
        CalendarEditor {
            course: Course::new(),
            showing: None,
            year: today.year(),
            today,
            settings,
        }
    }

    /// Open an existing course, showing its first block
    pub fn with_course(course: Course, settings: EditorSettings, today: NaiveDate) -> Self {
        let mut editor = CalendarEditor::new(settings, today);
        editor.showing = course.get(0).map(Block::id);
        editor.course = course;
        editor.navigate();
        editor
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Whether the course has no blocks at all
    pub fn is_blank(&self) -> bool {
        self.course.is_empty()
    }

    pub fn showing(&self) -> Option<BlockId> {
        self.showing
    }

    pub fn showing_block(&self) -> Option<&Block> {
        self.course.block(self.showing?)
    }

    fn showing_block_mut(&mut self) -> Result<&mut Block> {
        let id = self.showing.ok_or(CourseError::NoBlockSelected)?;
        self.course
            .block_mut(id)
            .ok_or(CourseError::UnknownBlock(id.0))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn previous_year(&mut self) {
        self.year -= 1;
    }

    pub fn next_year(&mut self) {
        self.year += 1;
    }

    /// Move the displayed year into the range of the block being edited
    fn navigate(&mut self) {
        if let Some((first, last)) = self.showing_block().and_then(Block::span) {
            self.year = self.year.clamp(first.year(), last.year());
        }
    }

    /// Derived process boundaries no longer fit once the course changed
    fn touched(&mut self) {
        self.course.clear_processes();
        self.course.forget_imported_processes();
    }

    fn colour(&self, index: usize) -> String {
        let colours = &self.settings.issue_colours;
        if colours.is_empty() {
            return String::new();
        }
        colours[index % colours.len()].clone()
    }

    /// The calendar sheet for the displayed year
    pub fn year_grid(&self) -> YearGrid {
        self.build_year_grid(self.year)
    }

    pub fn build_year_grid(&self, year: i32) -> YearGrid {
        let mut grid = YearGrid::empty(year);
        let Some(mut date) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return grid;
        };
        let mut current: Option<&Block> = None;

        while date.year() == year {
            if !current.is_some_and(|block| block.is_match(date)) {
                current = self.course.is_match(date);
            }

            let cell = &mut grid.rows[date.day0() as usize][date.month0() as usize];
            cell.date = Some(date);
            match current {
                None => cell.on_block = false,
                Some(block) => {
                    cell.on_showing_block = Some(block.id()) == self.showing;
                    cell.issues = self.issue_options(block, date);
                }
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        grid
    }

    fn issue_options(&self, block: &Block, date: NaiveDate) -> Vec<IssueOption> {
        block
            .issues()
            .iter()
            .enumerate()
            .map(|(index, issue)| IssueOption {
                block: block.id(),
                index,
                heading: issue.heading().to_string(),
                colour: self.colour(index),
                date,
                selected: issue.is_match(date),
            })
            .collect()
    }

    /// The issues of the block being edited
    pub fn issue_controllers(&self) -> Vec<IssueView> {
        let Some(block) = self.showing_block() else {
            return Vec::new();
        };
        block
            .issues()
            .iter()
            .enumerate()
            .map(|(index, issue)| IssueView {
                index,
                heading: issue.heading().to_string(),
                colour: self.colour(index),
                days: issue.days_of_week().collect(),
            })
            .collect()
    }

    /// Add an issue to the block being edited, returning its index
    pub fn add_issue(&mut self, heading: &str) -> Result<usize> {
        let block = self.showing_block_mut()?;
        block.add_issue(Issue::new(heading));
        let index = block.issues().len() - 1;
        self.touched();
        Ok(index)
    }

    pub fn remove_issue(&mut self, index: usize) -> Result<Issue> {
        let issue = self
            .showing_block_mut()?
            .remove_issue(index)
            .ok_or(CourseError::UnknownIssue(index))?;
        self.touched();
        Ok(issue)
    }

    fn showing_issue_mut(&mut self, index: usize) -> Result<&mut Issue> {
        self.showing_block_mut()?
            .issue_mut(index)
            .ok_or(CourseError::UnknownIssue(index))
    }

    pub fn set_issue_heading(&mut self, index: usize, heading: &str) -> Result<()> {
        self.showing_issue_mut(index)?.set_heading(heading);
        self.touched();
        Ok(())
    }

    pub fn set_issue_day_of_week(
        &mut self,
        index: usize,
        day: Weekday,
        appears: bool,
    ) -> Result<()> {
        let issue = self.showing_issue_mut(index)?;
        if appears {
            issue.add_day_of_week(day);
        } else {
            issue.remove_day_of_week(day);
        }
        self.touched();
        Ok(())
    }

    fn issue_on_date_mut(
        &mut self,
        block: BlockId,
        index: usize,
        date: NaiveDate,
    ) -> Result<&mut Issue> {
        let block = self
            .course
            .block_mut(block)
            .ok_or(CourseError::UnknownBlock(block.0))?;
        if !block.is_match(date) {
            return Err(CourseError::InvalidRange(format!(
                "{} is outside the block {}",
                date.format(DATE_FORMAT),
                block.label()
            )));
        }
        block
            .issue_mut(index)
            .ok_or(CourseError::UnknownIssue(index))
    }

    /// Mark the issue as appeared on the date
    pub fn select_issue(&mut self, block: BlockId, index: usize, date: NaiveDate) -> Result<()> {
        let issue = self.issue_on_date_mut(block, index, date)?;
        if issue.is_day_of_week(date.weekday()) {
            issue.remove_exclusion(date);
        } else {
            issue.add_addition(date);
        }
        self.touched();
        Ok(())
    }

    /// Mark the issue as not appeared on the date
    pub fn unselect_issue(&mut self, block: BlockId, index: usize, date: NaiveDate) -> Result<()> {
        let issue = self.issue_on_date_mut(block, index, date)?;
        if issue.is_day_of_week(date.weekday()) {
            issue.add_exclusion(date);
        } else {
            issue.remove_addition(date);
        }
        self.touched();
        Ok(())
    }

    /// Flip whether the issue appeared on the date, returning the new state
    pub fn toggle_issue(&mut self, block: BlockId, index: usize, date: NaiveDate) -> Result<bool> {
        let selected = self.issue_on_date_mut(block, index, date)?.is_match(date);
        if selected {
            self.unselect_issue(block, index, date)?;
        } else {
            self.select_issue(block, index, date)?;
        }
        Ok(!selected)
    }

    pub fn block_options(&self) -> Vec<BlockOption> {
        self.course
            .iter()
            .map(|block| BlockOption {
                id: block.id(),
                label: block.label(),
            })
            .collect()
    }

    /// Switch to editing another block
    pub fn select_block(&mut self, id: BlockId) -> Result<Vec<Notice>> {
        if self.course.block(id).is_none() {
            return Err(CourseError::UnknownBlock(id.0));
        }
        if self.showing == Some(id) {
            return Ok(Vec::new());
        }
        self.showing = Some(id);
        self.navigate();
        Ok(self.check_block_plausibility())
    }

    /// Stop editing the current block; the next date entered starts a new one.
    /// An abandoned half-dated block without issues is dropped.
    pub fn start_new_block(&mut self) {
        self.neglect_empty_block();
        self.showing = None;
    }

    /// Read a date typed by the user, reporting the heuristics applied to it
    pub fn parse_date(&self, input: &str, field: DateField) -> Result<(NaiveDate, Vec<Notice>)> {
        let mut notices = Vec::new();
        let date = self.read_date(input, field, &mut notices)?;
        Ok((date, notices))
    }

    fn read_date(
        &self,
        input: &str,
        field: DateField,
        notices: &mut Vec<Notice>,
    ) -> Result<NaiveDate> {
        let parsed = parse_flexible(input, self.today)?;
        notices.extend(
            parsed
                .hints
                .into_iter()
                .map(|hint| Notice::from_hint(field, hint)),
        );
        Ok(parsed.date)
    }

    /// Set the first appearance of the block being edited, or start a new
    /// block with it if none is being edited
    pub fn set_first_appearance(&mut self, input: &str) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();
        let date = self.read_date(input, DateField::FirstAppearance, &mut notices)?;

        match self.showing {
            None => {
                let mut block = self.course.new_block();
                block.set_first_appearance(date)?;
                self.showing = Some(self.course.add(block)?);
            }
            Some(id) => {
                if self.showing_block().and_then(Block::first_appearance) == Some(date) {
                    return Ok(notices);
                }
                self.course.set_first_appearance(id, date)?;
            }
        }
        Ok(self.after_date_change(notices))
    }

    /// Set the last appearance of the block being edited, or start a new
    /// block with it if none is being edited
    pub fn set_last_appearance(&mut self, input: &str) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();
        let date = self.read_date(input, DateField::LastAppearance, &mut notices)?;

        match self.showing {
            None => {
                let mut block = self.course.new_block();
                block.set_last_appearance(date)?;
                self.showing = Some(self.course.add(block)?);
            }
            Some(id) => {
                if self.showing_block().and_then(Block::last_appearance) == Some(date) {
                    return Ok(notices);
                }
                self.course.set_last_appearance(id, date)?;
            }
        }
        Ok(self.after_date_change(notices))
    }

    /// Set both dates of the block being edited in one step, or create a
    /// new block with them if none is being edited
    pub fn set_publication_period(&mut self, first: &str, last: &str) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();
        let first = self.read_date(first, DateField::FirstAppearance, &mut notices)?;
        let last = self.read_date(last, DateField::LastAppearance, &mut notices)?;

        match self.showing {
            None => {
                let mut block = self.course.new_block();
                block.set_publication_period(first, last)?;
                self.showing = Some(self.course.add(block)?);
            }
            Some(id) => self.course.set_publication_period(id, first, last)?,
        }
        Ok(self.after_date_change(notices))
    }

    fn after_date_change(&mut self, mut notices: Vec<Notice>) -> Vec<Notice> {
        notices.extend(self.check_block_plausibility());
        self.navigate();
        self.touched();
        notices
    }

    fn check_block_plausibility(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        let Some(block) = self.showing_block() else {
            return notices;
        };
        let (Some(first), Some(last)) = (block.first_appearance(), block.last_appearance()) else {
            return notices;
        };

        if first
            .checked_add_months(Months::new(12 * LONG_BLOCK_YEARS))
            .is_some_and(|limit| limit < last)
        {
            notices.push(Notice::LongBlock);
        }
        if first < self.settings.earliest_plausible {
            notices.push(Notice::FirstAppearanceEarly);
        }
        if first > self.today {
            notices.push(Notice::FirstAppearanceFiction);
        }
        if last < self.settings.earliest_plausible {
            notices.push(Notice::LastAppearanceEarly);
        }
        if last > self.today {
            notices.push(Notice::LastAppearanceFiction);
        }
        notices
    }

    /// Append a copy of the block being edited right after the last
    /// appearance of the course and switch to it
    pub fn copy_block(&mut self) -> Result<BlockId> {
        let source = self
            .showing_block()
            .cloned()
            .ok_or(CourseError::NoBlockSelected)?;
        let start = self
            .course
            .last_appearance()
            .and_then(|last| last.succ_opt())
            .ok_or_else(|| CourseError::InvalidRange("the course has no end".to_string()))?;

        let mut copy = source.clone_for(&mut self.course);
        copy.set_publication_period(start, start)?;
        let id = self.course.add(copy)?;
        debug!("Copied block {} to start {}", source.label(), start);

        self.showing = Some(id);
        self.navigate();
        self.touched();
        Ok(id)
    }

    /// Remove the block being edited and show the one before it
    pub fn remove_block(&mut self) -> Result<()> {
        let id = self.showing.ok_or(CourseError::NoBlockSelected)?;
        if self.course.len() < 2 {
            self.course.clear();
            self.showing = None;
        } else {
            let index = self
                .course
                .index_of(id)
                .ok_or(CourseError::UnknownBlock(id.0))?;
            self.course.remove(id);
            self.showing = self.course.get(index.saturating_sub(1)).map(Block::id);
            self.navigate();
        }
        self.touched();
        Ok(())
    }

    /// Drop the block being edited if it has no issues and only one date
    pub fn neglect_empty_block(&mut self) {
        if let Some(id) = self.showing {
            if self
                .course
                .block(id)
                .is_some_and(|block| block.is_empty() && !block.is_complete())
            {
                self.course.remove(id);
                self.showing = None;
            }
        }
    }

    /// Replace the course by the uploaded document. On failure the course
    /// being edited is kept.
    pub fn upload(&mut self, xml: &str) -> Result<()> {
        match course_xml::from_xml(xml) {
            Ok(course) => {
                self.course = course;
                self.showing = self.course.get(0).map(Block::id);
                self.navigate();
                Ok(())
            }
            Err(e) => {
                warn!("Rejected uploaded course: {}", e);
                Err(e)
            }
        }
    }

    /// The course as XML document. If the course has not been split yet,
    /// the document carries a split by days.
    pub fn download(&mut self) -> Result<String> {
        self.next()?;

        let split_temporarily = self.course.number_of_processes() == 0;
        if split_temporarily {
            self.course.split_into(Granularity::Days)?;
        }
        let xml = course_xml::to_xml(&self.course);
        if split_temporarily {
            self.course.clear_processes();
        }
        xml
    }

    /// Check that the course is ready to be split into processes
    pub fn next(&self) -> Result<()> {
        if self.course.count_individual_issues() == 0 {
            return Err(CourseError::EmptyCourse);
        }
        Ok(())
    }

    /// Split the course into processes
    pub fn split_into(&mut self, granularity: Granularity) -> Result<&[Process]> {
        self.course.split_into(granularity)
    }
}
