//! Blocks: a date range of a course with a fixed set of issues

use crate::domain::{Course, Issue};
use crate::error::{CourseError, Result};
use chrono::{Days, NaiveDate};

/// Format used for dates shown to the user
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Identifier of a block, unique within the course that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// A period of time during which a newspaper appeared with the same set of
/// issues.
///
/// Both dates are inclusive. While a block is being entered it may carry
/// only one of the two dates; such a block is *incomplete* and occupies just
/// that single day.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
    issues: Vec<Issue>,
}

impl Block {
    pub(crate) fn new(id: BlockId) -> Self {
        Block {
            id,
            first: None,
            last: None,
            issues: Vec::new(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub(crate) fn renumber(&mut self, id: BlockId) {
        self.id = id;
    }

    pub fn first_appearance(&self) -> Option<NaiveDate> {
        self.first
    }

    pub fn last_appearance(&self) -> Option<NaiveDate> {
        self.last
    }

    /// The closed range the block occupies, if it has any date at all
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.first, self.last) {
            (Some(first), Some(last)) => Some((first, last)),
            (Some(date), None) | (None, Some(date)) => Some((date, date)),
            (None, None) => None,
        }
    }

    /// Whether both dates are set
    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.last.is_some()
    }

    pub(crate) fn set_first_appearance(&mut self, first: NaiveDate) -> Result<()> {
        Self::check_range(Some(first), self.last)?;
        self.first = Some(first);
        Ok(())
    }

    pub(crate) fn set_last_appearance(&mut self, last: NaiveDate) -> Result<()> {
        Self::check_range(self.first, Some(last))?;
        self.last = Some(last);
        Ok(())
    }

    /// Set both dates at once; only the final state is validated
    pub(crate) fn set_publication_period(&mut self, first: NaiveDate, last: NaiveDate) -> Result<()> {
        Self::check_range(Some(first), Some(last))?;
        self.first = Some(first);
        self.last = Some(last);
        Ok(())
    }

    fn check_range(first: Option<NaiveDate>, last: Option<NaiveDate>) -> Result<()> {
        if let (Some(first), Some(last)) = (first, last) {
            if first > last {
                return Err(CourseError::InvalidRange(format!(
                    "first appearance {} is after last appearance {}",
                    first.format(DATE_FORMAT),
                    last.format(DATE_FORMAT)
                )));
            }
        }
        Ok(())
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issue_mut(&mut self, index: usize) -> Option<&mut Issue> {
        self.issues.get_mut(index)
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn remove_issue(&mut self, index: usize) -> Option<Issue> {
        if index < self.issues.len() {
            Some(self.issues.remove(index))
        } else {
            None
        }
    }

    /// Whether the block holds no issues
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether the date lies within the block
    pub fn is_match(&self, date: NaiveDate) -> bool {
        self.span()
            .is_some_and(|(first, last)| first <= date && date <= last)
    }

    /// Whether the block shares at least one day with the closed range
    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.span()
            .is_some_and(|(own_first, own_last)| own_first <= last && first <= own_last)
    }

    /// Copy the issues of this block into a new, undated block of the
    /// target course
    pub fn clone_for(&self, course: &mut Course) -> Block {
        let mut copy = course.new_block();
        copy.issues = self.issues.clone();
        copy
    }

    /// All days of a complete block, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let range = if self.is_complete() { self.span() } else { None };
        let mut next = range.map(|(first, _)| first);
        let last = range.map(|(_, last)| last);

        std::iter::from_fn(move || {
            let current = next?;
            next = if Some(current) < last {
                current.checked_add_days(Days::new(1))
            } else {
                None
            };
            Some(current)
        })
    }

    /// Display string, e.g. "01.01.1850 – 31.12.1850"
    pub fn label(&self) -> String {
        let show = |date: Option<NaiveDate>| {
            date.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        format!("{} – {}", show(self.first), show(self.last))
    }
}

/// Blocks are equal when their dates and issues are; the id is ignored.
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.last == other.last && self.issues == other.issues
    }
}

impl Eq for Block {}
