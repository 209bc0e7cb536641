//! The course of appearance of a newspaper

use crate::domain::block::{Block, BlockId};
use crate::domain::granularity::{self, Granularity, IndividualIssue, Process};
use crate::error::{CourseError, Result};
use chrono::NaiveDate;
use tracing::debug;

/// The course of appearance of a newspaper: an ordered sequence of blocks
/// whose date ranges never overlap.
///
/// The course owns its blocks and hands out [`BlockId`]s to refer to them.
/// Dates of a block that is part of the course can only be changed through
/// the course, so every change is checked against the neighbouring blocks.
#[derive(Debug, Clone, Default)]
pub struct Course {
    blocks: Vec<Block>,
    last_id: u64,
    processes: Vec<Process>,
    imported_processes: Option<Vec<Process>>,
}

impl Course {
    pub fn new() -> Self {
        Course::default()
    }

    /// Create a new, undated block with an id unique to this course.
    /// The block is not added to the course.
    pub fn new_block(&mut self) -> Block {
        Block::new(self.next_id())
    }

    fn next_id(&mut self) -> BlockId {
        self.last_id += 1;
        BlockId(self.last_id)
    }

    /// Add a block, keeping the blocks in chronological order
    pub fn add(&mut self, mut block: Block) -> Result<BlockId> {
        let (first, last) = block.span().ok_or_else(|| {
            CourseError::InvalidRange("a block needs at least one date".to_string())
        })?;
        self.check_overlap(None, first, last)?;

        if self.index_of(block.id()).is_some() {
            block.renumber(self.next_id());
        } else {
            self.last_id = self.last_id.max(block.id().0);
        }
        let id = block.id();
        debug!("Adding block {}", block.label());
        self.insert_sorted(block);
        Ok(id)
    }

    fn insert_sorted(&mut self, block: Block) {
        let start = block.span().map(|(first, _)| first);
        let position = self
            .blocks
            .partition_point(|other| other.span().map(|(first, _)| first) < start);
        self.blocks.insert(position, block);
    }

    fn check_overlap(&self, skip: Option<usize>, first: NaiveDate, last: NaiveDate) -> Result<()> {
        let conflict = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .find(|(_, block)| block.overlaps(first, last));

        match conflict {
            Some((_, other)) => Err(CourseError::Overlap {
                first,
                last,
                other: other.label(),
            }),
            None => Ok(()),
        }
    }

    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.index_of(id)?;
        let block = self.blocks.remove(index);
        debug!("Removed block {}", block.label());
        Some(block)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.processes.clear();
        self.imported_processes = None;
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    /// Mutable access for editing the issues of a block
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn set_first_appearance(&mut self, id: BlockId, first: NaiveDate) -> Result<()> {
        self.change_period(id, |block| block.set_first_appearance(first))
    }

    pub fn set_last_appearance(&mut self, id: BlockId, last: NaiveDate) -> Result<()> {
        self.change_period(id, |block| block.set_last_appearance(last))
    }

    /// Move both ends of a block in one step. Only the resulting range is
    /// checked, so a block can be moved past its own former dates.
    pub fn set_publication_period(
        &mut self,
        id: BlockId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<()> {
        self.change_period(id, |block| block.set_publication_period(first, last))
    }

    fn change_period<F>(&mut self, id: BlockId, change: F) -> Result<()>
    where
        F: FnOnce(&mut Block) -> Result<()>,
    {
        let index = self.index_of(id).ok_or(CourseError::UnknownBlock(id.0))?;

        let mut candidate = self.blocks[index].clone();
        change(&mut candidate)?;
        if let Some((first, last)) = candidate.span() {
            self.check_overlap(Some(index), first, last)?;
        }

        debug!("Block {} changed to {}", self.blocks[index].label(), candidate.label());
        self.blocks.remove(index);
        self.insert_sorted(candidate);
        Ok(())
    }

    /// The block covering the date, if any
    pub fn is_match(&self, date: NaiveDate) -> Option<&Block> {
        let after = self
            .blocks
            .partition_point(|block| block.span().is_some_and(|(first, _)| first <= date));
        let candidate = self.blocks.get(after.checked_sub(1)?)?;
        candidate.is_match(date).then_some(candidate)
    }

    /// Earliest date of any block
    pub fn first_appearance(&self) -> Option<NaiveDate> {
        self.blocks
            .iter()
            .filter_map(|block| block.span().map(|(first, _)| first))
            .min()
    }

    /// Latest date of any block
    pub fn last_appearance(&self) -> Option<NaiveDate> {
        self.blocks
            .iter()
            .filter_map(|block| block.span().map(|(_, last)| last))
            .max()
    }

    /// Every appearance of every issue, in chronological order. Issues
    /// appearing on the same day keep the order they have in their block.
    /// Incomplete blocks are skipped.
    pub fn individual_issues(&self) -> Vec<IndividualIssue> {
        let mut result = Vec::new();
        for block in &self.blocks {
            for date in block.dates() {
                for issue in block.issues() {
                    if issue.is_match(date) {
                        result.push(IndividualIssue::new(date, issue.heading()));
                    }
                }
            }
        }
        result
    }

    /// Number of appearances of all issues in all complete blocks
    pub fn count_individual_issues(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| {
                block
                    .dates()
                    .map(|date| {
                        block
                            .issues()
                            .iter()
                            .filter(|issue| issue.is_match(date))
                            .count()
                    })
                    .sum::<usize>()
            })
            .sum()
    }

    /// Group the individual issues into processes and keep the result
    pub fn split_into(&mut self, granularity: Granularity) -> Result<&[Process]> {
        let processes = granularity::partition(self, granularity)?;
        debug!(
            "Split course into {} processes by {}",
            processes.len(),
            granularity
        );
        self.processes = processes;
        Ok(&self.processes)
    }

    /// The processes of the last split, empty if there was none
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn number_of_processes(&self) -> usize {
        self.processes.len()
    }

    pub fn clear_processes(&mut self) {
        self.processes.clear();
    }

    /// Process boundaries read from an imported course document
    pub fn imported_processes(&self) -> Option<&[Process]> {
        self.imported_processes.as_deref()
    }

    pub(crate) fn set_imported_processes(&mut self, processes: Vec<Process>) {
        self.processes = processes.clone();
        self.imported_processes = Some(processes);
    }

    /// Drop imported process boundaries, e.g. after the course was edited
    pub fn forget_imported_processes(&mut self) {
        self.imported_processes = None;
    }
}

/// Courses are equal when their blocks are; ids and processes are ignored.
impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

impl Eq for Course {}

impl<'a> IntoIterator for &'a Course {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Issue;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add_block(course: &mut Course, first: NaiveDate, last: NaiveDate) -> Result<BlockId> {
        let mut block = course.new_block();
        block.set_publication_period(first, last)?;
        course.add(block)
    }

    #[test]
    fn test_adjacent_block_accepted_overlapping_rejected() {
        let mut course = Course::new();
        add_block(&mut course, date(2020, 1, 1), date(2020, 6, 30)).unwrap();

        let result = add_block(&mut course, date(2020, 6, 30), date(2020, 12, 31));
        assert!(matches!(result, Err(CourseError::Overlap { .. })));
        assert_eq!(course.len(), 1);

        add_block(&mut course, date(2020, 7, 1), date(2020, 12, 31)).unwrap();
        assert_eq!(course.len(), 2);
    }

    #[test]
    fn test_blocks_kept_in_order() {
        let mut course = Course::new();
        add_block(&mut course, date(1900, 1, 1), date(1900, 12, 31)).unwrap();
        add_block(&mut course, date(1850, 1, 1), date(1850, 12, 31)).unwrap();
        add_block(&mut course, date(1870, 1, 1), date(1870, 12, 31)).unwrap();

        let starts: Vec<i32> = course
            .iter()
            .map(|b| chrono::Datelike::year(&b.first_appearance().unwrap()))
            .collect();
        assert_eq!(starts, vec![1850, 1870, 1900]);
        assert_eq!(course.first_appearance(), Some(date(1850, 1, 1)));
        assert_eq!(course.last_appearance(), Some(date(1900, 12, 31)));
    }

    #[test]
    fn test_undated_block_rejected() {
        let mut course = Course::new();
        let block = course.new_block();
        assert!(matches!(
            course.add(block),
            Err(CourseError::InvalidRange(_))
        ));
        assert!(course.is_empty());
    }

    #[test]
    fn test_resize_into_neighbour_fails_atomically() {
        let mut course = Course::new();
        let first = add_block(&mut course, date(2020, 1, 1), date(2020, 6, 30)).unwrap();
        let second = add_block(&mut course, date(2020, 7, 1), date(2020, 12, 31)).unwrap();

        let result = course.set_last_appearance(first, date(2020, 7, 1));
        assert!(matches!(result, Err(CourseError::Overlap { .. })));
        assert_eq!(
            course.block(first).unwrap().last_appearance(),
            Some(date(2020, 6, 30))
        );

        let result = course.set_publication_period(second, date(2019, 1, 1), date(2020, 1, 1));
        assert!(matches!(result, Err(CourseError::Overlap { .. })));
        assert_eq!(
            course.block(second).unwrap().span(),
            Some((date(2020, 7, 1), date(2020, 12, 31)))
        );
    }

    #[test]
    fn test_publication_period_moves_block_and_resorts() {
        let mut course = Course::new();
        let early = add_block(&mut course, date(2020, 1, 1), date(2020, 1, 31)).unwrap();
        add_block(&mut course, date(2020, 3, 1), date(2020, 3, 31)).unwrap();

        course
            .set_publication_period(early, date(2020, 5, 1), date(2020, 5, 31))
            .unwrap();

        assert_eq!(course.index_of(early), Some(1));
        assert_eq!(course.last_appearance(), Some(date(2020, 5, 31)));
    }

    #[test]
    fn test_set_first_after_last_is_invalid_range() {
        let mut course = Course::new();
        let id = add_block(&mut course, date(2020, 1, 1), date(2020, 1, 31)).unwrap();
        let result = course.set_first_appearance(id, date(2020, 2, 1));
        assert!(matches!(result, Err(CourseError::InvalidRange(_))));
    }

    #[test]
    fn test_unknown_block() {
        let mut course = Course::new();
        let result = course.set_first_appearance(BlockId(42), date(2020, 2, 1));
        assert!(matches!(result, Err(CourseError::UnknownBlock(42))));
    }

    #[test]
    fn test_is_match_finds_covering_block() {
        let mut course = Course::new();
        let a = add_block(&mut course, date(2020, 1, 1), date(2020, 1, 31)).unwrap();
        let b = add_block(&mut course, date(2020, 3, 1), date(2020, 3, 31)).unwrap();

        assert_eq!(course.is_match(date(2020, 1, 1)).map(Block::id), Some(a));
        assert_eq!(course.is_match(date(2020, 1, 31)).map(Block::id), Some(a));
        assert!(course.is_match(date(2020, 2, 15)).is_none());
        assert_eq!(course.is_match(date(2020, 3, 15)).map(Block::id), Some(b));
        assert!(course.is_match(date(2019, 12, 31)).is_none());
        assert!(course.is_match(date(2020, 4, 1)).is_none());
    }

    #[test]
    fn test_count_single_monday() {
        let mut course = Course::new();
        let id = add_block(&mut course, date(2021, 1, 1), date(2021, 1, 7)).unwrap();
        course
            .block_mut(id)
            .unwrap()
            .add_issue(Issue::with_days("Morning", [Weekday::Mon]));

        assert_eq!(course.count_individual_issues(), 1);
        let issues = course.individual_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].date, date(2021, 1, 4));
        assert_eq!(issues[0].heading, "Morning");
    }

    #[test]
    fn test_count_skips_incomplete_blocks() {
        let mut course = Course::new();
        let mut block = course.new_block();
        block.set_first_appearance(date(2021, 1, 4)).unwrap();
        block.add_issue(Issue::with_days("Morning", [Weekday::Mon]));
        course.add(block).unwrap();

        assert_eq!(course.count_individual_issues(), 0);
    }

    #[test]
    fn test_count_with_exceptions() {
        let mut course = Course::new();
        let id = add_block(&mut course, date(2021, 1, 1), date(2021, 1, 31)).unwrap();
        let mut issue = Issue::with_days("Morning", [Weekday::Mon]);
        // Mondays: 4, 11, 18, 25
        issue.add_exclusion(date(2021, 1, 11));
        issue.add_addition(date(2021, 1, 12));
        // Outside the block, must not count
        issue.add_addition(date(2021, 2, 2));
        course.block_mut(id).unwrap().add_issue(issue);

        assert_eq!(course.count_individual_issues(), 4);
    }

    #[test]
    fn test_split_is_cached_until_cleared() {
        let mut course = Course::new();
        let id = add_block(&mut course, date(2021, 1, 1), date(2021, 1, 7)).unwrap();
        course
            .block_mut(id)
            .unwrap()
            .add_issue(Issue::with_days("Morning", [Weekday::Mon, Weekday::Tue]));

        assert_eq!(course.split_into(Granularity::Days).unwrap().len(), 2);
        assert_eq!(course.number_of_processes(), 2);

        course.clear_processes();
        assert_eq!(course.number_of_processes(), 0);
        assert_eq!(course.count_individual_issues(), 2);
    }

    #[test]
    fn test_add_renumbers_foreign_block() {
        let mut course = Course::new();
        let mut other = Course::new();
        let id = add_block(&mut course, date(2020, 1, 1), date(2020, 1, 31)).unwrap();

        let mut foreign = other.new_block();
        assert_eq!(foreign.id(), id);
        foreign.set_first_appearance(date(2021, 1, 1)).unwrap();
        let new_id = course.add(foreign).unwrap();
        assert_ne!(new_id, id);
        assert_eq!(course.len(), 2);
    }

    #[test]
    fn test_new_block_after_foreign_block_gets_fresh_id() {
        let mut course = Course::new();
        let mut other = Course::new();
        for _ in 0..4 {
            other.new_block();
        }
        let mut foreign = other.new_block();
        foreign.set_first_appearance(date(2021, 1, 1)).unwrap();
        let foreign_id = course.add(foreign).unwrap();

        let ids: Vec<BlockId> = (0..6).map(|_| course.new_block().id()).collect();
        assert!(!ids.contains(&foreign_id));

        let id = add_block(&mut course, date(2020, 1, 1), date(2020, 1, 31)).unwrap();
        assert_ne!(id, foreign_id);
        assert_eq!(course.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut course = Course::new();
        let a = add_block(&mut course, date(2020, 1, 1), date(2020, 1, 31)).unwrap();
        add_block(&mut course, date(2020, 3, 1), date(2020, 3, 31)).unwrap();

        assert!(course.remove(a).is_some());
        assert!(course.remove(a).is_none());
        assert_eq!(course.len(), 1);

        course.clear();
        assert!(course.is_empty());
    }
}
