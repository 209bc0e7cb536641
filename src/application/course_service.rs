//! Loading, editing and storing the course of a workspace

use crate::application::calendar_editor::{CalendarEditor, EditorSettings, Notice};
use crate::domain::{Block, Course, Granularity, Process};
use crate::error::{CourseError, Result};
use crate::infrastructure::{from_xml, to_xml, FileSystemRepository, WorkspaceRepository};
use chrono::NaiveDate;
use tracing::debug;

/// Service for working on the course stored in a workspace
pub struct CourseService {
    repository: FileSystemRepository,
    today: NaiveDate,
}

impl CourseService {
    /// Create a new course service; `today` bounds plausible dates
    pub fn new(repository: FileSystemRepository, today: NaiveDate) -> Self {
        CourseService { repository, today }
    }

    /// Open the stored course in an editor
    pub fn open(&self) -> Result<CalendarEditor> {
        let config = self.repository.load_config()?;
        let course = match self.repository.load_course_document()? {
            Some(xml) => from_xml(&xml)?,
            None => Course::new(),
        };
        debug!("Opened course with {} blocks", course.len());
        Ok(CalendarEditor::with_course(
            course,
            EditorSettings::from_config(&config),
            self.today,
        ))
    }

    /// Store the course of the editor
    pub fn save(&self, editor: &CalendarEditor) -> Result<()> {
        self.repository.save_course_document(&to_xml(editor.course())?)
    }

    /// Apply an edit to the stored course. Nothing is stored if the edit fails.
    pub fn edit<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut CalendarEditor) -> Result<T>,
    {
        let mut editor = self.open()?;
        let value = apply(&mut editor)?;
        self.save(&editor)?;
        Ok(value)
    }

    /// Split the course into processes and store the result. Without an
    /// explicit granularity the configured one is used.
    pub fn split(&self, granularity: Option<Granularity>) -> Result<Vec<Process>> {
        let granularity = match granularity {
            Some(granularity) => granularity,
            None => self.repository.load_config()?.granularity,
        };
        self.edit(|editor| {
            editor.next()?;
            editor.split_into(granularity).map(<[Process]>::to_vec)
        })
    }

    /// Replace the stored course by a course document, returning the number
    /// of blocks read
    pub fn import(&self, xml: &str) -> Result<usize> {
        self.edit(|editor| {
            editor.upload(xml)?;
            Ok(editor.course().len())
        })
    }

    /// The stored course as course document
    pub fn export(&self) -> Result<String> {
        self.open()?.download()
    }
}

/// Switch the editor to the block at a 1-based position in the course
pub fn select_block_number(editor: &mut CalendarEditor, number: usize) -> Result<Vec<Notice>> {
    let id = number
        .checked_sub(1)
        .and_then(|index| editor.course().get(index))
        .map(Block::id)
        .ok_or(CourseError::UnknownBlock(number as u64))?;
    editor.select_block(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init::init;
    use chrono::Weekday;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> CourseService {
        init(temp.path()).unwrap();
        CourseService::new(
            FileSystemRepository::new(temp.path().to_path_buf()),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn add_weekly_block(service: &CourseService, first: &str, last: &str) {
        service
            .edit(|editor| {
                editor.start_new_block();
                editor.set_publication_period(first, last)?;
                let index = editor.add_issue("Morning")?;
                editor.set_issue_day_of_week(index, Weekday::Mon, true)
            })
            .unwrap();
    }

    #[test]
    fn test_edits_are_stored() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        add_weekly_block(&service, "1.1.2021", "31.1.2021");
        add_weekly_block(&service, "1.2.2021", "28.2.2021");

        let editor = service.open().unwrap();
        assert_eq!(editor.course().len(), 2);
        assert_eq!(editor.course().count_individual_issues(), 8);
    }

    #[test]
    fn test_blocks_without_issues_are_stored() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        for (first, last) in [("1.1.1850", "31.12.1850"), ("1.1.1851", "31.12.1851")] {
            service
                .edit(|editor| {
                    editor.start_new_block();
                    editor.set_publication_period(first, last)
                })
                .unwrap();
        }

        let labels: Vec<String> = service
            .open()
            .unwrap()
            .block_options()
            .into_iter()
            .map(|option| option.label)
            .collect();
        assert_eq!(
            labels,
            vec!["01.01.1850 – 31.12.1850", "01.01.1851 – 31.12.1851"]
        );
    }

    #[test]
    fn test_failed_edit_is_not_stored() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        add_weekly_block(&service, "1.1.2021", "31.1.2021");

        let result = service.edit(|editor| {
            editor.add_issue("Evening")?;
            editor.set_publication_period("31.1.2021", "1.1.2021")
        });
        assert!(matches!(result, Err(CourseError::InvalidRange(_))));

        let editor = service.open().unwrap();
        assert_eq!(editor.course().get(0).unwrap().issues().len(), 1);
    }

    #[test]
    fn test_split_uses_configured_granularity() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        add_weekly_block(&service, "1.1.2021", "31.1.2021");

        assert_eq!(service.split(None).unwrap().len(), 4);
        assert_eq!(service.split(Some(Granularity::Months)).unwrap().len(), 1);

        // the stored split survives reopening
        let editor = service.open().unwrap();
        assert_eq!(editor.course().number_of_processes(), 1);
    }

    #[test]
    fn test_split_empty_course() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        assert!(matches!(service.split(None), Err(CourseError::EmptyCourse)));
    }

    #[test]
    fn test_export_and_import() {
        let other_dir = TempDir::new().unwrap();
        let other = service(&other_dir);
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        add_weekly_block(&service, "1.1.2021", "31.1.2021");
        let xml = service.export().unwrap();

        assert_eq!(other.import(&xml).unwrap(), 1);
        assert_eq!(
            other.open().unwrap().course(),
            service.open().unwrap().course()
        );
    }

    #[test]
    fn test_select_block_number() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        add_weekly_block(&service, "1.1.2021", "31.1.2021");
        add_weekly_block(&service, "1.1.2020", "31.1.2020");

        let mut editor = service.open().unwrap();
        select_block_number(&mut editor, 2).unwrap();
        assert_eq!(
            editor.showing_block().unwrap().first_appearance(),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert!(matches!(
            select_block_number(&mut editor, 0),
            Err(CourseError::UnknownBlock(0))
        ));
        assert!(matches!(
            select_block_number(&mut editor, 3),
            Err(CourseError::UnknownBlock(3))
        ));
    }
}
