use chrono::{Local, NaiveDate};
use clap::Parser;
use periodical::application::{
    init::init, select_block_number, CalendarEditor, ConfigService, CourseService, DateField,
    Notice,
};
use periodical::cli::{
    format_block_list, format_issue_list, format_notices, format_process_list, format_year_grid,
    BlockCommand, Cli, Commands, IssueCommand,
};
use periodical::domain::{Block, Granularity, DATE_FORMAT, WEEKDAYS};
use periodical::error::CourseError;
use periodical::infrastructure::FileSystemRepository;
use std::fs;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), CourseError> {
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Init { path } => init(&path),
        Commands::Config { key, value, list } => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                for (key, value) in service.list()? {
                    println!("{} = {}", key, value);
                }
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
                Ok(())
            } else {
                println!("Usage: periodical config [--list | <key> [<value>]]");
                println!("Valid keys: granularity, issue_colours, earliest_plausible, created");
                Ok(())
            }
        }
        Commands::Block(command) => run_block(course_service(today)?, command),
        Commands::Issue(command) => run_issue(course_service(today)?, command),
        Commands::Show { year, block } => {
            let mut editor = course_service(today)?.open()?;
            if let Some(number) = block {
                select_block_number(&mut editor, number)?;
            }
            if let Some(year) = year {
                editor.set_year(year);
            }
            print!("{}", format_year_grid(&editor.year_grid()));
            if let Some(label) = editor.showing_block().map(Block::label) {
                println!();
                println!("Issues of {}:", label);
                println!("{}", format_issue_list(&editor.issue_controllers()).trim_end());
            }
            Ok(())
        }
        Commands::Count => {
            let editor = course_service(today)?.open()?;
            println!("{}", editor.course().count_individual_issues());
            Ok(())
        }
        Commands::Split { granularity } => {
            let granularity = granularity
                .as_deref()
                .map(Granularity::from_str)
                .transpose()
                .map_err(CourseError::Config)?;
            let processes = course_service(today)?.split(granularity)?;
            print!("{}", format_process_list(&processes));
            Ok(())
        }
        Commands::Import { file } => {
            let xml = fs::read_to_string(&file)?;
            let blocks = course_service(today)?.import(&xml)?;
            println!("Imported {} blocks from {}", blocks, file.display());
            Ok(())
        }
        Commands::Export { file } => {
            let xml = course_service(today)?.export()?;
            fs::write(&file, xml)?;
            println!("Exported course to {}", file.display());
            Ok(())
        }
    }
}

fn course_service(today: NaiveDate) -> Result<CourseService, CourseError> {
    Ok(CourseService::new(FileSystemRepository::discover()?, today))
}

fn showing_label(editor: &CalendarEditor) -> String {
    editor
        .showing_block()
        .map(Block::label)
        .unwrap_or_default()
}

fn print_notices(notices: &[Notice]) {
    print!("{}", format_notices(notices));
}

fn run_block(service: CourseService, command: BlockCommand) -> Result<(), CourseError> {
    match command {
        BlockCommand::List => {
            let editor = service.open()?;
            println!("{}", format_block_list(editor.course()).trim_end());
        }
        BlockCommand::Add { first, last } => {
            let (notices, label) = service.edit(|editor| {
                editor.start_new_block();
                let notices = editor.set_publication_period(&first, &last)?;
                Ok((notices, showing_label(editor)))
            })?;
            print_notices(&notices);
            println!("Added block {}", label);
        }
        BlockCommand::Set { block, first, last } => {
            let (notices, label) = service.edit(|editor| {
                let mut notices = select_block_number(editor, block)?;
                notices.extend(match (&first, &last) {
                    (Some(first), Some(last)) => editor.set_publication_period(first, last)?,
                    (Some(first), None) => editor.set_first_appearance(first)?,
                    (None, Some(last)) => editor.set_last_appearance(last)?,
                    (None, None) => {
                        return Err(CourseError::InvalidRange(
                            "give --first, --last or both".to_string(),
                        ))
                    }
                });
                Ok((notices, showing_label(editor)))
            })?;
            print_notices(&notices);
            println!("Block {} is now {}", block, label);
        }
        BlockCommand::Copy { block } => {
            let label = service.edit(|editor| {
                select_block_number(editor, block)?;
                editor.copy_block()?;
                Ok(showing_label(editor))
            })?;
            println!("Copied block {} to {}", block, label);
        }
        BlockCommand::Remove { block } => {
            service.edit(|editor| {
                select_block_number(editor, block)?;
                editor.remove_block()
            })?;
            println!("Removed block {}", block);
        }
    }
    Ok(())
}

/// Issues are numbered from 1 on the command line
fn issue_index(number: usize) -> Result<usize, CourseError> {
    number
        .checked_sub(1)
        .ok_or(CourseError::UnknownIssue(number))
}

fn issue_number(error: CourseError) -> CourseError {
    match error {
        CourseError::UnknownIssue(index) => CourseError::UnknownIssue(index + 1),
        other => other,
    }
}

fn run_issue(service: CourseService, command: IssueCommand) -> Result<(), CourseError> {
    match command {
        IssueCommand::Add {
            block,
            heading,
            days,
        } => {
            let index = service.edit(|editor| {
                select_block_number(editor, block)?;
                let index = editor.add_issue(&heading)?;
                for day in days.map(|days| days.0).unwrap_or_default() {
                    editor.set_issue_day_of_week(index, day, true)?;
                }
                Ok(index)
            })?;
            println!("Added issue {} '{}' to block {}", index + 1, heading, block);
        }
        IssueCommand::Remove { block, issue } => {
            let index = issue_index(issue)?;
            let removed = service
                .edit(|editor| {
                    select_block_number(editor, block)?;
                    editor.remove_issue(index)
                })
                .map_err(issue_number)?;
            println!("Removed issue '{}' from block {}", removed.heading(), block);
        }
        IssueCommand::Days { block, issue, days } => {
            let index = issue_index(issue)?;
            service
                .edit(|editor| {
                    select_block_number(editor, block)?;
                    for day in WEEKDAYS {
                        editor.set_issue_day_of_week(index, day, days.0.contains(&day))?;
                    }
                    Ok(())
                })
                .map_err(issue_number)?;
            println!("Updated days of issue {} of block {}", issue, block);
        }
        IssueCommand::Rename {
            block,
            issue,
            heading,
        } => {
            let index = issue_index(issue)?;
            service
                .edit(|editor| {
                    select_block_number(editor, block)?;
                    editor.set_issue_heading(index, &heading)
                })
                .map_err(issue_number)?;
            println!("Renamed issue {} of block {} to '{}'", issue, block, heading);
        }
        IssueCommand::Toggle { block, issue, date } => {
            let index = issue_index(issue)?;
            let (date, appeared, notices) = service
                .edit(|editor| {
                    select_block_number(editor, block)?;
                    let (date, notices) = editor.parse_date(&date, DateField::IssueDate)?;
                    let id = editor.showing().ok_or(CourseError::NoBlockSelected)?;
                    let appeared = editor.toggle_issue(id, index, date)?;
                    Ok((date, appeared, notices))
                })
                .map_err(issue_number)?;
            print_notices(&notices);
            println!(
                "Issue {} {} on {}",
                issue,
                if appeared { "appeared" } else { "did not appear" },
                date.format(DATE_FORMAT)
            );
        }
    }
    Ok(())
}
