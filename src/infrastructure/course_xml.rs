//! XML interchange format of a course
//!
//! ```xml
//! <course>
//!     <block first="1850-01-01" last="1850-12-31">
//!         <issue heading="Morning" monday="true" tuesday="false" ...>
//!             <addition date="1850-01-05"/>
//!             <exclusion date="1850-12-25"/>
//!         </issue>
//!     </block>
//!     <processes>
//!         <process>
//!             <issue heading="Morning" date="1850-01-01"/>
//!         </process>
//!     </processes>
//! </course>
//! ```
//!
//! Only complete blocks are written. The `processes` element is written
//! when the course has been split; on reading it becomes the course's
//! imported process boundaries.

use crate::domain::{Course, IndividualIssue, Issue, Process};
use crate::error::{CourseError, Result};
use chrono::{NaiveDate, Weekday};
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "course")]
struct CourseDocument {
    #[serde(rename = "block", default)]
    blocks: Vec<BlockElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    processes: Option<ProcessesElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockElement {
    #[serde(rename = "@first")]
    first: NaiveDate,
    #[serde(rename = "@last")]
    last: NaiveDate,
    #[serde(rename = "issue", default)]
    issues: Vec<IssueElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IssueElement {
    #[serde(rename = "@heading", default)]
    heading: String,
    #[serde(rename = "@monday")]
    monday: bool,
    #[serde(rename = "@tuesday")]
    tuesday: bool,
    #[serde(rename = "@wednesday")]
    wednesday: bool,
    #[serde(rename = "@thursday")]
    thursday: bool,
    #[serde(rename = "@friday")]
    friday: bool,
    #[serde(rename = "@saturday")]
    saturday: bool,
    #[serde(rename = "@sunday")]
    sunday: bool,
    #[serde(rename = "addition", default, skip_serializing_if = "Vec::is_empty")]
    additions: Vec<DateElement>,
    #[serde(rename = "exclusion", default, skip_serializing_if = "Vec::is_empty")]
    exclusions: Vec<DateElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DateElement {
    #[serde(rename = "@date")]
    date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProcessesElement {
    #[serde(rename = "process", default)]
    processes: Vec<ProcessElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProcessElement {
    #[serde(rename = "issue", default)]
    issues: Vec<AppearanceElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AppearanceElement {
    #[serde(rename = "@heading", default)]
    heading: String,
    #[serde(rename = "@date")]
    date: NaiveDate,
}

impl From<&Issue> for IssueElement {
    fn from(issue: &Issue) -> Self {
        let dates = |dates: &std::collections::BTreeSet<NaiveDate>| {
            dates.iter().map(|&date| DateElement { date }).collect()
        };
        IssueElement {
            heading: issue.heading().to_string(),
            monday: issue.is_day_of_week(Weekday::Mon),
            tuesday: issue.is_day_of_week(Weekday::Tue),
            wednesday: issue.is_day_of_week(Weekday::Wed),
            thursday: issue.is_day_of_week(Weekday::Thu),
            friday: issue.is_day_of_week(Weekday::Fri),
            saturday: issue.is_day_of_week(Weekday::Sat),
            sunday: issue.is_day_of_week(Weekday::Sun),
            additions: dates(issue.additions()),
            exclusions: dates(issue.exclusions()),
        }
    }
}

impl From<IssueElement> for Issue {
    fn from(element: IssueElement) -> Self {
        let flags = [
            (Weekday::Mon, element.monday),
            (Weekday::Tue, element.tuesday),
            (Weekday::Wed, element.wednesday),
            (Weekday::Thu, element.thursday),
            (Weekday::Fri, element.friday),
            (Weekday::Sat, element.saturday),
            (Weekday::Sun, element.sunday),
        ];
        let mut issue = Issue::with_days(
            element.heading,
            flags
                .into_iter()
                .filter_map(|(day, appears)| appears.then_some(day)),
        );
        for DateElement { date } in element.exclusions {
            issue.add_exclusion(date);
        }
        // additions win over a contradicting exclusion
        for DateElement { date } in element.additions {
            issue.add_addition(date);
        }
        issue
    }
}

impl From<&Process> for ProcessElement {
    fn from(process: &Process) -> Self {
        ProcessElement {
            issues: process
                .issues
                .iter()
                .map(|issue| AppearanceElement {
                    heading: issue.heading.clone(),
                    date: issue.date,
                })
                .collect(),
        }
    }
}

/// Write the course as a pretty-printed XML document
pub fn to_xml(course: &Course) -> Result<String> {
    let processes = course.processes();
    let document = CourseDocument {
        blocks: course
            .iter()
            .filter(|block| block.is_complete())
            .filter_map(|block| {
                let (first, last) = block.span()?;
                Some(BlockElement {
                    first,
                    last,
                    issues: block.issues().iter().map(IssueElement::from).collect(),
                })
            })
            .collect(),
        processes: (!processes.is_empty()).then(|| ProcessesElement {
            processes: processes.iter().map(ProcessElement::from).collect(),
        }),
    };

    let mut xml = String::from(XML_DECLARATION);
    let mut serializer = Serializer::new(&mut xml);
    serializer.indent(' ', 4);
    document
        .serialize(serializer)
        .map_err(|e| CourseError::XmlSerialize(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Read a course from an XML document. Either the whole document is
/// accepted or an error is returned; there is no partial result.
pub fn from_xml(xml: &str) -> Result<Course> {
    let document: CourseDocument =
        quick_xml::de::from_str(xml).map_err(|e| CourseError::MalformedCourse(e.to_string()))?;

    let mut course = Course::new();
    for element in document.blocks {
        let mut block = course.new_block();
        block
            .set_publication_period(element.first, element.last)
            .map_err(malformed)?;
        for issue in element.issues {
            block.add_issue(Issue::from(issue));
        }
        course.add(block).map_err(malformed)?;
    }

    let processes = document
        .processes
        .map(|element| element.processes)
        .unwrap_or_default();
    if !processes.is_empty() {
        let processes = processes
            .into_iter()
            .map(|process| read_process(&course, process))
            .collect::<Result<Vec<Process>>>()?;
        course.set_imported_processes(processes);
    }

    Ok(course)
}

fn read_process(course: &Course, element: ProcessElement) -> Result<Process> {
    if element.issues.is_empty() {
        return Err(CourseError::MalformedCourse(
            "a process must contain at least one issue".to_string(),
        ));
    }
    let issues = element
        .issues
        .into_iter()
        .map(|appearance| {
            if course.is_match(appearance.date).is_none() {
                return Err(CourseError::MalformedCourse(format!(
                    "process issue on {} lies outside every block",
                    appearance.date
                )));
            }
            Ok(IndividualIssue::new(appearance.date, appearance.heading))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Process::new(issues))
}

fn malformed(error: CourseError) -> CourseError {
    match error {
        CourseError::MalformedCourse(_) => error,
        other => CourseError::MalformedCourse(other.to_string()),
    }
}
