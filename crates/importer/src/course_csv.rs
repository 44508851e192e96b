use csv::{ReaderBuilder, StringRecord, Trim};
use log::warn;
use models::{Course, TimeSlot, TimeSlotError};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
};
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Columns every course CSV must carry, one row per time slot
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "academic_year",
    "course_code",
    "course_name",
    "credits",
    "fee_per_credit",
    "week_number",
    "day_of_week",
    "period",
    "start_time",
    "end_time",
];

/// Failures that stop the whole file from being read
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read the CSV header: {0}")]
    Header(#[from] csv::Error),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A rejected row. `line` is the 1-based line in the file, the header being line 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: u64,
    pub field: Option<String>,
    pub message: String,
}

impl RowError {
    fn new(line: u64, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            line,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.field {
            Some(field) => write!(f, "Line {}: field '{}' - {}", self.line, field, self.message),
            None => write!(f, "Line {}: {}", self.line, self.message),
        }
    }
}

/// Something suspicious about an imported course that does not block it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportWarning {
    pub academic_year: String,
    pub course_code: String,
    pub message: String,
}

impl Display for ImportWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} ({}): {}",
            self.course_code, self.academic_year, self.message
        )
    }
}

/// Courses read from a CSV file, merged by term and code, in file order
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub courses: Vec<Course>,
    pub errors: Vec<RowError>,
    pub warnings: Vec<ImportWarning>,
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    #[serde(default)]
    academic_year: String,
    course_code: String,
    course_name: String,
    credits: f32,
    fee_per_credit: u32,
    week_number: Option<i64>,
    day_of_week: i64,
    period: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    instructor: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    max_students: Option<u32>,
    #[serde(default)]
    open_for_registration: Option<String>,
}

/// Parses a course CSV.
///
/// # Arguments
/// * `input` - Raw file contents, optionally starting with a UTF-8 BOM
/// * `default_term` - Term used for rows whose `academic_year` is blank
///
/// # Returns
/// The merged courses together with every rejected row and every warning.
/// Only an unreadable header fails the whole import.
pub fn parse_courses(input: &[u8], default_term: &str) -> Result<ImportBatch, ImportError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut batch = ImportBatch::default();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for (row_index, result) in reader.records().enumerate() {
        let fallback_line = row_index as u64 + 2;

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(fallback_line, |pos| pos.line());
                batch.errors.push(RowError::new(line, None, err.to_string()));
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |pos| pos.line());

        match parse_row(&record, &headers, line, default_term) {
            Ok((course, slot)) => {
                let key = (course.academic_year.clone(), course.course_code.clone());
                match index.get(&key) {
                    Some(&position) => {
                        let existing = &mut batch.courses[position];
                        let differing = differing_fields(existing, &course);
                        if !differing.is_empty() {
                            batch.warnings.push(ImportWarning {
                                academic_year: key.0,
                                course_code: key.1,
                                message: format!(
                                    "line {line} disagrees with the course's first row on {}, keeping the first row's values",
                                    differing.join(", ")
                                ),
                            });
                        }
                        existing.time_slots.push(slot);
                    }
                    None => {
                        index.insert(key, batch.courses.len());
                        batch.courses.push(course.with_time_slots(vec![slot]));
                    }
                }
            }
            Err(err) => {
                warn!("Rejected course CSV row: {err}");
                batch.errors.push(err);
            }
        }
    }

    for course in &batch.courses {
        batch.warnings.extend(overlapping_slots(course));
    }

    Ok(batch)
}

/// Course-level columns where a later row of the same course disagrees with its first row
fn differing_fields(first: &Course, other: &Course) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if first.course_name != other.course_name {
        fields.push("course_name");
    }
    if first.credits != other.credits {
        fields.push("credits");
    }
    if first.fee_per_credit != other.fee_per_credit {
        fields.push("fee_per_credit");
    }
    if first.instructor_name != other.instructor_name {
        fields.push("instructor");
    }
    if first.max_students != other.max_students {
        fields.push("max_students");
    }
    if first.is_open_for_registration != other.is_open_for_registration {
        fields.push("open_for_registration");
    }
    fields
}

fn parse_row(
    record: &StringRecord,
    headers: &StringRecord,
    line: u64,
    default_term: &str,
) -> Result<(Course, TimeSlot), RowError> {
    let row: CourseRow = record
        .deserialize(Some(headers))
        .map_err(|err| deserialize_error(&err, headers, line))?;

    let academic_year = match row.academic_year.as_str() {
        "" => default_term.trim(),
        year => year,
    };
    if academic_year.is_empty() {
        return Err(RowError::new(
            line,
            Some("academic_year"),
            "is blank and no default term was given",
        ));
    }
    if row.course_code.is_empty() {
        return Err(RowError::new(line, Some("course_code"), "must not be blank"));
    }
    if row.course_name.is_empty() {
        return Err(RowError::new(line, Some("course_name"), "must not be blank"));
    }
    if row.credits.is_nan() || row.credits < 0.0 {
        return Err(RowError::new(
            line,
            Some("credits"),
            format!("must be zero or more, got {}", row.credits),
        ));
    }

    let is_open = parse_open_flag(row.open_for_registration.as_deref())
        .map_err(|message| RowError::new(line, Some("open_for_registration"), message))?;

    let slot = TimeSlot::new(
        row.week_number,
        row.day_of_week,
        &row.period,
        &row.start_time,
        &row.end_time,
        row.location,
    )
    .map_err(|err| RowError::new(line, Some(slot_field(&err)), err.to_string()))?;

    let mut course = Course::new(academic_year, row.course_code, row.course_name)
        .with_fee(row.credits, row.fee_per_credit);
    course.instructor_name = row.instructor.filter(|name| !name.is_empty());
    course.max_students = row.max_students;
    course.is_open_for_registration = is_open;

    Ok((course, slot))
}

fn deserialize_error(err: &csv::Error, headers: &StringRecord, line: u64) -> RowError {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => {
            let field = err
                .field()
                .and_then(|index| headers.get(index as usize));
            RowError::new(line, field, err.kind().to_string())
        }
        _ => RowError::new(line, None, err.to_string()),
    }
}

fn slot_field(err: &TimeSlotError) -> &'static str {
    match err {
        TimeSlotError::InvalidDayOfWeek(_) => "day_of_week",
        TimeSlotError::InvalidWeekNumber(_) => "week_number",
        TimeSlotError::InvalidPeriod(_) => "period",
        TimeSlotError::InvalidTime { field, .. } => *field,
    }
}

/// Reads the `open_for_registration` column; a blank cell means open
fn parse_open_flag(value: Option<&str>) -> Result<bool, String> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(true);
    };

    match value.to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "是" => Ok(true),
        "no" | "n" | "false" | "0" | "否" => Ok(false),
        other => Err(format!("expected yes/no, got '{other}'")),
    }
}

/// A course whose own slots collide would conflict with itself for anyone enrolled
fn overlapping_slots(course: &Course) -> Vec<ImportWarning> {
    let slots = &course.time_slots;
    let mut warnings = Vec::new();

    for (i, first) in slots.iter().enumerate() {
        for second in &slots[i + 1..] {
            if first.overlaps_with(second) {
                warnings.push(ImportWarning {
                    academic_year: course.academic_year.clone(),
                    course_code: course.course_code.clone(),
                    message: format!("time slots '{first}' and '{second}' overlap"),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod test {
    use super::*;
    use models::{DayOfWeek, Period};

    const HEADER: &str = "academic_year,course_code,course_name,credits,fee_per_credit,week_number,day_of_week,period,start_time,end_time,instructor,location,max_students,open_for_registration";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.into_bytes()
    }

    #[test]
    fn test_rows_merge_into_one_course() {
        let input = csv(&[
            "113-1,ENG201,English Writing,2,240,,1,D2,09:00,09:50,Ms. Lin,A101,40,yes",
            "113-1,ENG201,English Writing,2,240,,3,D3,10:10,11:00,Ms. Lin,A101,40,yes",
            "113-1,HIS301,World History,3,240,,1,D4,11:10,12:00,,B202,,",
        ]);

        let batch = parse_courses(&input, "113-1").unwrap();
        assert!(batch.errors.is_empty(), "{:?}", batch.errors);
        assert_eq!(batch.courses.len(), 2);

        let english = &batch.courses[0];
        assert_eq!(english.course_code, "ENG201");
        assert_eq!(english.time_slots.len(), 2);
        assert_eq!(english.time_slots[0].day_of_week(), DayOfWeek::Monday);
        assert_eq!(english.time_slots[1].period(), Period::D3);
        assert_eq!(english.instructor_name.as_deref(), Some("Ms. Lin"));
        assert_eq!(english.max_students, Some(40));
        assert_eq!(english.total_fee(), 480);

        let history = &batch.courses[1];
        assert_eq!(history.instructor_name, None);
        assert_eq!(history.max_students, None);
        assert!(history.is_open_for_registration);
    }

    #[test]
    fn test_same_code_in_different_terms_stays_separate() {
        let input = csv(&[
            "113-1,ENG201,English Writing,2,240,,1,D2,09:00,09:50,,,,",
            "113-2,ENG201,English Writing,2,240,,1,D2,09:00,09:50,,,,",
        ]);

        let batch = parse_courses(&input, "113-1").unwrap();
        assert_eq!(batch.courses.len(), 2);
    }

    #[test]
    fn test_blank_year_uses_default_term() {
        let input = csv(&[",MATH101,Calculus,3,240,,2,D1,08:10,09:00,,,,"]);

        let batch = parse_courses(&input, "113-2").unwrap();
        assert_eq!(batch.courses[0].academic_year, "113-2");

        let batch = parse_courses(&input, "").unwrap();
        assert!(batch.courses.is_empty());
        assert_eq!(batch.errors[0].field.as_deref(), Some("academic_year"));
    }

    #[test]
    fn test_bom_and_padded_headers() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(
            " academic_year , course_code,course_name,credits,fee_per_credit,week_number,day_of_week,period,start_time,end_time\n\
             113-1,PHY101,Physics,2,240,,4,D6,13:10,14:00\n"
                .as_bytes(),
        );

        let batch = parse_courses(&input, "").unwrap();
        assert!(batch.errors.is_empty(), "{:?}", batch.errors);
        assert_eq!(batch.courses[0].course_code, "PHY101");
        assert_eq!(batch.courses[0].academic_year, "113-1");
    }

    #[test]
    fn test_bad_rows_are_reported_with_line_and_field() {
        let input = csv(&[
            "113-1,ENG201,English Writing,2,240,,1,D2,09:00,09:50,,,,",
            "113-1,BIO101,Biology,2,240,,8,D2,09:00,09:50,,,,",
            "113-1,CHE101,Chemistry,2,240,,2,D10,09:00,09:50,,,,",
            "113-1,ART101,Art,2,240,,2,D2,9am,09:50,,,,",
            "113-1,MUS101,Music,two,240,,2,D2,09:00,09:50,,,,",
            "113-1,PE101,Physical Education,1,240,,2,D2,09:00,09:50,,,,maybe",
        ]);

        let batch = parse_courses(&input, "113-1").unwrap();
        assert_eq!(batch.courses.len(), 1);

        let found: Vec<(u64, Option<&str>)> = batch
            .errors
            .iter()
            .map(|err| (err.line, err.field.as_deref()))
            .collect();
        assert_eq!(
            found,
            vec![
                (3, Some("day_of_week")),
                (4, Some("period")),
                (5, Some("start_time")),
                (6, Some("credits")),
                (7, Some("open_for_registration")),
            ]
        );
        assert!(batch.errors[0].to_string().starts_with("Line 3: field 'day_of_week'"));
    }

    #[test]
    fn test_wrong_field_count_is_a_row_error() {
        let input = csv(&[
            "113-1,ENG201,English Writing,2,240",
            "113-1,HIS301,World History,3,240,,1,D4,11:10,12:00,,,,",
        ]);

        let batch = parse_courses(&input, "113-1").unwrap();
        assert_eq!(batch.courses.len(), 1);
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].line, 2);
    }

    #[test]
    fn test_missing_columns_fail_the_file() {
        let input = b"course_code,course_name\nENG201,English Writing\n";
        match parse_courses(input, "113-1") {
            Err(ImportError::MissingColumns(columns)) => {
                assert!(columns.contains(&"academic_year".to_string()));
                assert!(columns.contains(&"period".to_string()));
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_slots_in_one_course_warn() {
        let input = csv(&[
            "113-1,ENG201,English Writing,2,240,,1,D2,09:00,09:50,,,,",
            "113-1,ENG201,English Writing,2,240,,1,D3,09:30,10:20,,,,",
            "113-1,ENG201,English Writing,2,240,,2,D3,09:30,10:20,,,,",
        ]);

        let batch = parse_courses(&input, "113-1").unwrap();
        assert_eq!(batch.courses[0].time_slots.len(), 3);
        assert_eq!(batch.warnings.len(), 1);
        assert_eq!(batch.warnings[0].course_code, "ENG201");
    }

    #[test]
    fn test_conflicting_course_columns_warn_and_keep_first_row() {
        let input = csv(&[
            "113-1,ENG201,English Writing,2,240,,1,D2,09:00,09:50,Ms. Lin,A101,40,yes",
            "113-1,ENG201,English Writing,2,240,,3,D3,10:10,11:00,Ms. Lin,B202,40,yes",
            "113-1,ENG201,English Writing,3,300,,4,D4,11:10,12:00,Mr. Wu,A101,40,no",
        ]);

        let batch = parse_courses(&input, "113-1").unwrap();
        assert!(batch.errors.is_empty(), "{:?}", batch.errors);
        assert_eq!(batch.warnings.len(), 1);
        assert_eq!(
            batch.warnings[0].message,
            "line 4 disagrees with the course's first row on credits, fee_per_credit, instructor, open_for_registration, keeping the first row's values"
        );

        let english = &batch.courses[0];
        assert_eq!(english.time_slots.len(), 3);
        assert_eq!(english.credits, 2.0);
        assert_eq!(english.fee_per_credit, 240);
        assert_eq!(english.instructor_name.as_deref(), Some("Ms. Lin"));
        assert!(english.is_open_for_registration);
    }

    #[test]
    fn test_open_flag() {
        assert_eq!(parse_open_flag(None), Ok(true));
        assert_eq!(parse_open_flag(Some("  ")), Ok(true));
        assert_eq!(parse_open_flag(Some("Yes")), Ok(true));
        assert_eq!(parse_open_flag(Some("是")), Ok(true));
        assert_eq!(parse_open_flag(Some("FALSE")), Ok(false));
        assert_eq!(parse_open_flag(Some("否")), Ok(false));
        assert!(parse_open_flag(Some("maybe")).is_err());
    }
}
