use crate::course_csv::ImportBatch;
use database::services::course::{CourseService, SaveOutcome};
use log::{error, info, warn};
use models::Course;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

/// Outcome of a course import, ready to show to the person who uploaded it
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// One line per stored course
    pub imported: Vec<String>,
    /// Rejected rows and courses that were not stored
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportReport {
    /// Start a report with the problems found while reading the file
    pub fn from_batch(batch: &ImportBatch) -> Self {
        Self {
            imported: Vec::new(),
            errors: batch.errors.iter().map(ToString::to_string).collect(),
            warnings: batch.warnings.iter().map(ToString::to_string).collect(),
        }
    }

    /// Record what happened when storing `course`
    pub fn record(&mut self, course: &Course, outcome: Result<SaveOutcome, DbErr>) {
        match outcome {
            Ok(SaveOutcome::Inserted(id)) => {
                info!("Imported course {} ({}) as {id}", course.course_code, course.academic_year);
                self.imported.push(format!(
                    "Imported {course} for {} with {} time slots",
                    course.academic_year,
                    course.time_slots.len()
                ));
            }
            Ok(SaveOutcome::AlreadyExists) => {
                warn!(
                    "Skipped existing course {} ({})",
                    course.course_code, course.academic_year
                );
                self.errors.push(format!(
                    "Course already exists, skipped: {} in {}",
                    course.course_code, course.academic_year
                ));
            }
            Err(err) => {
                error!("Failed to save course {}: {err}", course.course_code);
                self.errors.push(format!("Failed to save {course}: {err}"));
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Stores every course of `batch`, each in its own transaction, so one
/// failing course does not undo the others
pub async fn save_courses(db: &DatabaseConnection, batch: ImportBatch) -> ImportReport {
    let mut report = ImportReport::from_batch(&batch);

    for course in &batch.courses {
        let outcome = CourseService::save_course(db, course).await;
        report.record(course, outcome);
    }

    info!(
        "Course import finished: {} imported, {} errors, {} warnings",
        report.imported.len(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::course_csv::{ImportWarning, RowError};
    use uuid::Uuid;

    fn batch() -> ImportBatch {
        ImportBatch {
            courses: vec![Course::new("113-1", "ENG201", "English Writing")],
            errors: vec![RowError {
                line: 4,
                field: Some("period".to_string()),
                message: "Unknown period 'D0'".to_string(),
            }],
            warnings: vec![ImportWarning {
                academic_year: "113-1".to_string(),
                course_code: "ENG201".to_string(),
                message: "time slots overlap".to_string(),
            }],
        }
    }

    #[test]
    fn test_from_batch_keeps_row_problems() {
        let report = ImportReport::from_batch(&batch());
        assert_eq!(report.errors, vec!["Line 4: field 'period' - Unknown period 'D0'"]);
        assert_eq!(report.warnings, vec!["ENG201 (113-1): time slots overlap"]);
        assert!(report.imported.is_empty());
    }

    #[test]
    fn test_record_outcomes() {
        let course = Course::new("113-1", "HIS301", "World History");
        let mut report = ImportReport::default();

        report.record(&course, Ok(SaveOutcome::Inserted(Uuid::new_v4())));
        assert_eq!(
            report.imported,
            vec!["Imported World History (HIS301) for 113-1 with 0 time slots"]
        );
        assert!(!report.has_errors());

        report.record(&course, Ok(SaveOutcome::AlreadyExists));
        report.record(&course, Err(DbErr::Custom("connection reset".to_string())));
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("already exists"));
        assert!(report.errors[1].contains("connection reset"));
    }
}
